//! # Filter Bank
//!
//! One [`DelayLineFilter`] per audio channel, all kept at the same order.
//!
//! Every channel's delay line is reserved up to the longest order the host
//! can ask for when the bank is built, so changing the order later only
//! zero-fills memory that already exists. That keeps order changes legal
//! at the top of the audio callback.
//!
//! An order change is all-or-nothing: the order is validated and every
//! channel is given room for it before any channel is touched. If anything
//! fails, every channel keeps its old order and history.

use super::delay_line::{checked_order, DelayLineFilter};
use super::error::FilterError;

#[derive(Debug, Default)]
pub struct FilterBank {
    filters: Vec<DelayLineFilter>,

    /// The order every filter is configured with; 0 until the first
    /// successful `set_order()`.
    order: usize,
}

impl FilterBank {
    /// Build `num_channels` unconfigured filters at `sample_rate` Hz, each
    /// with room for delay lines of up to `max_order` samples.
    pub fn new(num_channels: usize, sample_rate: f32, max_order: usize) -> Result<Self, FilterError> {
        let filters = (0..num_channels)
            .map(|_| {
                let mut filter = DelayLineFilter::new(sample_rate);
                filter.reserve(max_order)?;
                Ok::<_, FilterError>(filter)
            })
            .collect::<Result<Vec<_>, FilterError>>()?;

        Ok(Self { filters, order: 0 })
    }

    /// Put every channel at `order` samples and return the applied order.
    ///
    /// Either every channel switches to a silent delay line of the new
    /// length, or none of them changes.
    pub fn set_order(&mut self, order: i64) -> Result<usize, FilterError> {
        let len = checked_order(order)?;

        // After this loop every `set_order` below reuses reserved memory and
        // cannot fail, so no channel can end up alone at the new order.
        for filter in &mut self.filters {
            filter.reserve(len)?;
        }
        for filter in &mut self.filters {
            filter.set_order(order)?;
        }

        self.order = len;
        Ok(len)
    }

    /// The order all channels share, or 0 if none has been set.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Whether the host's `order` parameter differs from what the channels
    /// are running.
    pub fn needs_order(&self, order: i32) -> bool {
        usize::try_from(order).ok() != Some(self.order)
    }

    /// Samples of output still to come once the input goes silent. A
    /// feedforward comb has no feedback, so that is exactly one delay period.
    pub fn tail_samples(&self) -> u32 {
        u32::try_from(self.order).unwrap_or(u32::MAX)
    }

    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut DelayLineFilter> {
        self.filters.get_mut(channel)
    }

    pub fn channel(&self, channel: usize) -> Option<&DelayLineFilter> {
        self.filters.get(channel)
    }

    pub fn num_channels(&self) -> usize {
        self.filters.len()
    }

    /// Silence every channel's history, keeping the order.
    pub fn clear(&mut self) {
        for filter in &mut self.filters {
            filter.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo(order: i64) -> FilterBank {
        let mut bank = FilterBank::new(2, 48000.0, 16).unwrap();
        bank.set_order(order).unwrap();
        for ch in 0..2 {
            bank.channel_mut(ch).unwrap().set_gain(1.0);
        }
        bank
    }

    fn push(bank: &mut FilterBank, channel: usize, input: &[f32]) -> Vec<f32> {
        let filter = bank.channel_mut(channel).unwrap();
        input.iter().map(|&x| filter.process(x).unwrap()).collect()
    }

    #[test]
    fn test_new_bank_is_unconfigured() {
        let mut bank = FilterBank::new(2, 44100.0, 8).unwrap();

        assert_eq!(bank.num_channels(), 2);
        assert_eq!(bank.order(), 0);
        assert!(bank.needs_order(200));
        assert_eq!(
            bank.channel_mut(0).unwrap().process(1.0),
            Err(FilterError::NotConfigured)
        );
    }

    #[test]
    fn test_new_reserves_max_order_per_channel() {
        let bank = FilterBank::new(2, 44100.0, 64).unwrap();

        for ch in 0..2 {
            assert!(bank.channel(ch).unwrap().capacity() >= 64);
        }
    }

    #[test]
    fn test_new_reports_allocation_failure() {
        let err = FilterBank::new(1, 44100.0, usize::MAX).unwrap_err();

        assert!(matches!(err, FilterError::Allocation { .. }), "got {err:?}");
    }

    /// An order change moves every channel together and keeps the reserved
    /// memory.
    #[test]
    fn test_set_order_applies_to_every_channel() {
        let mut bank = stereo(4);

        assert_eq!(bank.set_order(8), Ok(8));

        assert_eq!(bank.order(), 8);
        assert!(!bank.needs_order(8));
        for ch in 0..2 {
            let filter = bank.channel(ch).unwrap();
            assert_eq!(filter.order(), Some(8));
            assert!(filter.capacity() >= 16);
        }
    }

    /// A failed order change leaves every channel at the old order with its
    /// history, and the bank still asks for the new order on the next block.
    #[test]
    fn test_failed_set_order_changes_no_channel() {
        let mut bank = stereo(2);
        push(&mut bank, 0, &[3.0]);
        push(&mut bank, 1, &[5.0]);

        let err = bank.set_order(i64::MAX).unwrap_err();

        assert!(matches!(err, FilterError::Allocation { .. }), "got {err:?}");
        assert_eq!(bank.order(), 2);
        assert!(bank.needs_order(8));
        for ch in 0..2 {
            assert_eq!(bank.channel(ch).unwrap().order(), Some(2));
        }
        assert_eq!(push(&mut bank, 0, &[0.0, 0.0]), vec![0.0, 3.0]);
        assert_eq!(push(&mut bank, 1, &[0.0, 0.0]), vec![0.0, 5.0]);
    }

    #[test]
    fn test_invalid_order_changes_no_channel() {
        let mut bank = stereo(3);

        assert_eq!(
            bank.set_order(0),
            Err(FilterError::InvalidParameter { order: 0 })
        );
        assert_eq!(bank.order(), 3);
        for ch in 0..2 {
            assert_eq!(bank.channel(ch).unwrap().order(), Some(3));
        }
    }

    #[test]
    fn test_tail_is_one_delay_period() {
        let mut bank = FilterBank::new(1, 44100.0, 512).unwrap();
        assert_eq!(bank.tail_samples(), 0);

        bank.set_order(441).unwrap();

        assert_eq!(bank.tail_samples(), 441);
    }

    #[test]
    fn test_clear_silences_every_channel() {
        let mut bank = stereo(1);
        push(&mut bank, 0, &[2.0]);
        push(&mut bank, 1, &[4.0]);

        bank.clear();

        assert_eq!(push(&mut bank, 0, &[0.0]), vec![0.0]);
        assert_eq!(push(&mut bank, 1, &[0.0]), vec![0.0]);
        assert_eq!(bank.order(), 1);
    }
}
