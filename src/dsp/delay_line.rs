//! # Delay Line Filter (Feedforward Comb)
//!
//! A feedforward comb filter adds a delayed, scaled copy of the input to
//! the input itself:
//!
//! ```text
//! y[t] = x[t] + g * x[t - N]
//! ```
//!
//! where `N` is the *order* (the delay length in samples) and `g` is the
//! gain. The frequency response has `N` evenly spaced peaks and notches
//! between 0 Hz and the sample rate, which is where the "comb" name comes
//! from. With `g = 1.0` the notches go all the way to silence; with
//! `g = -1.0` the peaks and notches swap places.
//!
//! ## One Ring, One Cursor
//!
//! The past `N` inputs live in a ring buffer of exactly `N` slots. The read
//! tap has to trail the write tap by `N` positions, and on a ring of `N`
//! slots that is the *same* slot. So a single cursor serves both:
//!
//! 1. Read the slot under the cursor. It holds `x[t - N]`, written exactly
//!    `N` calls ago (or `0.0` if fewer than `N` samples have been seen).
//! 2. Overwrite that slot with `x[t]`.
//! 3. Advance the cursor, wrapping to 0 at `N`.
//!
//! The cursor is always in `0..N`, so every buffer access is in bounds.
//!
//! ## Reconfiguring
//!
//! Changing the order gives a zero-filled delay line of the new length. The
//! old history is discarded, not resampled: after `set_order(8)` the next 8
//! outputs see a silent delay line. [`DelayLineFilter::reserve`] sets aside
//! room for the longest order up front; any order that fits is then applied
//! by zero-filling the existing allocation, so reconfiguring from the audio
//! thread is allocation-free. [`DelayLineFilter::process`] never allocates.
//!
//! The filter does no locking. Whoever owns it must not call `set_order()`
//! while a `process()` call is in flight; the plugin only reconfigures
//! between processing blocks.

use super::error::FilterError;
use nih_plug::nih_trace;

/// Gain used until the host sets one.
pub const DEFAULT_GAIN: f32 = 0.7;

/// Convert a host-supplied order into a buffer length, rejecting zero and
/// negative values.
pub fn checked_order(order: i64) -> Result<usize, FilterError> {
    usize::try_from(order)
        .ok()
        .filter(|&len| len > 0)
        .ok_or(FilterError::InvalidParameter { order })
}

/// An order-N feedforward comb filter over a circular sample buffer.
///
/// A freshly constructed filter has no buffer. Call
/// [`set_order()`](Self::set_order) before processing any audio.
#[derive(Debug)]
pub struct DelayLineFilter {
    /// The last `order` input samples. Empty until the first successful
    /// `set_order()`; afterwards `buffer.len()` *is* the order.
    buffer: Vec<f32>,

    /// Shared read/write position. Always `< buffer.len()` once configured.
    pos: usize,

    /// Feedforward coefficient applied to the delayed sample. Not clamped;
    /// keep `|gain| <= 1.0` for an output no louder than twice the input.
    gain: f32,

    /// Host sample rate in Hz. The order is in samples, so this is only
    /// used to report the delay as a time.
    sample_rate: f32,
}

impl DelayLineFilter {
    /// Create an unconfigured filter for a host running at `sample_rate` Hz.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            buffer: Vec::new(),
            pos: 0,
            gain: DEFAULT_GAIN,
            sample_rate,
        }
    }

    /// Make room for delay lines of up to `max_order` samples, so later
    /// `set_order()` calls within that size never touch the allocator.
    ///
    /// The current order, history and cursor are untouched. Call this from
    /// a non-realtime context (the plugin does it in `initialize()`).
    pub fn reserve(&mut self, max_order: usize) -> Result<(), FilterError> {
        let additional = max_order.saturating_sub(self.buffer.len());
        self.buffer
            .try_reserve_exact(additional)
            .map_err(|source| FilterError::Allocation {
                order: max_order,
                source,
            })
    }

    /// How many samples the delay line can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Set the delay length to `order` samples and return the applied order.
    ///
    /// The delay line restarts from silence with the cursor at the start.
    /// Within the reserved [`capacity()`](Self::capacity) the existing
    /// allocation is reused; beyond it a new buffer is allocated. If `order`
    /// is not positive, or the allocation fails, the filter is left exactly
    /// as it was.
    pub fn set_order(&mut self, order: i64) -> Result<usize, FilterError> {
        let len = checked_order(order)?;

        if len <= self.buffer.capacity() {
            self.buffer.clear();
            self.buffer.resize(len, 0.0);
        } else {
            // Build the new buffer off to the side so a failed reservation
            // leaves the current one untouched.
            let mut buffer = Vec::new();
            buffer
                .try_reserve_exact(len)
                .map_err(|source| FilterError::Allocation { order: len, source })?;
            buffer.resize(len, 0.0);
            self.buffer = buffer;
        }
        self.pos = 0;

        nih_trace!("delay line order set to {len} samples");
        Ok(len)
    }

    /// The current order, or `None` if no order has been set yet.
    pub fn order(&self) -> Option<usize> {
        self.is_configured().then_some(self.buffer.len())
    }

    /// Replace the gain and return it. Takes effect on the next sample.
    pub fn set_gain(&mut self, gain: f32) -> f32 {
        self.gain = gain;
        self.gain
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The delay length in milliseconds at the construction sample rate.
    ///
    /// ```text
    /// delay_ms = order * 1000 / sample_rate
    /// ```
    pub fn delay_ms(&self) -> Option<f32> {
        self.order()
            .map(|order| order as f32 * 1000.0 / self.sample_rate)
    }

    pub fn is_configured(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Filter one sample.
    ///
    /// Returns [`FilterError::NotConfigured`] if no order has been set.
    /// Never allocates.
    #[inline]
    pub fn process(&mut self, input: f32) -> Result<f32, FilterError> {
        let order = self.buffer.len();
        let slot = self
            .buffer
            .get_mut(self.pos)
            .ok_or(FilterError::NotConfigured)?;

        // Read x[t - N] and store x[t] in its place.
        let delayed = std::mem::replace(slot, input);
        self.pos = (self.pos + 1) % order;

        Ok(self.gain * delayed + input)
    }

    /// Silence the delay line without reallocating it.
    ///
    /// Called from the plugin's `reset()` so that stale input doesn't echo
    /// into the next playback. Does nothing on an unconfigured filter.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────
