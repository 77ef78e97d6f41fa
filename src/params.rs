//! # Plugin Parameters
//!
//! The two knobs the host exposes: the comb's **order** (delay length in
//! samples) and its **gain** (how loud the delayed copy is). The string IDs
//! (`#[id = "..."]`) are what the host stores in presets, so they must
//! never change once published.
//!
//! The order is an integer number of samples rather than a time in ms.
//! Comb notches sit at multiples of `sample_rate / order`, so thinking in
//! samples is the natural unit for this filter.

use nih_plug::prelude::*;

/// Longest delay line the order knob can ask for: one second at 192 kHz.
pub const MAX_ORDER: i32 = 192_000;

/// Order used until the user moves the knob.
pub const DEFAULT_ORDER: i32 = 200;

#[derive(Params)]
pub struct PluginParams {
    /// **Order**: the delay length in samples.
    ///
    /// Changing it rebuilds the delay line from silence, so automating it
    /// produces a short gap in the echo. It is applied at the start of the
    /// next processing block, never halfway through one.
    #[id = "order"]
    pub order: IntParam,

    /// **Gain**: the feedforward coefficient on the delayed sample.
    ///
    /// - `+1.0` = peaks at multiples of `sample_rate / order`, full notches
    ///   halfway between them
    /// - `0.0` = the filter is a wire
    /// - `-1.0` = peaks and notches swap places
    ///
    /// The range stops at ±1.0 so the output never exceeds twice the input.
    #[id = "gain"]
    pub gain: FloatParam,
}

impl Default for PluginParams {
    fn default() -> Self {
        Self {
            order: IntParam::new(
                "Order",
                DEFAULT_ORDER,
                IntRange::Linear {
                    min: 1,
                    max: MAX_ORDER,
                },
            )
            .with_unit(" smp"),

            gain: FloatParam::new(
                "Gain",
                crate::dsp::delay_line::DEFAULT_GAIN,
                FloatRange::Linear {
                    min: -1.0,
                    max: 1.0,
                },
            )
            // Ramp over 20ms so gain automation doesn't click.
            .with_smoother(SmoothingStyle::Linear(20.0))
            .with_step_size(0.001),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PluginParams::default();

        assert_eq!(params.order.value(), DEFAULT_ORDER);
        assert!((params.gain.value() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_order_range_excludes_zero() {
        let params = PluginParams::default();

        // The knob's minimum still maps to a valid delay line.
        assert_eq!(params.order.preview_plain(0.0), 1);
        assert_eq!(params.order.preview_plain(1.0), MAX_ORDER);
    }
}
