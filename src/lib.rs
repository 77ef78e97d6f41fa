//! # BallPass69: A Feedforward Comb Filter Plugin (AU/VST3/CLAP)
//!
//! A comb filter built with [nih-plug](https://github.com/robbert-vdh/nih-plug).
//! Each output sample is the input plus a scaled copy of the input from
//! `order` samples ago:
//!
//! ```text
//! y[t] = x[t] + gain * x[t - order]
//! ```
//!
//! ## Signal Flow
//!
//! ```text
//! Input ──┬───────────────────────────────────────►(+)──► Output
//!         │                                         ▲
//!         │                                         │
//!         └──► [Ring Buffer, `order` samples] ──► × gain
//! ```
//!
//! There is no feedback path: the delayed tap is taken from the input, so
//! the filter can never run away, whatever the gain.

pub mod dsp;
mod params;

use std::num::NonZeroU32;
use std::sync::Arc;

use dsp::bank::FilterBank;
use nih_plug::prelude::*;
use params::{PluginParams, MAX_ORDER};

/// The main plugin struct.
///
/// Parameters live behind an `Arc` because the host reads and writes them
/// from other threads. The filters are owned by the audio thread alone and
/// are only reconfigured at the top of `process()`, between blocks, so the
/// delay lines never need a lock.
#[derive(Default)]
struct BallPass69 {
    params: Arc<PluginParams>,

    /// One comb filter per audio channel, so stereo material keeps its
    /// image. Empty until `initialize()`.
    filters: FilterBank,
}

impl Plugin for BallPass69 {
    const NAME: &'static str = "BallPass69";
    const VENDOR: &'static str = "BallPass Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo first since most tracks are stereo; mono as a fallback.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;

    // Gain automation lands on the exact sample the host asks for. Order
    // changes still wait for the next block.
    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    /// Build one filter per channel at the host's sample rate and give each
    /// the current order.
    ///
    /// Returning `false` tells the host this configuration can't be used,
    /// which is what happens if the delay line can't be allocated.
    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let num_channels = audio_io_layout
            .main_input_channels
            .map(|c| c.get() as usize)
            .unwrap_or(2);

        // Reserve the longest delay line the order knob allows, so that
        // turning it later never allocates on the audio thread.
        // 192000 samples * 4 bytes is about 750 KB per channel.
        let max_order = MAX_ORDER as usize;
        let order = self.params.order.value();
        let filters = FilterBank::new(num_channels, buffer_config.sample_rate, max_order)
            .and_then(|mut filters| {
                filters.set_order(i64::from(order))?;
                Ok(filters)
            });

        match filters {
            Ok(filters) => {
                if let Some(filter) = filters.channel(0) {
                    nih_log!(
                        "initialized {num_channels} channel(s) at {} Hz, order {} ({:.2} ms)",
                        filter.sample_rate(),
                        filters.order(),
                        filter.delay_ms().unwrap_or_default()
                    );
                }
                self.filters = filters;
                true
            }
            Err(err) => {
                nih_error!("failed to initialize delay lines: {err}");
                false
            }
        }
    }

    /// Silence every delay line so old input doesn't echo into the next
    /// playback.
    fn reset(&mut self) {
        self.filters.clear();
    }

    /// Run the comb filter over the block, one sample at a time.
    ///
    /// 1. If the order knob moved, restart every delay line at the new
    ///    length (start of block only; the memory was reserved in
    ///    `initialize()`, so this does not allocate)
    /// 2. Per sample, read the smoothed gain
    /// 3. Per channel, push the sample through that channel's filter
    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        let order = self.params.order.value();
        if self.filters.needs_order(order) {
            if let Err(err) = self.filters.set_order(i64::from(order)) {
                nih_debug_assert_failure!("could not change order to {order}: {err}");
            }
        }

        for mut channel_samples in buffer.iter_samples() {
            let gain = self.params.gain.smoothed.next();

            for (channel_idx, sample) in channel_samples.iter_mut().enumerate() {
                let Some(filter) = self.filters.channel_mut(channel_idx) else {
                    continue;
                };

                filter.set_gain(gain);
                match filter.process(*sample) {
                    Ok(output) => *sample = output,
                    // Leave the dry sample in place rather than output
                    // silence.
                    Err(err) => {
                        nih_debug_assert_failure!("comb filter failed: {err}");
                    }
                }
            }
        }

        ProcessStatus::Tail(self.filters.tail_samples())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for BallPass69 {
    const CLAP_ID: &'static str = "com.ballpass-audio.ballpass69";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("A feedforward comb filter with adjustable order and gain");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Stereo,
        ClapFeature::Mono,
        ClapFeature::Filter,
    ];
}

impl Vst3Plugin for BallPass69 {
    // `*b"..."` turns a 16-character ASCII literal into the `[u8; 16]`
    // class ID. It must be unique across all VST3 plugins.
    const VST3_CLASS_ID: [u8; 16] = *b"BallPass69Comb01";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Filter];
}

// ─────────────────────────────────────────────────────────────────────
// Export macros
// ─────────────────────────────────────────────────────────────────────
//
// `clap_entry` for CLAP hosts, `GetPluginFactory` for VST3 hosts, and an
// AUv2 factory wrapping the CLAP entry so Logic Pro can load it too.

nih_export_clap!(BallPass69);
nih_export_vst3!(BallPass69);

clap_wrapper::export_auv2!();
