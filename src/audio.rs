//! Procedural tone playback
//!
//! The simulation only asks for "a tone at F Hz"; sinks decide how (or
//! whether) to make it audible. On wasm32 the Web Audio API is used; when it
//! is unavailable every request becomes a no-op.

/// Fire-and-forget tone output
pub trait ToneSink {
    /// Play a sine tone; `duration` is in seconds
    fn play_tone(&mut self, frequency: f32, duration: f32);

    /// Master gain (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);
}

/// Sink that discards every tone (headless runs, missing audio device)
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ToneSink for Silent {
    fn play_tone(&mut self, frequency: f32, duration: f32) {
        log::trace!("tone {:.2}Hz for {:.2}s (silent)", frequency, duration);
    }

    fn set_volume(&mut self, _volume: f32) {}
}

/// Keeps every requested tone; handy for tests and replays
#[derive(Debug, Default, Clone)]
pub struct ToneLog {
    pub tones: Vec<(f32, f32)>,
    pub volume: f32,
}

impl ToneSink for ToneLog {
    fn play_tone(&mut self, frequency: f32, duration: f32) {
        self.tones.push((frequency, duration));
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

/// Peak gain of a note tone before the master volume
pub const TONE_GAIN: f32 = 0.1;
/// Gain the envelope decays to
pub const TONE_FLOOR: f32 = 0.01;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{TONE_FLOOR, TONE_GAIN, ToneSink};

    /// Web Audio tone sink
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context or without an output device
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx, volume: 0.7 }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }

    impl ToneSink for AudioManager {
        fn play_tone(&mut self, frequency: f32, duration: f32) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers start contexts suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some((osc, gain)) = self.create_osc(ctx, frequency, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();
            let end = t + duration as f64;

            gain.gain().set_value_at_time(TONE_GAIN * self.volume, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(TONE_FLOOR, end)
                .ok();
            osc.frequency().set_value_at_time(frequency, t).ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(end).ok();
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}

/// Best available sink for this platform
#[cfg(target_arch = "wasm32")]
pub fn default_sink() -> Box<dyn ToneSink> {
    Box::new(AudioManager::new())
}

/// Best available sink for this platform
#[cfg(not(target_arch = "wasm32"))]
pub fn default_sink() -> Box<dyn ToneSink> {
    log::info!("No native audio backend, tones are silent");
    Box::new(Silent)
}
