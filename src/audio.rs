//! Sound effects
//!
//! The simulation only ever talks to a [`SoundPort`]. On wasm32 the
//! [`WebAudio`] port synthesises every effect with the Web Audio API, no
//! external files needed.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball bounces off a blob
    PlayerHit,
    /// Ball hits a side wall
    WallHit,
    /// Ball hits the net
    NetHit,
    /// A blob leaves the ground
    Jump,
    /// Rally won by the human side
    PointWon,
    /// Rally lost by the human side
    PointLost,
    /// Match decided
    GameOver,
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        use crate::sim::PlayerId;

        match *event {
            GameEvent::Jump { .. } => Some(SoundEffect::Jump),
            GameEvent::BallHitPlayer { .. } => Some(SoundEffect::PlayerHit),
            GameEvent::BallHitNet => Some(SoundEffect::NetHit),
            GameEvent::BallHitWall => Some(SoundEffect::WallHit),
            GameEvent::PointScored {
                scorer: PlayerId::One,
                ..
            } => Some(SoundEffect::PointWon),
            GameEvent::PointScored {
                scorer: PlayerId::Two,
                ..
            } => Some(SoundEffect::PointLost),
            GameEvent::MatchOver { .. } => Some(SoundEffect::GameOver),
        }
    }
}

/// Fire-and-forget sink for sound effects
pub trait SoundPort {
    fn play(&mut self, effect: SoundEffect);
}

/// Port that swallows every sound
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundPort for Silent {
    fn play(&mut self, _effect: SoundEffect) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, SoundPort};

    /// Web Audio backed port
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Set SFX volume (0.0 - 1.0)
        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
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

        /// Single tone with an exponential fade, optionally sliding in pitch
        fn blip(
            ctx: &AudioContext,
            vol: f32,
            osc_type: OscillatorType,
            from_hz: f32,
            to_hz: f32,
            length: f64,
            delay: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, from_hz, osc_type) else {
                return;
            };
            let t = ctx.current_time() + delay;

            gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + length)
                .ok();
            if to_hz != from_hz {
                osc.frequency().set_value_at_time(from_hz, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to_hz, t + length)
                    .ok();
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Short ascending or descending run of notes
        fn arpeggio(ctx: &AudioContext, vol: f32, notes: &[f32], osc_type: OscillatorType) {
            for (i, freq) in notes.iter().enumerate() {
                Self::blip(ctx, vol, osc_type, *freq, *freq, 0.15, i as f64 * 0.1);
            }
        }
    }

    impl SoundPort for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                // Squishy thump: low sine sliding down
                SoundEffect::PlayerHit => {
                    Self::blip(ctx, vol * 0.6, OscillatorType::Sine, 220.0, 90.0, 0.12, 0.0)
                }
                SoundEffect::WallHit => {
                    Self::blip(ctx, vol * 0.3, OscillatorType::Sine, 400.0, 400.0, 0.08, 0.0)
                }
                SoundEffect::NetHit => {
                    Self::blip(ctx, vol * 0.3, OscillatorType::Triangle, 300.0, 180.0, 0.1, 0.0)
                }
                // Boing: rising triangle
                SoundEffect::Jump => {
                    Self::blip(ctx, vol * 0.3, OscillatorType::Triangle, 200.0, 500.0, 0.15, 0.0)
                }
                SoundEffect::PointWon => Self::arpeggio(
                    ctx,
                    vol * 0.3,
                    &[523.25, 659.25, 783.99],
                    OscillatorType::Triangle,
                ),
                SoundEffect::PointLost => Self::arpeggio(
                    ctx,
                    vol * 0.3,
                    &[392.0, 329.63, 261.63],
                    OscillatorType::Sine,
                ),
                SoundEffect::GameOver => Self::arpeggio(
                    ctx,
                    vol * 0.35,
                    &[523.25, 392.0, 329.63, 261.63],
                    OscillatorType::Sine,
                ),
            }
        }
    }
}
