//! Audio system using the Web Audio API
//!
//! Every effect is synthesized from oscillators - no audio files. All
//! failures are absorbed here: a missing or suspended AudioContext can
//! never affect game state.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Normal target destroyed
    DestroyNormal,
    /// Fast target destroyed
    DestroyFast,
    /// Golden target destroyed
    DestroyGolden,
    /// Boss target destroyed
    DestroyBoss,
    /// Power-up collected
    PowerUpCollect,
    /// Combo reached a multiplier tier
    ComboMilestone,
    /// Countdown alarm sweep (repeats while playing)
    Alarm,
    /// Mission success fanfare
    Success,
    /// Mission failure
    Failure,
    /// Quiz answer was right
    QuizCorrect,
    /// Quiz answer was wrong
    QuizWrong,
    /// UI button press
    ButtonClick,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
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

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
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

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect (fire-and-forget)
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::DestroyNormal => self.play_destroy_normal(ctx, vol),
            SoundEffect::DestroyFast => self.play_destroy_fast(ctx, vol),
            SoundEffect::DestroyGolden => self.play_destroy_golden(ctx, vol),
            SoundEffect::DestroyBoss => self.play_destroy_boss(ctx, vol),
            SoundEffect::PowerUpCollect => self.play_power_up(ctx, vol),
            SoundEffect::ComboMilestone => self.play_combo_milestone(ctx, vol),
            SoundEffect::Alarm => self.play_alarm(ctx, vol),
            SoundEffect::Success => self.play_success(ctx, vol),
            SoundEffect::Failure => self.play_failure(ctx, vol),
            SoundEffect::QuizCorrect => self.play_quiz_correct(ctx, vol),
            SoundEffect::QuizWrong => self.play_quiz_wrong(ctx, vol),
            SoundEffect::ButtonClick => self.play_button_click(ctx, vol),
        }
    }

    // === Sound generators ===

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

    /// Normal target - quick zap down
    fn play_destroy_normal(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(200.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Fast target - short high blip
    fn play_destroy_fast(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();
        osc.frequency().set_value_at_time(1200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1800.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Golden target - sparkly chime
    fn play_destroy_golden(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [1200.0, 1800.0, 2400.0].iter().enumerate() {
            let delay = i as f64 * 0.02;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }
    }

    /// Boss target - boom
    fn play_destroy_boss(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.4)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.5).ok();
        }

        // High frequency crack
        if let Some((osc, gain)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    /// Power-up collect - happy ding
    fn play_power_up(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Combo milestone - rising arpeggio
    fn play_combo_milestone(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.0, 659.0, 784.0, 1046.0].iter().enumerate() {
            let delay = i as f64 * 0.05;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }

    /// Countdown alarm - orchestral sweep, staged warning tones, low rumble
    fn play_alarm(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        // Dramatic sweep up and back down
        if let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(0.001, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.3, t + 0.2)
                .ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.3, t + 1.4)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.6)
                .ok();
            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1760.0, t + 0.8)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(440.0, t + 1.6)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.6).ok();
        }

        // Staged warning tones
        for (i, freq) in [880.0, 1100.0, 1320.0, 1760.0].iter().enumerate() {
            let at = t + 0.3 + i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.2, at).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, at + 0.2)
                    .ok();
                osc.start_with_when(at).ok();
                osc.stop_with_when(at + 0.2).ok();
            }
        }

        // Deep rumble underneath
        if let Some((osc, gain)) = self.create_osc(ctx, 80.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.6)
                .ok();
            osc.frequency().set_value_at_time(80.0, t).ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(120.0, t + 1.6)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.6).ok();
        }
    }

    /// Success - celebration bass plus an eight-note melody
    fn play_success(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.25, t + 2.0)
                .ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.15, t + 8.0)
                .ok();
            osc.frequency().set_value_at_time(110.0, t).ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(220.0, t + 4.0)
                .ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(110.0, t + 8.0)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 8.0).ok();
        }

        let melody = [440.0, 523.0, 659.0, 784.0, 659.0, 523.0, 440.0, 523.0];
        for (i, freq) in melody.iter().enumerate() {
            let at = t + 1.0 + i as f64 * 0.8;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.12, at).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, at + 0.6)
                    .ok();
                osc.start_with_when(at).ok();
                osc.stop_with_when(at + 0.6).ok();
            }
        }
    }

    /// Failure - sad descending tones
    fn play_failure(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// Quiz correct - bright ascending pair
    fn play_quiz_correct(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [660.0, 880.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }

    /// Quiz wrong - low descending buzz
    fn play_quiz_wrong(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.35)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(110.0, t + 0.35)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.4).ok();
    }

    /// Button press - short blip
    fn play_button_click(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }
}
