use crate::audio::constants::{
    ATTACK_DEFAULT, ATTACK_MAX, ATTACK_MIN, ENVELOPE_RESET, GATE_OPEN_ENVELOPE, RELEASE_DEFAULT,
    RELEASE_MAX, RELEASE_MIN, THRESHOLD_DEFAULT, THRESHOLD_MAX, THRESHOLD_MIN,
};

/// Plain snapshot of the three gate controls for one block
///
/// The engine never looks at how the host stores or automates these, it only
/// sees the values handed to it for the current block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateParameters {
    /// Mean squared amplitude above which the gate opens
    pub threshold: f32,
    /// Smoothing coefficient while opening
    pub attack: f32,
    /// Smoothing coefficient while closing
    pub release: f32,
}

impl Default for GateParameters {
    fn default() -> Self {
        Self {
            threshold: THRESHOLD_DEFAULT,
            attack: ATTACK_DEFAULT,
            release: RELEASE_DEFAULT,
        }
    }
}

impl GateParameters {
    pub fn new(threshold: f32, attack: f32, release: f32) -> Self {
        Self {
            threshold,
            attack,
            release,
        }
    }

    /// Clamp every value into its declared range
    ///
    /// Coefficients must stay inside [0, 1] or the envelope overshoots and
    /// oscillates. Non-finite values fall back to the default since
    /// `f32::clamp` passes NaN through.
    pub fn clamped(self) -> Self {
        Self {
            threshold: clamp_or_default(
                self.threshold,
                THRESHOLD_MIN,
                THRESHOLD_MAX,
                THRESHOLD_DEFAULT,
            ),
            attack: clamp_or_default(self.attack, ATTACK_MIN, ATTACK_MAX, ATTACK_DEFAULT),
            release: clamp_or_default(self.release, RELEASE_MIN, RELEASE_MAX, RELEASE_DEFAULT),
        }
    }
}

fn clamp_or_default(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

/// Block-rate RMS noise gate
///
/// One envelope value is computed per block and applied to every sample of
/// every channel. The envelope moves once per block, not once per sample, so
/// the audible attack/release time scales with the host's buffer size. See
/// [`block_time_constant`] for the resulting time constant.
#[derive(Debug, Clone)]
pub struct GateEngine {
    envelope: f32,
    /// Energy of the most recent non-empty block, for telemetry only
    last_energy: f32,
}

impl Default for GateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GateEngine {
    pub fn new() -> Self {
        Self {
            envelope: ENVELOPE_RESET,
            last_energy: 0.0,
        }
    }

    /// Stream (re)start hook: the gate always starts fully open
    pub fn on_stream_start(&mut self) {
        self.envelope = ENVELOPE_RESET;
        self.last_energy = 0.0;
    }

    /// Gate one block in place
    ///
    /// Empty blocks (no channels or no samples) leave both the buffer and the
    /// envelope untouched.
    pub fn process_block(&mut self, channels: &mut [&mut [f32]], params: GateParameters) {
        let params = params.clamped();

        let Some(energy) = block_energy(channels) else {
            return;
        };
        self.last_energy = energy;

        // Hard binary decision, the smoothing below does the rest
        let target_gain = if energy > params.threshold { 1.0 } else { 0.0 };

        let coeff = if target_gain > self.envelope {
            params.attack
        } else {
            params.release
        };
        self.envelope += (target_gain - self.envelope) * coeff;

        nih_plug::nih_debug_assert!((0.0..=1.0).contains(&self.envelope));

        let gain = self.envelope;
        for channel in channels.iter_mut() {
            for sample in channel.iter_mut() {
                *sample *= gain;
            }
        }
    }

    /// Current envelope value in [0, 1]
    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    /// Mean squared amplitude of the last processed block
    pub fn last_energy(&self) -> f32 {
        self.last_energy
    }

    pub fn is_open(&self) -> bool {
        self.envelope > GATE_OPEN_ENVELOPE
    }
}

/// Mean squared amplitude over all samples of all channels
///
/// Returns `None` when the block holds no samples.
pub fn block_energy(channels: &[&mut [f32]]) -> Option<f32> {
    let mut energy = 0.0f32;
    let mut total_samples = 0usize;

    for channel in channels.iter() {
        for &sample in channel.iter() {
            energy += sample * sample;
        }
        total_samples += channel.len();
    }

    if total_samples == 0 {
        None
    } else {
        Some(energy / total_samples as f32)
    }
}

/// Time constant in seconds of a one-pole step of `coeff` applied once per
/// block of `block_size` samples
///
/// `coeff <= 0` never moves (infinite), `coeff >= 1` jumps straight to the
/// target (zero).
pub fn block_time_constant(coeff: f32, block_size: usize, sample_rate: f32) -> f32 {
    if coeff <= 0.0 || block_size == 0 || sample_rate <= 0.0 {
        return f32::INFINITY;
    }
    if coeff >= 1.0 {
        return 0.0;
    }

    let block_duration = block_size as f32 / sample_rate;
    -block_duration / (1.0 - coeff).ln()
}
