use crate::audio::constants::{METER_ATTACK, METER_RELEASE};
use atomic_float::AtomicF32;
use nih_plug::prelude::*;
use std::sync::{atomic::Ordering, Arc, Mutex};

/// Peak levels sent from audio thread to UI thread
#[derive(Clone)]
pub struct MeterProducer {
    /// Peak level before the gate, in dB
    pub input_peak: Arc<AtomicF32>,
    /// Peak level after the gate, in dB
    pub output_peak: Arc<AtomicF32>,
}

impl MeterProducer {
    /// Called from the audio thread, no allocations or locks
    pub fn record_input(&self, channels: &[&mut [f32]]) {
        self.input_peak
            .store(calculate_peak_db(channels), Ordering::Relaxed);
    }

    pub fn record_output(&self, channels: &[&mut [f32]]) {
        self.output_peak
            .store(calculate_peak_db(channels), Ordering::Relaxed);
    }

    /// Drop both meters to silence (stream restart)
    pub fn clear(&self) {
        self.input_peak
            .store(util::MINUS_INFINITY_DB, Ordering::Relaxed);
        self.output_peak
            .store(util::MINUS_INFINITY_DB, Ordering::Relaxed);
    }
}

struct MeterState {
    smoothed_input: f32,
    smoothed_output: f32,
}

impl Default for MeterState {
    fn default() -> Self {
        Self {
            smoothed_input: util::MINUS_INFINITY_DB,
            smoothed_output: util::MINUS_INFINITY_DB,
        }
    }
}

/// UI-side meter processing - attack/release smoothing
/// Peak hold is left to the editor's meter widget
#[derive(Clone)]
pub struct MeterConsumer {
    meter_input: MeterProducer,
    state: Arc<Mutex<MeterState>>,
}

impl MeterConsumer {
    fn new(meter_input: MeterProducer) -> Self {
        Self {
            meter_input,
            state: Arc::new(Mutex::new(MeterState::default())),
        }
    }

    /// Call once per editor frame before drawing the meters
    pub fn update(&self) {
        let input_db = self.meter_input.input_peak.load(Ordering::Relaxed);
        let output_db = self.meter_input.output_peak.load(Ordering::Relaxed);

        if let Ok(mut state) = self.state.lock() {
            state.smoothed_input = smooth(state.smoothed_input, input_db);
            state.smoothed_output = smooth(state.smoothed_output, output_db);
        }
    }

    /// Smoothed (input, output) levels in dB
    pub fn smoothed_levels(&self) -> (f32, f32) {
        if let Ok(state) = self.state.lock() {
            (state.smoothed_input, state.smoothed_output)
        } else {
            (util::MINUS_INFINITY_DB, util::MINUS_INFINITY_DB)
        }
    }
}

/// Attack/release ballistics in dB space
fn smooth(current: f32, target: f32) -> f32 {
    // First signal after silence shows up immediately
    if current <= util::MINUS_INFINITY_DB {
        return target;
    }

    let coeff = if target > current {
        METER_ATTACK
    } else {
        METER_RELEASE
    };
    target * coeff + current * (1.0 - coeff)
}

/// Create the meter pair
/// Returns (producer for audio thread, consumer for UI thread)
pub fn create_meter_channels() -> (MeterProducer, MeterConsumer) {
    let producer = MeterProducer {
        input_peak: Arc::new(AtomicF32::new(util::MINUS_INFINITY_DB)),
        output_peak: Arc::new(AtomicF32::new(util::MINUS_INFINITY_DB)),
    };
    let consumer = MeterConsumer::new(producer.clone());

    (producer, consumer)
}

/// Peak level across all channels, in dB
pub fn calculate_peak_db(channels: &[&mut [f32]]) -> f32 {
    let peak = channels
        .iter()
        .flat_map(|channel| channel.iter())
        .fold(0.0f32, |peak, sample| peak.max(sample.abs()));

    if peak > 0.0 {
        util::gain_to_db(peak)
    } else {
        util::MINUS_INFINITY_DB
    }
}
