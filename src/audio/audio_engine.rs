use crate::audio::gate_engine::{GateEngine, GateParameters};
use crate::audio::gate_telemetry::{GateSnapshot, TelemetryProducer};
use crate::audio::meter::MeterProducer;
use nih_plug::prelude::*;

/// Per-block pipeline: input meter, gate, output meter, telemetry
///
/// Owns the gate so every plugin instance has its own envelope.
pub struct AudioEngine {
    gate: GateEngine,
    meters: MeterProducer,
    telemetry: TelemetryProducer,
}

impl AudioEngine {
    pub fn new(meters: MeterProducer, telemetry: TelemetryProducer) -> Self {
        Self {
            gate: GateEngine::new(),
            meters,
            telemetry,
        }
    }

    /// Stream (re)start
    pub fn reset(&mut self) {
        self.gate.on_stream_start();
        self.meters.clear();
        self.publish(0);
    }

    pub fn process(&mut self, buffer: &mut Buffer, params: GateParameters) {
        let block_size = buffer.samples();
        self.process_channels(buffer.as_slice(), params);
        self.publish(block_size);
    }

    /// Same as [`Self::process`] on raw channel slices
    pub fn process_channels(&mut self, channels: &mut [&mut [f32]], params: GateParameters) {
        self.meters.record_input(channels);
        self.gate.process_block(channels, params);
        self.meters.record_output(channels);
    }

    pub fn gate(&self) -> &GateEngine {
        &self.gate
    }

    fn publish(&mut self, block_size: usize) {
        self.telemetry.publish(GateSnapshot {
            envelope: self.gate.envelope(),
            energy: self.gate.last_energy(),
            gate_open: self.gate.is_open(),
            block_size,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::gate_telemetry::create_telemetry_channel;
    use crate::audio::meter::create_meter_channels;
    use std::sync::atomic::Ordering;

    #[test]
    fn meters_bracket_the_gate() {
        let (producer, _consumer) = create_meter_channels();
        let (telemetry, _) = create_telemetry_channel();
        let mut engine = AudioEngine::new(producer.clone(), telemetry);

        let mut left = [0.0001f32; 32];
        let mut right = [0.0001f32; 32];
        let mut channels: [&mut [f32]; 2] = [&mut left, &mut right];
        engine.process_channels(&mut channels, GateParameters::default());

        let input_db = producer.input_peak.load(Ordering::Relaxed);
        let output_db = producer.output_peak.load(Ordering::Relaxed);
        // 0.9 gain after one release step
        assert!((input_db - output_db - (-util::gain_to_db(0.9))).abs() < 1e-3);
        assert!((engine.gate().envelope() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn reset_reopens_gate_and_publishes() {
        let (producer, _) = create_meter_channels();
        let (telemetry, mut consumer) = create_telemetry_channel();
        let mut engine = AudioEngine::new(producer, telemetry);

        let mut mono = [0.0f32; 64];
        for _ in 0..20 {
            let mut channels: [&mut [f32]; 1] = [&mut mono];
            engine.process_channels(&mut channels, GateParameters::default());
        }
        assert!(!engine.gate().is_open());

        engine.reset();
        let snapshot = consumer.latest();
        assert_eq!(snapshot.envelope, 1.0);
        assert!(snapshot.gate_open);
    }

    #[test]
    fn threshold_change_applies_on_next_block() {
        let (producer, _) = create_meter_channels();
        let (telemetry, _) = create_telemetry_channel();
        let mut engine = AudioEngine::new(producer, telemetry);

        // 0.05² = 0.0025: above the 0.001 default, below 0.01
        let mut left = [0.05f32; 64];
        let mut right = [0.05f32; 64];
        let mut channels: [&mut [f32]; 2] = [&mut left, &mut right];
        engine.process_channels(&mut channels, GateParameters::new(0.001, 0.01, 0.1));
        assert_eq!(engine.gate().envelope(), 1.0);

        let mut left = [0.05f32; 64];
        let mut right = [0.05f32; 64];
        let mut channels: [&mut [f32]; 2] = [&mut left, &mut right];
        engine.process_channels(&mut channels, GateParameters::new(0.01, 0.01, 0.1));
        assert!((engine.gate().envelope() - 0.9).abs() < 1e-6);
        assert!((left[0] - 0.045).abs() < 1e-7);

        // Lowering it again reopens with the attack coefficient from this block
        let mut left = [0.05f32; 64];
        let mut channels: [&mut [f32]; 1] = [&mut left];
        engine.process_channels(&mut channels, GateParameters::new(0.001, 0.05, 0.1));
        assert!((engine.gate().envelope() - (0.9 + 0.1 * 0.05)).abs() < 1e-6);
    }
}
