use crate::audio::constants::power_to_db;
use triple_buffer::TripleBuffer;

/// What the gate did with the most recent block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateSnapshot {
    pub envelope: f32,
    /// Mean squared amplitude of the block
    pub energy: f32,
    pub gate_open: bool,
    pub block_size: usize,
}

impl Default for GateSnapshot {
    fn default() -> Self {
        Self {
            envelope: 1.0,
            energy: 0.0,
            gate_open: true,
            block_size: 0,
        }
    }
}

impl GateSnapshot {
    /// One-line status for the editor
    ///
    /// The block size is shown because the envelope steps once per block, so
    /// attack/release timing follows the host buffer size.
    pub fn readout(&self) -> String {
        let state = if self.gate_open { "OPEN" } else { "CLOSED" };
        format!(
            "{state}  env {:.3}  {:.1} dB  {} smp/block",
            self.envelope,
            power_to_db(self.energy),
            self.block_size
        )
    }
}

/// Audio thread side of the telemetry triple buffer
pub struct TelemetryProducer {
    input: triple_buffer::Input<GateSnapshot>,
}

impl TelemetryProducer {
    // Called from audio thread - snapshot is Copy, so no allocation
    pub fn publish(&mut self, snapshot: GateSnapshot) {
        self.input.write(snapshot);
    }
}

/// UI thread side, always sees the newest complete snapshot
pub struct TelemetryConsumer {
    output: triple_buffer::Output<GateSnapshot>,
}

impl TelemetryConsumer {
    pub fn latest(&mut self) -> GateSnapshot {
        *self.output.read()
    }
}

pub fn create_telemetry_channel() -> (TelemetryProducer, TelemetryConsumer) {
    let (input, output) = TripleBuffer::new(&GateSnapshot::default()).split();
    (TelemetryProducer { input }, TelemetryConsumer { output })
}
