//! Property-based tests for the gate engine.
//!
//! Uses proptest to check invariants that must hold for any block and any
//! parameter values the host (or a misbehaving host) might send.

use proptest::prelude::*;
use smart_noise_gate::audio::gate_engine::{GateEngine, GateParameters};

fn as_slices(data: &mut [Vec<f32>]) -> Vec<&mut [f32]> {
    data.iter_mut().map(|channel| channel.as_mut_slice()).collect()
}

fn block(num_channels: usize, num_samples: usize) -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(
        prop::collection::vec(-1.0f32..=1.0f32, num_samples),
        num_channels,
    )
}

fn any_block() -> impl Strategy<Value = Vec<Vec<f32>>> {
    (1usize..=4, 1usize..=256).prop_flat_map(|(channels, samples)| block(channels, samples))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Whatever the input and however far out of range the controls are,
    /// the envelope never leaves [0, 1].
    #[test]
    fn envelope_stays_in_unit_range(
        blocks in prop::collection::vec(any_block(), 1..20),
        threshold in -1.0f32..10.0,
        attack in -1.0f32..10.0,
        release in -1.0f32..10.0,
    ) {
        let mut gate = GateEngine::new();
        let params = GateParameters::new(threshold, attack, release);

        for mut data in blocks {
            gate.process_block(&mut as_slices(&mut data), params);
            prop_assert!((0.0..=1.0).contains(&gate.envelope()));
        }
    }

    /// Every output sample is the input sample times the updated envelope.
    #[test]
    fn output_is_input_scaled_by_envelope(
        warmup in prop::collection::vec(any_block(), 0..8),
        input in any_block(),
    ) {
        let mut gate = GateEngine::new();
        for mut data in warmup {
            gate.process_block(&mut as_slices(&mut data), GateParameters::default());
        }

        let mut output = input.clone();
        gate.process_block(&mut as_slices(&mut output), GateParameters::default());
        let envelope = gate.envelope();

        for (in_channel, out_channel) in input.iter().zip(output.iter()) {
            for (&x, &y) in in_channel.iter().zip(out_channel.iter()) {
                prop_assert_eq!(y, x * envelope);
            }
        }
    }

    /// Blocks without samples never touch the envelope.
    #[test]
    fn empty_blocks_leave_envelope_alone(
        warmup in prop::collection::vec(any_block(), 0..8),
        num_channels in 0usize..8,
    ) {
        let mut gate = GateEngine::new();
        for mut data in warmup {
            gate.process_block(&mut as_slices(&mut data), GateParameters::default());
        }
        let before = gate.envelope();

        let mut empty = vec![Vec::new(); num_channels];
        gate.process_block(&mut as_slices(&mut empty), GateParameters::default());

        prop_assert_eq!(gate.envelope(), before);
    }

    /// Interleaving blocks for two instances gives each the same envelope
    /// it reaches when run alone.
    #[test]
    fn instances_are_independent(
        first_blocks in prop::collection::vec(any_block(), 1..12),
        second_blocks in prop::collection::vec(any_block(), 1..12),
        threshold in 0.0001f32..0.1,
    ) {
        let params = GateParameters::new(threshold, 0.05, 0.3);

        let mut first_alone = GateEngine::new();
        for block in &first_blocks {
            let mut data = block.clone();
            first_alone.process_block(&mut as_slices(&mut data), params);
        }
        let mut second_alone = GateEngine::new();
        for block in &second_blocks {
            let mut data = block.clone();
            second_alone.process_block(&mut as_slices(&mut data), params);
        }

        let mut first = GateEngine::new();
        let mut second = GateEngine::new();
        let rounds = first_blocks.len().max(second_blocks.len());
        for i in 0..rounds {
            if let Some(block) = first_blocks.get(i) {
                let mut data = block.clone();
                first.process_block(&mut as_slices(&mut data), params);
            }
            if let Some(block) = second_blocks.get(i) {
                let mut data = block.clone();
                second.process_block(&mut as_slices(&mut data), params);
            }
        }

        prop_assert_eq!(first.envelope(), first_alone.envelope());
        prop_assert_eq!(second.envelope(), second_alone.envelope());
    }
}
