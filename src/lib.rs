pub mod audio;
mod editor;
mod ui;

use audio::audio_engine::AudioEngine;
use audio::constants::{
    self, ATTACK_DEFAULT, ATTACK_MAX, ATTACK_MIN, RELEASE_DEFAULT, RELEASE_MAX, RELEASE_MIN,
    THRESHOLD_DEFAULT, THRESHOLD_MAX, THRESHOLD_MIN,
};
use audio::gate_engine::{block_time_constant, GateParameters};
use audio::gate_telemetry::{create_telemetry_channel, TelemetryConsumer};
use audio::meter::{create_meter_channels, MeterConsumer};
use editor::EditorInitFlags;
use nih_plug::prelude::*;
use nih_plug_iced::IcedState;
use std::sync::{Arc, Mutex};

pub struct SmartNoiseGate {
    params: Arc<SmartNoiseGateParams>,
    audio_engine: AudioEngine,

    /// UI ends of the meter and telemetry channels, handed to every editor
    meter_consumer: MeterConsumer,
    telemetry_consumer: Arc<Mutex<TelemetryConsumer>>,
}

#[derive(Params)]
pub struct SmartNoiseGateParams {
    /// Editor window size, restored with the rest of the plugin state
    #[persist = "editor-state"]
    editor_state: Arc<IcedState>,

    /// Mean squared amplitude above which the gate opens. These IDs are what the host stores
    /// in its session, so they must never change.
    #[id = "threshold"]
    pub threshold: FloatParam,

    #[id = "attack"]
    pub attack: FloatParam,

    #[id = "release"]
    pub release: FloatParam,
}

impl Default for SmartNoiseGate {
    fn default() -> Self {
        let (meter_producer, meter_consumer) = create_meter_channels();
        let (telemetry_producer, telemetry_consumer) = create_telemetry_channel();

        Self {
            params: Arc::new(SmartNoiseGateParams::default()),
            audio_engine: AudioEngine::new(meter_producer, telemetry_producer),
            meter_consumer,
            telemetry_consumer: Arc::new(Mutex::new(telemetry_consumer)),
        }
    }
}

impl Default for SmartNoiseGateParams {
    fn default() -> Self {
        Self {
            editor_state: IcedState::from_size(constants::EDITOR_WIDTH, constants::EDITOR_HEIGHT),

            // Threshold is a power value spanning three decades, the skew gives each decade
            // roughly the same knob travel
            threshold: FloatParam::new(
                "Threshold",
                THRESHOLD_DEFAULT,
                FloatRange::Skewed {
                    min: THRESHOLD_MIN,
                    max: THRESHOLD_MAX,
                    factor: FloatRange::skew_factor(-2.0),
                },
            )
            .with_value_to_string(Arc::new(|value| {
                format!("{value:.4} ({:.1} dB)", constants::power_to_db(value))
            })),

            // No smoothers on any of these: the gate reads one value per block
            attack: FloatParam::new(
                "Attack",
                ATTACK_DEFAULT,
                FloatRange::Skewed {
                    min: ATTACK_MIN,
                    max: ATTACK_MAX,
                    factor: FloatRange::skew_factor(-1.0),
                },
            )
            .with_value_to_string(formatters::v2s_f32_rounded(3)),

            release: FloatParam::new(
                "Release",
                RELEASE_DEFAULT,
                FloatRange::Skewed {
                    min: RELEASE_MIN,
                    max: RELEASE_MAX,
                    factor: FloatRange::skew_factor(-1.0),
                },
            )
            .with_value_to_string(formatters::v2s_f32_rounded(3)),
        }
    }
}

impl SmartNoiseGateParams {
    /// Snapshot of the current values for one block
    pub fn gate_parameters(&self) -> GateParameters {
        GateParameters::new(
            self.threshold.value(),
            self.attack.value(),
            self.release.value(),
        )
    }
}

impl Plugin for SmartNoiseGate {
    const NAME: &'static str = "Smart Noise Gate";
    const VENDOR: &'static str = "Cmdv";
    const URL: &'static str = env!("CARGO_PKG_HOMEPAGE");
    const EMAIL: &'static str = "info@cmdv.me";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // Stereo is the default. Input and output always have the same channel count.
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
            ..AudioIOLayout::const_default()
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const MIDI_OUTPUT: MidiConfig = MidiConfig::None;

    // Splitting blocks at automation points would change the gate's response
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let max_block = buffer_config.max_buffer_size as usize;
        let gate = self.params.gate_parameters().clamped();

        nih_plug::nih_log!(
            "Initialize: {} channels, {} Hz, max block {}",
            audio_io_layout
                .main_input_channels
                .map(NonZeroU32::get)
                .unwrap_or(0),
            buffer_config.sample_rate,
            max_block
        );

        // The envelope steps once per block, so its timing depends on the host buffer size
        nih_plug::nih_log!(
            "Gate time constants at max block: attack {:.1} ms, release {:.1} ms",
            block_time_constant(gate.attack, max_block, buffer_config.sample_rate) * 1000.0,
            block_time_constant(gate.release, max_block, buffer_config.sample_rate) * 1000.0
        );

        true
    }

    fn reset(&mut self) {
        // Called before playback (re)starts, from the audio thread. Must not allocate.
        self.audio_engine.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.audio_engine
            .process(buffer, self.params.gate_parameters());

        ProcessStatus::Normal
    }

    fn editor(&mut self, _async_executor: AsyncExecutor<Self>) -> Option<Box<dyn Editor>> {
        nih_plug::nih_log!("Editor requested");

        editor::create(
            self.params.editor_state.clone(),
            EditorInitFlags {
                params: self.params.clone(),
                meters: self.meter_consumer.clone(),
                telemetry: self.telemetry_consumer.clone(),
            },
        )
    }
}

impl ClapPlugin for SmartNoiseGate {
    const CLAP_ID: &'static str = "me.cmdv.smart-noise-gate";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Block-rate RMS noise gate with attack/release smoothing");
    const CLAP_MANUAL_URL: Option<&'static str> = Some(Self::URL);
    const CLAP_SUPPORT_URL: Option<&'static str> = None;

    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Gate,
        ClapFeature::Mono,
        ClapFeature::Stereo,
    ];
}

impl Vst3Plugin for SmartNoiseGate {
    const VST3_CLASS_ID: [u8; 16] = *b"SmartNoiseGate01";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Dynamics];
}

nih_export_clap!(SmartNoiseGate);
nih_export_vst3!(SmartNoiseGate);
