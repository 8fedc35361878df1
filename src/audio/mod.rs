pub mod audio_engine;
pub mod constants;
pub mod gate_engine;
pub mod gate_telemetry;
pub mod meter;
