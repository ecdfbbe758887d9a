
pub mod cluster;
pub mod decoder;
pub mod envelope;
pub mod filter;
pub mod group;
pub mod pitch;
pub mod runs;
pub mod symbol;
pub mod tracing_init;
pub mod translate;
pub mod wav;

pub use decoder::{decode_signal, DecodedMessage, DecoderConfig, Visualization};
pub use wav::{read_wav_file, AudioBuffer, WavError};
