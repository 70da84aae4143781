//! # audio-converter
//!
//! Turns downloaded MP3 files into Opus-in-Ogg voice notes with an external encoder and manages
//! where the intermediate files live.

mod artifacts;
mod converter;

pub use artifacts::{ArtifactStore, RetentionPolicy, DEFAULT_DOWNLOADS_DIR, DEFAULT_OGG_DIR};
pub use converter::{
    AudioConverter, ConversionError, ConvertStatus, ConverterConfig, Encoder, FfmpegEncoder,
    DEFAULT_ENCODER_TIMEOUT,
};
