//! # Handlers for the voice-note bot
//!
//! The voice pipeline (classifier, transfer gateway, conversion) as a chain [`Handler`], the
//! logging middleware, and the pipeline configuration.
//!
//! [`Handler`]: vnote_core::Handler

mod classifier;
mod config;
mod gateway;
mod logging;
mod voice_pipeline;

#[cfg(test)]
mod test;

pub use classifier::{Classifier, Outcome};
pub use config::PipelineConfig;
pub use gateway::TransferGateway;
pub use logging::LoggingMiddleware;
pub use voice_pipeline::VoicePipelineHandler;
