//! Evaluation runner
//!
//! Request parsing, engine configuration and the coordinator that runs the
//! requested metrics against a record source.

mod config;
mod evaluator;
mod request;
mod response;

pub use config::EngineConfig;
pub use evaluator::Evaluator;
pub use request::{Classification, Evaluation, EvaluationRequest};
pub use response::EvaluationResponse;
