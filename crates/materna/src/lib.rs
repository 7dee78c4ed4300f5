//! Rule-based guidance engine for maternal health: a patient-facing triage
//! classifier over free-text messages and a provider-facing clinical
//! decision support evaluator over vitals snapshots, both driven by one
//! declarative rule catalog format.

pub mod config;
pub mod error;
pub mod guidance;
pub mod telemetry;
