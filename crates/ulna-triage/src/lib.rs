//! Ulna Triage Layer
//!
//! Recommendation derivation for upper-extremity complaints: a model path
//! (prompt + structured-response parse) with a total fallback to an ordered
//! rule table, plus fuzzy fusion of clinical output with literature evidence.
//!
//! The central type is [`Advisor`], which never fails: any model problem -
//! timeout, transport error, malformed JSON, incomplete report - silently
//! degrades to the deterministic rule path.

#![warn(missing_docs)]

pub mod advisor;
pub mod config;
pub mod error;
pub mod fusion;
pub mod parser;
pub mod prompt;
pub mod rules;
pub mod types;

pub use advisor::Advisor;
pub use config::TriageConfig;
pub use error::TriageError;
pub use types::{Derivation, DerivationSource};
