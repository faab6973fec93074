//! Adaptive learner modeling and teaching-strategy selection for the
//! Darsak tutoring platform.
//!
//! The crate turns a stream of question/answer interactions into per-concept
//! mastery estimates, an inferred learning-style profile, progress reports,
//! and a deterministic choice of teaching strategy for the next answer.
//! Persistence and orchestration live behind the repository traits in
//! [`persistence`]; everything numeric in [`modeling`] and [`decision`] is
//! pure and synchronous.

pub mod cache;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod interactions;
pub mod logging;
pub mod modeling;
pub mod persistence;
pub mod types;

pub use config::CoreConfig;
pub use engine::ProfileEngine;
pub use error::{CoreError, RepositoryError};
pub use interactions::InteractionLog;
pub use persistence::{InteractionRepository, MemoryProfileStore, ProfileRepository};
pub use types::*;
