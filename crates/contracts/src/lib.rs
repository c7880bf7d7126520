//! # Contracts
//!
//! Frozen interface contracts shared by every chattail crate.
//! Business crates depend on this crate only, reverse dependencies are prohibited.
//!
//! ## Data Flow
//! - `ingestion` reads the tailed file and produces [`Chunk`]s
//! - `dispatcher` consumes chunks and hands their text to a [`Notifier`]
//! - [`TailConfig`] describes both ends and is fixed at startup

mod chunk;
mod config;
mod error;
mod notifier;
mod source;

pub use chunk::Chunk;
pub use config::*;
pub use error::*;
pub use notifier::*;
pub use source::*;
