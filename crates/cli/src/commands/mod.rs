//! Command implementations.

mod run;
mod validate;

pub use run::run_tail;
pub use validate::run_validate;
