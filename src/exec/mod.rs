// src/exec/mod.rs

//! Wave-based task execution.
//!
//! - [`record`] holds the per-invocation execution record.
//! - [`executor`] walks the resolved waves, running independent tasks
//!   concurrently and containing failures per task.

pub mod executor;
pub mod record;

pub use executor::{execute, execute_subset};
pub use record::{ExecutionRecord, TaskState};
