// src/graph/mod.rs

//! Task graph: named tasks with declared dependencies.
//!
//! - [`task`] defines the task unit and its action seam.
//! - [`registry`] holds the validated graph, wave resolution (Kahn layering)
//!   and the reverse mapping from a changed path to affected tasks.

pub mod registry;
pub mod task;

pub use registry::TaskGraph;
pub use task::{OutputCategory, Task, TaskAction};
