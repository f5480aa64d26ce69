//! Background Tasks Module
//!
//! Long-running maintenance tasks spawned by the composition root.
//!
//! # Tasks
//! - Cache sweep: removes expired cache entries at configured intervals

mod sweep;

pub use sweep::spawn_sweep_task;
