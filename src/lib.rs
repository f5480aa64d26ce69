//! Harmonic Session - client session layer for Harmonic Universe
//!
//! Provides the two stateful pieces the realtime client needs: an in-memory
//! TTL cache for response reuse, and an auto-reconnecting socket client with
//! bounded linear backoff.

pub mod cache;
pub mod config;
pub mod error;
pub mod socket;
pub mod tasks;

pub use cache::TtlCache;
pub use config::Config;
pub use error::{Result, SocketError};
pub use socket::{SocketClient, SocketConfig};
pub use tasks::spawn_sweep_task;
