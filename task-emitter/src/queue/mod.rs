//! Queue module for RabbitMQ operations.
//!
//! This module provides:
//! - The validated queue name and broker URL helpers
//! - A scoped broker session (connect, declare, publish, close)
//! - The connection-per-message publisher used by the emitter
//!
//! ## Flow
//!
//! ```text
//! message → Session::open → declare_durable → publish → close
//! ```

pub mod publisher;
pub mod types;

pub use publisher::{MessageSink, Publisher, Session};
pub use types::{broker_url, QueueName, TASK_QUEUE};
