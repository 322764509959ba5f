//! Task Emitter - publishes CSV rows as task messages to RabbitMQ.
//!
//! This library provides the shared modules for the two binaries:
//! - `task-emitter`: sends every row of a CSV file to a durable queue
//! - `task-send`: sends a single message from the command line
//!
//! ## Flow
//!
//! ```text
//! tasks.csv → CsvSource → emit_from_source → Publisher → task_queue3
//! ```

pub mod admin;
pub mod config;
pub mod emitter;
pub mod error;
pub mod queue;
pub mod source;

// Re-export commonly used types
pub use admin::{show_admin_console, AdminConsole};
pub use config::Config;
pub use emitter::{emit_from_source, emit_tasks, run};
pub use error::EmitterError;
pub use queue::{MessageSink, Publisher, QueueName, Session, TASK_QUEUE};
pub use source::CsvSource;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured JSON logging on stderr.
///
/// Stdout is left for the ` [x] Sent` progress lines.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(std::io::stderr),
        )
        .init();
}
