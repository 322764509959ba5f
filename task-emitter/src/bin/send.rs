//! Task Send - publishes a single message to the task queue.
//!
//! The message is the command-line arguments joined with spaces, or
//! `Hello world.` when none are given.

use std::env;

use anyhow::{Context, Result};
use tracing::info;

use task_emitter::{init_logging, Config, MessageSink, Publisher, QueueName};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::from_env();

    let mut message = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if message.is_empty() {
        message = "Hello world.".to_string();
    }

    let queue = QueueName::new(config.queue_name.clone()).context("Invalid TASK_QUEUE")?;
    info!(queue = %queue, body_length = message.len(), "send_starting");

    Publisher::new(&config.rabbitmq_host)
        .send(&queue, &message)
        .await
        .context("Failed to send task")?;

    Ok(())
}
