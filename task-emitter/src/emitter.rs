//! CSV-to-queue emitter.
//!
//! Sends each row as its own message, in file order, pausing after every
//! send. The first error ends the run; later rows are never sent.

use std::io::Write;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::admin::show_admin_console;
use crate::error::EmitterError;
use crate::queue::{MessageSink, Publisher, QueueName};
use crate::source::CsvSource;
use crate::Config;

/// Send every message from `messages` to `queue` through `sink`.
///
/// Returns the number of messages sent.
pub async fn emit_from_source<I, S>(
    messages: I,
    sink: &S,
    queue: &QueueName,
    inter_row_delay: Duration,
) -> Result<usize, EmitterError>
where
    I: IntoIterator<Item = Result<String, EmitterError>>,
    S: MessageSink + ?Sized,
{
    let mut sent = 0;

    for message in messages {
        let message = message?;
        sink.send(queue, &message).await?;
        sent += 1;

        sleep(inter_row_delay).await;
    }

    Ok(sent)
}

/// Run the configured CSV emission against the broker.
pub async fn emit_tasks(config: &Config) -> Result<usize, EmitterError> {
    let queue = QueueName::new(config.queue_name.clone())?;

    show_admin_console(config.admin_console, &config.admin_url);

    let source = CsvSource::open(&config.input_file)?;
    info!(
        path = %source.path().display(),
        queue = %queue,
        delay_ms = config.inter_row_delay_ms,
        "emitter_started"
    );

    let publisher = Publisher::new(&config.rabbitmq_host);
    let sent = emit_from_source(
        source.messages(),
        &publisher,
        &queue,
        config.inter_row_delay(),
    )
    .await?;

    info!(messages_sent = sent, queue = %queue, "emitter_complete");
    Ok(sent)
}

/// Run [`emit_tasks`] and turn the outcome into a process exit status.
///
/// On failure the error line goes to `out` and the status is 1.
pub async fn run<W: Write>(config: &Config, out: &mut W) -> i32 {
    match emit_tasks(config).await {
        Ok(_) => 0,
        Err(e) => {
            error!(error = %e, connection = e.is_connection(), "emitter_failed");
            if let Err(write_err) = writeln!(out, "Error: {}", e) {
                warn!(error = %write_err, "emitter_error_report_failed");
            }
            1
        }
    }
}
