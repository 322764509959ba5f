//! Task Emitter - sends each row of a CSV file to a durable RabbitMQ queue.
//!
//! Reads `tasks.csv` (or `TASKS_CSV`) from the working directory and publishes
//! one message per row to `task_queue3`, pausing between sends.

use std::io;
use std::process;

use tracing::info;

use task_emitter::{init_logging, run, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();

    info!("emitter_starting");

    let config = Config::from_env();
    info!(
        rabbitmq_host = %config.rabbitmq_host,
        queue = %config.queue_name,
        input_file = %config.input_file.display(),
        delay_ms = config.inter_row_delay_ms,
        admin_console = ?config.admin_console,
        "config_loaded"
    );

    let status = run(&config, &mut io::stdout()).await;
    process::exit(status);
}
