//! Error types for the task emitter.

use thiserror::Error;

/// Errors raised while emitting tasks to the broker.
#[derive(Debug, Error)]
pub enum EmitterError {
    /// The broker was unreachable or refused the connection.
    #[error("Connection to RabbitMQ server failed: {0}")]
    Connection(#[source] lapin::Error),

    /// The queue could not be declared on an open channel.
    #[error("Failed to declare queue {queue}: {source}")]
    Declare {
        queue: String,
        #[source]
        source: lapin::Error,
    },

    /// The broker rejected or dropped a publish.
    #[error("Failed to publish to queue {queue}: {source}")]
    Publish {
        queue: String,
        #[source]
        source: lapin::Error,
    },

    /// The input file could not be opened or read.
    #[error("Failed to read task source {path}: {source}")]
    Source {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Queue names must be non-empty.
    #[error("Queue name must not be empty")]
    EmptyQueueName,
}

impl EmitterError {
    /// Whether this error means the broker could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, EmitterError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_connection_error_message() {
        let err = EmitterError::Connection(lapin::Error::IOError(Arc::new(
            io::Error::from(io::ErrorKind::ConnectionRefused),
        )));
        assert!(err.is_connection());
        assert!(err
            .to_string()
            .starts_with("Connection to RabbitMQ server failed: "));
    }

    #[test]
    fn test_empty_queue_name_is_not_connection() {
        assert!(!EmitterError::EmptyQueueName.is_connection());
    }
}
