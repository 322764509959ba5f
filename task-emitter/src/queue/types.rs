//! Queue naming and broker addressing.

use std::fmt;

use url::Url;

use crate::error::EmitterError;

/// Queue name used by the CSV-driven emitter.
pub const TASK_QUEUE: &str = "task_queue3";

/// Default AMQP port.
const AMQP_PORT: u16 = 5672;

/// A non-empty queue name.
///
/// Messages are published to the default exchange with this name as the
/// routing key, so it also selects the destination queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueName(String);

impl QueueName {
    /// Validate and wrap a queue name.
    pub fn new(name: impl Into<String>) -> Result<Self, EmitterError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EmitterError::EmptyQueueName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for QueueName {
    fn default() -> Self {
        Self(TASK_QUEUE.to_string())
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turn a configured broker host into an AMQP URL.
///
/// Full `amqp://` or `amqps://` URLs pass through untouched. Anything else is
/// treated as a host (or `host:port`) on the default port with the guest account and the
/// default vhost.
pub fn broker_url(host: &str) -> String {
    if let Ok(url) = Url::parse(host) {
        if matches!(url.scheme(), "amqp" | "amqps") {
            return host.to_string();
        }
    }

    if host.contains(':') {
        format!("amqp://guest:guest@{}/%2f", host)
    } else {
        format!("amqp://guest:guest@{}:{}/%2f", host, AMQP_PORT)
    }
}
