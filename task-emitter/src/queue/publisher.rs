//! RabbitMQ publishing with one scoped session per message.
//!
//! Every send opens its own connection, declares the durable queue, publishes
//! to the default exchange and closes the connection again, whether or not
//! the publish succeeded.

use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use tracing::{info, warn};

use super::types::{broker_url, QueueName};
use crate::error::EmitterError;

/// Destination for emitted task messages.
#[async_trait]
pub trait MessageSink {
    /// Deliver one message to `queue`.
    async fn send(&self, queue: &QueueName, message: &str) -> Result<(), EmitterError>;
}

/// An open connection and channel to the broker.
pub struct Session {
    connection: Connection,
    channel: Channel,
}

impl Session {
    /// Connect to the broker and open a channel.
    ///
    /// Any failure here is reported as [`EmitterError::Connection`].
    pub async fn open(url: &str) -> Result<Self, EmitterError> {
        info!(url_length = url.len(), "rabbitmq_connecting");

        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(EmitterError::Connection)?;

        info!("rabbitmq_connected");

        let channel = match connection.create_channel().await {
            Ok(channel) => channel,
            Err(e) => {
                close_connection(&connection).await;
                return Err(EmitterError::Connection(e));
            }
        };

        Ok(Self {
            connection,
            channel,
        })
    }

    /// Declare `queue` as durable. Idempotent for an existing durable queue.
    pub async fn declare_durable(&self, queue: &QueueName) -> Result<(), EmitterError> {
        self.channel
            .queue_declare(
                queue.as_str(),
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|source| EmitterError::Declare {
                queue: queue.to_string(),
                source,
            })?;

        info!(queue = %queue, "rabbitmq_queue_declared");
        Ok(())
    }

    /// Publish `body` to the default exchange, routed by queue name.
    ///
    /// No message properties are set.
    pub async fn publish(&self, queue: &QueueName, body: &[u8]) -> Result<(), EmitterError> {
        let publish_error = |source: lapin::Error| EmitterError::Publish {
            queue: queue.to_string(),
            source,
        };

        // Confirms are never enabled on this channel, so the confirmation
        // resolves immediately as NotRequested.
        self.channel
            .basic_publish(
                "",
                queue.as_str(),
                BasicPublishOptions::default(),
                body,
                BasicProperties::default(),
            )
            .await
            .map_err(publish_error)?
            .await
            .map_err(publish_error)?;

        info!(queue = %queue, body_length = body.len(), "rabbitmq_published");
        Ok(())
    }

    /// Declare then publish.
    async fn deliver(&self, queue: &QueueName, body: &[u8]) -> Result<(), EmitterError> {
        self.declare_durable(queue).await?;
        self.publish(queue, body).await
    }

    /// Close the channel and the connection. Close failures are only logged.
    pub async fn close(self) {
        if let Err(e) = self.channel.close(200, "Normal shutdown").await {
            warn!(error = %e, "rabbitmq_channel_close_error");
        }

        close_connection(&self.connection).await;
    }
}

async fn close_connection(connection: &Connection) {
    if let Err(e) = connection.close(200, "Normal shutdown").await {
        warn!(error = %e, "rabbitmq_connection_close_error");
    }

    info!("rabbitmq_connection_closed");
}

/// Broker-backed sink that opens a fresh [`Session`] for every message.
#[derive(Debug, Clone)]
pub struct Publisher {
    url: String,
}

impl Publisher {
    /// Create a publisher for a broker host or AMQP URL.
    pub fn new(host: &str) -> Self {
        Self {
            url: broker_url(host),
        }
    }
}

#[async_trait]
impl MessageSink for Publisher {
    async fn send(&self, queue: &QueueName, message: &str) -> Result<(), EmitterError> {
        let session = Session::open(&self.url).await?;

        let outcome = session.deliver(queue, message.as_bytes()).await;
        session.close().await;
        outcome?;

        println!(" [x] Sent {}", message);
        info!(
            queue = %queue,
            body_length = message.len(),
            "task_published"
        );

        Ok(())
    }
}
