// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Broker Adapter
//!
//! This module provides the uniform broker abstraction and its RabbitMQ
//! implementation. The adapter orchestrates the connection lifecycle,
//! translates publish/subscribe calls into transport calls against the shared
//! exchange, and dispatches every incoming delivery to the user handler in
//! its own task.
//!
//! Construction is explicit: the surrounding application builds the adapter
//! and passes it where it is needed. `with_transport` injects a custom
//! transport, which is also the test seam.

use crate::{
    connection::RabbitConnection,
    consumer::consume,
    errors::{BrokerError, BrokerResult},
    handler::Handler,
    message::Message,
    options::{binding_table, BrokerOptions, SubscribeOptions},
    subscriber::{RabbitSubscriber, Subscriber},
    transport::{DeliveryStream, Publishing, Transport},
};
use async_trait::async_trait;
use futures_util::StreamExt;
use lapin::types::{AMQPValue, FieldTable, LongString, ShortString};
use std::{collections::BTreeMap, fmt, sync::Arc};
use tokio::sync::{Mutex, Semaphore};
use tracing::error;

/// The uniform publish/subscribe broker abstraction.
///
/// Application code publishes to a named topic and registers handlers that
/// consume from it without depending on transport-specific APIs.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Establishes the connection to the transport.
    ///
    /// A second call reuses the existing connection object rather than
    /// recreating it.
    async fn connect(&self) -> BrokerResult<()>;

    /// Closes the transport connection, releasing every subscription's
    /// underlying resources transitively.
    async fn disconnect(&self) -> BrokerResult<()>;

    /// Publishes a message to the given topic through the shared exchange.
    ///
    /// No local buffering or retry; transport failures propagate
    /// synchronously.
    async fn publish(&self, topic: &str, message: &Message) -> BrokerResult<()>;

    /// Creates a subscription on the given topic, dispatching every delivery
    /// to the handler.
    async fn subscribe(
        &self,
        topic: &str,
        handler: Arc<dyn Handler>,
        options: SubscribeOptions,
    ) -> BrokerResult<Box<dyn Subscriber>>;

    /// The adapter's option set.
    fn options(&self) -> &BrokerOptions;

    /// The first configured broker address, empty when none is configured.
    fn address(&self) -> &str;

    /// The fixed adapter identifier.
    fn name(&self) -> &str;
}

/// RabbitMQ implementation of the [`Broker`] trait.
pub struct RabbitBroker {
    opts: BrokerOptions,
    transport: Mutex<Option<Arc<dyn Transport>>>,
}

impl RabbitBroker {
    /// Creates a new broker adapter backed by the lapin transport.
    ///
    /// The transport itself is built lazily on the first `connect` call.
    pub fn new(opts: BrokerOptions) -> RabbitBroker {
        RabbitBroker {
            opts,
            transport: Mutex::new(None),
        }
    }

    /// Creates a broker adapter over an injected transport.
    pub fn with_transport(opts: BrokerOptions, transport: Arc<dyn Transport>) -> RabbitBroker {
        RabbitBroker {
            opts,
            transport: Mutex::new(Some(transport)),
        }
    }

    /// Replaces the adapter's option set.
    ///
    /// Does not affect an already-open connection.
    pub fn init(&mut self, opts: BrokerOptions) {
        self.opts = opts;
    }

    async fn transport(&self) -> BrokerResult<Arc<dyn Transport>> {
        let transport = self.transport.lock().await;
        match transport.as_ref() {
            Some(t) => Ok(t.clone()),
            None => Err(BrokerError::NotConnected),
        }
    }
}

impl fmt::Display for RabbitBroker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[async_trait]
impl Broker for RabbitBroker {
    async fn connect(&self) -> BrokerResult<()> {
        let transport = {
            let mut slot = self.transport.lock().await;
            match slot.as_ref() {
                Some(t) => t.clone(),
                None => {
                    let t: Arc<dyn Transport> = Arc::new(RabbitConnection::new(
                        self.opts.exchange.clone(),
                        self.opts.addrs.clone(),
                    ));
                    *slot = Some(t.clone());
                    t
                }
            }
        };

        transport.connect(self.opts.secure, self.opts.tls.clone()).await
    }

    async fn disconnect(&self) -> BrokerResult<()> {
        self.transport().await?.close().await
    }

    async fn publish(&self, topic: &str, message: &Message) -> BrokerResult<()> {
        let transport = self.transport().await?;

        let mut btree = BTreeMap::<ShortString, AMQPValue>::default();
        for (key, value) in &message.headers {
            btree.insert(
                ShortString::from(key.as_str()),
                AMQPValue::LongString(LongString::from(value.as_str())),
            );
        }

        transport
            .publish(
                self.opts.exchange.name(),
                topic,
                Publishing {
                    body: message.body.clone(),
                    headers: FieldTable::from(btree),
                },
            )
            .await
    }

    async fn subscribe(
        &self,
        topic: &str,
        handler: Arc<dyn Handler>,
        options: SubscribeOptions,
    ) -> BrokerResult<Box<dyn Subscriber>> {
        let transport = self.transport().await?;

        let headers = options.headers.as_ref().map(binding_table);

        let (channel, stream) = transport
            .consume(
                &options.queue,
                topic,
                headers,
                options.auto_ack,
                options.durable_queue,
                options.prefetch_count,
            )
            .await?;

        spawn_reader(stream, handler, options.auto_ack, options.concurrency_limit);

        Ok(Box::new(RabbitSubscriber {
            opts: options,
            topic: topic.to_owned(),
            channel,
        }))
    }

    fn options(&self) -> &BrokerOptions {
        &self.opts
    }

    fn address(&self) -> &str {
        match self.opts.addrs.first() {
            Some(addr) => addr,
            None => "",
        }
    }

    fn name(&self) -> &str {
        "rabbitmq"
    }
}

/// Spawns the reader loop for one subscription.
///
/// The loop drains the delivery stream and hands every delivery to its own
/// task, so handler invocations run concurrently with no ordering guarantee.
/// When a concurrency limit is configured a semaphore permit is acquired
/// before spawning, bounding in-flight handler invocations. The loop exits
/// when the stream ends, which happens when the subscription's channel or the
/// connection is closed.
fn spawn_reader(
    mut stream: DeliveryStream,
    handler: Arc<dyn Handler>,
    auto_ack: bool,
    concurrency_limit: Option<usize>,
) {
    let semaphore = concurrency_limit.map(|limit| Arc::new(Semaphore::new(limit)));

    tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(delivery) => {
                    let permit = match &semaphore {
                        Some(semaphore) => match semaphore.clone().acquire_owned().await {
                            Ok(permit) => Some(permit),
                            Err(_) => break,
                        },
                        None => None,
                    };

                    let handler = handler.clone();
                    tokio::spawn(async move {
                        let _permit = permit;
                        if let Err(err) = consume(delivery, handler, auto_ack).await {
                            error!(error = err.to_string(), "error consume msg");
                        }
                    });
                }

                Err(err) => error!(error = err.to_string(), "errors consume msg"),
            }
        }
    });
}
