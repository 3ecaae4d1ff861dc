// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Transport Contract
//!
//! This module defines the narrow contract the adapter consumes from the
//! underlying AMQP transport: connect, publish, consume, and close, plus the
//! per-subscription channel handle and the per-delivery acknowledgment handle.
//! The adapter never touches the transport beyond this surface, which keeps
//! the connection object replaceable and mockable.

use crate::{errors::BrokerResult, options::TlsConfig};
use async_trait::async_trait;
use futures_util::Stream;
use lapin::types::FieldTable;
use std::pin::Pin;

/// The stream of deliveries produced by one consume call.
///
/// Ends when the owning channel or the connection is closed.
pub type DeliveryStream = Pin<Box<dyn Stream<Item = BrokerResult<Box<dyn Delivery>>> + Send>>;

/// An outgoing transport publish request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Publishing {
    /// Opaque message payload
    pub body: Vec<u8>,
    /// Header table copied from the message headers
    pub headers: FieldTable,
}

/// One message instance received by a consumer, carrying its own
/// acknowledgment handle.
///
/// Exactly one acknowledgment decision (ack or nack) must be made per
/// delivery; a second call's behavior is transport-defined.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// The raw message payload.
    fn body(&self) -> &[u8];

    /// The wire header table, absent when the publisher sent none.
    fn headers(&self) -> Option<&FieldTable>;

    /// The routing key the message was published with.
    fn routing_key(&self) -> &str;

    /// Acknowledges the delivery.
    async fn ack(&self, multiple: bool) -> BrokerResult<()>;

    /// Negatively acknowledges the delivery, optionally requesting redelivery.
    async fn nack(&self, multiple: bool, requeue: bool) -> BrokerResult<()>;
}

/// The transport channel owned by one subscription.
///
/// Closing it terminates the subscription's delivery stream and releases the
/// consumer's transport resources.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Closes the channel.
    async fn close(&self) -> BrokerResult<()>;
}

/// The transport connection consumed by the broker adapter.
///
/// Owns the network session, exchange declaration, channel creation, and the
/// raw publish/consume primitives. Reconnection and backoff are the
/// implementation's concern, not part of this contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Establishes the network session and declares the shared exchange.
    async fn connect(&self, secure: bool, tls: Option<TlsConfig>) -> BrokerResult<()>;

    /// Publishes against the given exchange with the given routing key.
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        publishing: Publishing,
    ) -> BrokerResult<()>;

    /// Creates a consumer: declares the queue, binds it to the exchange with
    /// the routing key and optional binding headers, applies qos, and starts
    /// consuming.
    ///
    /// # Returns
    /// The channel owning the consumer and the stream of its deliveries
    async fn consume(
        &self,
        queue: &str,
        routing_key: &str,
        headers: Option<FieldTable>,
        auto_ack: bool,
        durable: bool,
        prefetch: u16,
    ) -> BrokerResult<(Box<dyn Channel>, DeliveryStream)>;

    /// Closes the connection, tearing down every channel created from it.
    async fn close(&self) -> BrokerResult<()>;
}
