// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Subscription and Publication Handles
//!
//! This module provides the two handles the adapter gives to user code: the
//! subscription, which owns the transport channel of one consumer and tears it
//! down on unsubscribe, and the publication, which wraps one received delivery
//! together with its decoded message and exposes explicit acknowledgment.

use crate::{
    errors::BrokerResult,
    message::Message,
    options::SubscribeOptions,
    transport::{Channel, Delivery},
};
use async_trait::async_trait;

/// One active subscription.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// The resolved options this subscription was created with.
    fn options(&self) -> &SubscribeOptions;

    /// The subscribed topic.
    fn topic(&self) -> &str;

    /// Closes the owned channel, terminating the delivery stream and
    /// releasing the consumer's transport resources.
    ///
    /// Safe to call once; a second call's behavior is transport-defined.
    async fn unsubscribe(&self) -> BrokerResult<()>;
}

pub(crate) struct RabbitSubscriber {
    pub(crate) opts: SubscribeOptions,
    pub(crate) topic: String,
    pub(crate) channel: Box<dyn Channel>,
}

#[async_trait]
impl Subscriber for RabbitSubscriber {
    fn options(&self) -> &SubscribeOptions {
        &self.opts
    }

    fn topic(&self) -> &str {
        &self.topic
    }

    async fn unsubscribe(&self) -> BrokerResult<()> {
        self.channel.close().await
    }
}

/// One received message, bound to exactly one delivery.
///
/// Created per incoming delivery, passed to the handler, and discarded after
/// the acknowledgment decision; it does not outlive one handler invocation.
pub struct Publication {
    delivery: Box<dyn Delivery>,
    message: Message,
    topic: String,
}

impl Publication {
    pub(crate) fn new(delivery: Box<dyn Delivery>, message: Message, topic: String) -> Publication {
        Publication {
            delivery,
            message,
            topic,
        }
    }

    /// The decoded message: string headers plus the raw body.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The topic the message was published with, taken from the delivery's
    /// routing key.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Acknowledges the wrapped delivery without requeue.
    ///
    /// Exactly one acknowledgment decision is expected per publication;
    /// calling this twice is a programmer error with transport-defined
    /// behavior.
    pub async fn ack(&self) -> BrokerResult<()> {
        self.delivery.ack(false).await
    }

    /// Negatively acknowledges the wrapped delivery, requesting redelivery.
    pub(crate) async fn nack_requeue(&self) -> BrokerResult<()> {
        self.delivery.nack(false, true).await
    }
}
