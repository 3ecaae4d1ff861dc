// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Subscription Handler
//!
//! This module defines the trait user code implements to consume messages.
//! One handler is registered per subscription and invoked once per delivery,
//! concurrently and in no guaranteed order.

use crate::{errors::BrokerResult, subscriber::Publication};
use async_trait::async_trait;

/// Processes one publication delivered to a subscription.
///
/// Returning an error requests redelivery when the subscription uses explicit
/// acknowledgment; under auto-ack the error has no delivery-level effect.
/// Positive acknowledgment is the handler's responsibility via
/// [`Publication::ack`] when acknowledgment is explicit.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, publication: &Publication) -> BrokerResult<()>;
}
