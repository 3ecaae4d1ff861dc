// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Error Types for the Broker Adapter
//!
//! This module provides the error types for broker operations. The `BrokerError`
//! enum represents every failure scenario the adapter can surface: connection
//! lifecycle, exchange/queue declaration, publishing, consuming, and message
//! acknowledgment. The round-robin node selector has its own `SelectorError`.

use thiserror::Error;

/// Convenience alias for results produced by the broker adapter.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Represents errors that can occur during broker operations.
///
/// Connection and setup errors propagate synchronously to the caller of
/// `connect`/`publish`/`subscribe` and are never retried internally. Handler
/// failures are contained within the delivery dispatch and only trigger a
/// negative acknowledgment when acknowledgment is explicit.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BrokerError {
    /// Operation attempted before a connection was established
    #[error("not connected")]
    NotConnected,

    /// Error establishing a connection to the broker server
    #[error("failure to connect")]
    Connection,

    /// Error creating a channel from an established connection
    #[error("failure to create a channel")]
    Channel,

    /// Error declaring an exchange with the given name
    #[error("failure to declare an exchange `{0}`")]
    DeclareExchange(String),

    /// Error declaring a queue with the given name
    #[error("failure to declare a queue `{0}`")]
    DeclareQueue(String),

    /// Error binding a queue to an exchange
    #[error("failure to bind queue `{0}` to exchange `{1}`")]
    BindQueue(String, String),

    /// Error configuring Quality of Service parameters
    #[error("failure to configure qos")]
    Qos,

    /// Error publishing a message
    #[error("failure to publish")]
    Publish,

    /// Error declaring a consumer on the given queue
    #[error("failure to create a consumer on queue `{0}`")]
    ConsumeSetup(String),

    /// Error consuming a message
    #[error("failure to consume message `{0}`")]
    Consumer(String),

    /// Error acknowledging a message
    #[error("failure to ack message")]
    Ack,

    /// Error negative-acknowledging a message
    #[error("failure to nack message")]
    Nack,

    /// Error closing a channel or connection
    #[error("failure to close")]
    Close,

    /// Error parsing a message payload
    #[error("failure to parse payload")]
    Payload,

    /// A user handler reported a failure
    #[error("handler failure `{0}`")]
    Handler(String),
}

/// Represents errors produced by the node selector.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// The flattened node list was empty
    #[error("none available")]
    NoAvailableNodes,
}
