// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Broker Message
//!
//! This module defines the transport-agnostic message exchanged through the
//! broker: an ordered mapping of string headers plus an opaque byte payload.
//! Messages are immutable once constructed for publishing and are rebuilt from
//! the wire headers and body on delivery.

use crate::errors::{BrokerError, BrokerResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::error;

/// A message published to or delivered from the broker.
///
/// Headers are an ordered string-to-string mapping; the body is opaque to the
/// adapter and passed through to the transport untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message headers, copied key-by-key into the transport header table on publish
    pub headers: BTreeMap<String, String>,
    /// Opaque message payload
    pub body: Vec<u8>,
}

impl Message {
    /// Creates a new message with the given body and no headers.
    pub fn new(body: impl Into<Vec<u8>>) -> Message {
        Message {
            headers: BTreeMap::default(),
            body: body.into(),
        }
    }

    /// Creates a message whose body is the JSON encoding of any serializable value.
    ///
    /// # Returns
    /// The message on success or `BrokerError::Payload` when serialization fails
    pub fn from_json<T>(payload: &T) -> BrokerResult<Message>
    where
        T: Serialize,
    {
        match serde_json::to_vec(payload) {
            Ok(body) => Ok(Message::new(body)),
            Err(err) => {
                error!(error = err.to_string(), "failure to serialize payload");
                Err(BrokerError::Payload)
            }
        }
    }

    /// Decodes the message body as JSON into the requested type.
    ///
    /// # Returns
    /// The decoded value on success or `BrokerError::Payload` when the body is
    /// not valid JSON for the target type
    pub fn json<T>(&self) -> BrokerResult<T>
    where
        T: DeserializeOwned,
    {
        match serde_json::from_slice(&self.body) {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(error = err.to_string(), "failure to deserialize payload");
                Err(BrokerError::Payload)
            }
        }
    }

    /// Adds a single header to the message.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Replaces the message headers.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Order {
        id: String,
        amount: u32,
    }

    #[test]
    fn should_build_message_with_headers() {
        let msg = Message::new(b"payload".to_vec())
            .with_header("origin", "billing")
            .with_header("kind", "order.created");

        assert_eq!(msg.body, b"payload");
        assert_eq!(msg.headers.get("origin").unwrap(), "billing");
        assert_eq!(msg.headers.get("kind").unwrap(), "order.created");
    }

    #[test]
    fn should_encode_and_decode_json_payload() {
        let order = Order {
            id: "order-1".to_owned(),
            amount: 42,
        };

        let msg = Message::from_json(&order).unwrap();
        let decoded = msg.json::<Order>().unwrap();

        assert_eq!(decoded, order);
    }

    #[test]
    fn should_fail_to_decode_invalid_payload() {
        let msg = Message::new(b"not json".to_vec());

        assert_eq!(msg.json::<Order>().unwrap_err(), BrokerError::Payload);
    }
}
