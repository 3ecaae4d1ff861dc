// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Exchange Definition
//!
//! This module defines the exchange shared by every publish and subscription on
//! one connection. The default name is empty, which selects the server default
//! exchange and is never declared; a non-empty name is declared once per
//! connection as a topic exchange so routing keys match subscriber queues.

/// Definition of the exchange the adapter publishes to and binds queues against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exchange {
    pub(crate) name: String,
    pub(crate) durable: bool,
}

impl Exchange {
    /// Creates a new exchange definition with the given name.
    ///
    /// By default the exchange is non-durable.
    pub fn new(name: impl Into<String>) -> Exchange {
        Exchange {
            name: name.into(),
            durable: false,
        }
    }

    /// Makes the exchange durable, persisting across broker restarts.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn durable(mut self) -> Self {
        self.durable = true;
        self
    }

    /// The exchange name, empty for the server default exchange.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the exchange survives broker restarts.
    pub fn is_durable(&self) -> bool {
        self.durable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_the_server_default_exchange() {
        let exchange = Exchange::default();

        assert_eq!(exchange.name(), "");
        assert!(!exchange.is_durable());
    }

    #[test]
    fn should_build_a_durable_named_exchange() {
        let exchange = Exchange::new("events").durable();

        assert_eq!(exchange.name(), "events");
        assert!(exchange.is_durable());
    }
}
