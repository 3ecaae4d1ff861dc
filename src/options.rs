// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Broker and Subscription Options
//!
//! This module provides the configuration surface of the adapter. Every option
//! is an explicit, named field with a builder method; extension options that
//! the source system stashed in a generic context side-channel (durable queue,
//! prefetch count, binding headers) are first-class fields here.

use crate::exchange::Exchange;
use lapin::types::{AMQPValue, FieldTable, LongLongInt, LongString, ShortString};
use std::collections::{BTreeMap, HashMap};

/// A transport-agnostic header value used for queue binding filters.
///
/// Converted to the matching AMQP field value at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl From<&HeaderValue> for AMQPValue {
    fn from(value: &HeaderValue) -> AMQPValue {
        match value {
            HeaderValue::Str(v) => AMQPValue::LongString(LongString::from(v.as_str())),
            HeaderValue::Int(v) => AMQPValue::LongLongInt(LongLongInt::from(*v)),
            HeaderValue::Bool(v) => AMQPValue::Boolean(*v),
        }
    }
}

/// Builds the AMQP field table for a queue binding header filter.
pub(crate) fn binding_table(headers: &HashMap<String, HeaderValue>) -> FieldTable {
    let mut btree = BTreeMap::<ShortString, AMQPValue>::default();

    for (key, value) in headers {
        btree.insert(ShortString::from(key.as_str()), AMQPValue::from(value));
    }

    FieldTable::from(btree)
}

/// TLS material for a secure connection to the broker server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsConfig {
    /// PEM-encoded CA certificate chain
    pub ca_pem: String,
    /// Optional client identity for mutual TLS
    pub client_identity: Option<ClientIdentity>,
}

/// A client certificate identity presented during the TLS handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    /// DER-encoded PKCS#12 archive
    pub der: Vec<u8>,
    /// Password protecting the archive
    pub password: String,
}

/// Configuration for a broker adapter instance.
///
/// All fields are optional and default to disabled/zero. The exchange is
/// shared by every publish and subscription created from one adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerOptions {
    pub(crate) addrs: Vec<String>,
    pub(crate) secure: bool,
    pub(crate) tls: Option<TlsConfig>,
    pub(crate) exchange: Exchange,
}

impl BrokerOptions {
    /// Creates an option set with every field at its default.
    pub fn new() -> BrokerOptions {
        BrokerOptions::default()
    }

    /// Sets the broker addresses, replacing any previously configured list.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn addrs(mut self, addrs: Vec<String>) -> Self {
        self.addrs = addrs;
        self
    }

    /// Appends a single broker address.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn addr(mut self, addr: impl Into<String>) -> Self {
        self.addrs.push(addr.into());
        self
    }

    /// Requests a secure connection even without explicit TLS material.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    /// Sets the TLS configuration used when dialing the broker.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Sets the exchange shared by all publishes and subscriptions.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn exchange(mut self, exchange: Exchange) -> Self {
        self.exchange = exchange;
        self
    }

    /// The configured exchange.
    pub fn get_exchange(&self) -> &Exchange {
        &self.exchange
    }

    /// The configured broker addresses.
    pub fn get_addrs(&self) -> &[String] {
        &self.addrs
    }
}

/// Configuration for one subscription.
///
/// Defaults: auto-ack on, transport-assigned queue, non-durable, no prefetch
/// limit, no binding headers, unbounded handler concurrency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// When true the transport acknowledges each delivery on receipt, before
    /// the handler runs; handler failures then never cause redelivery
    pub auto_ack: bool,
    /// Target queue name, empty for a transport-assigned name
    pub queue: String,
    /// Persists the queue across broker restarts
    pub durable_queue: bool,
    /// Max unacknowledged deliveries per consumer, zero for no limit
    pub prefetch_count: u16,
    /// Optional binding headers for header-based topic filtering
    pub headers: Option<HashMap<String, HeaderValue>>,
    /// Max concurrent handler invocations for this subscription, `None` for
    /// unbounded
    pub concurrency_limit: Option<usize>,
}

impl Default for SubscribeOptions {
    fn default() -> SubscribeOptions {
        SubscribeOptions {
            auto_ack: true,
            queue: String::new(),
            durable_queue: false,
            prefetch_count: 0,
            headers: None,
            concurrency_limit: None,
        }
    }
}

impl SubscribeOptions {
    /// Creates an option set with every field at its default.
    pub fn new() -> SubscribeOptions {
        SubscribeOptions::default()
    }

    /// Disables transport auto-acknowledgment, making acknowledgment explicit
    /// and handler-driven; handler failures then trigger redelivery.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn manual_ack(mut self) -> Self {
        self.auto_ack = false;
        self
    }

    /// Sets the target queue name.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn queue(mut self, queue: impl Into<String>) -> Self {
        self.queue = queue.into();
        self
    }

    /// Makes the queue durable, persisting across broker restarts.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn durable_queue(mut self) -> Self {
        self.durable_queue = true;
        self
    }

    /// Sets the prefetch count for this subscription's consumer.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn prefetch_count(mut self, count: u16) -> Self {
        self.prefetch_count = count;
        self
    }

    /// Adds a single binding header for topic filtering.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn header(mut self, key: impl Into<String>, value: HeaderValue) -> Self {
        self.headers
            .get_or_insert_with(HashMap::default)
            .insert(key.into(), value);
        self
    }

    /// Bounds the number of concurrent handler invocations.
    ///
    /// # Returns
    /// Self for method chaining
    pub fn concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = Some(limit);
        self
    }
}
