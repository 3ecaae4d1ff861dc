// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

mod consumer;

pub mod broker;
pub mod connection;
pub mod errors;
pub mod exchange;
pub mod handler;
pub mod message;
pub mod options;
pub mod selector;
pub mod subscriber;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
