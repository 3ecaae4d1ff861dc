// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Round-Robin Node Selector
//!
//! This module provides a stateless selection strategy that picks one network
//! endpoint from a service's available nodes. Selection flattens every
//! service's node list once, then rotates over the result with a shared
//! atomic counter, so concurrent callers never duplicate or skip a slot.

use crate::errors::SelectorError;
use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// An addressable endpoint of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub address: String,
}

/// A service with its ordered list of candidate nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub nodes: Vec<Node>,
}

/// A node selection strategy.
pub trait Strategy {
    /// Builds a selection callable over the given services.
    fn select(&self, services: &[Service]) -> Next;
}

/// The callable produced by a selection.
///
/// Closes over the node list flattened at select time; later changes to the
/// input services are not reflected. Safe to invoke concurrently.
pub struct Next {
    nodes: Vec<Node>,
    tick: Arc<AtomicU64>,
}

impl Next {
    /// Returns the next node in rotation.
    ///
    /// # Returns
    /// The node at `tick mod node_count`, or
    /// `SelectorError::NoAvailableNodes` when the flattened list is empty
    pub fn next(&self) -> Result<&Node, SelectorError> {
        if self.nodes.is_empty() {
            return Err(SelectorError::NoAvailableNodes);
        }

        let tick = self.tick.fetch_add(1, Ordering::Relaxed);

        Ok(&self.nodes[(tick % self.nodes.len() as u64) as usize])
    }
}

/// Round-robin strategy over the flattened node lists.
///
/// The tick counter is shared between the strategy and every `Next` it
/// returns, so successive selections keep rotating from where the previous
/// callable left off.
#[derive(Default)]
pub struct RoundRobin {
    tick: Arc<AtomicU64>,
}

impl RoundRobin {
    /// Creates a new round-robin strategy with the counter at zero.
    pub fn new() -> RoundRobin {
        RoundRobin::default()
    }
}

impl Strategy for RoundRobin {
    fn select(&self, services: &[Service]) -> Next {
        let mut nodes = vec![];

        for service in services {
            nodes.extend(service.nodes.iter().cloned());
        }

        Next {
            nodes,
            tick: self.tick.clone(),
        }
    }
}
