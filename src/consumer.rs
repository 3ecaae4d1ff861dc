// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Per-Delivery Consumption
//!
//! This module implements the handling of one delivery: decode the wire
//! header table, wrap the delivery into a publication, invoke the user
//! handler, and apply the acknowledgment policy tied to the handler outcome.

use crate::{
    errors::BrokerResult,
    handler::Handler,
    message::Message,
    subscriber::Publication,
    transport::Delivery,
};
use lapin::types::{AMQPValue, FieldTable};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, warn};

/// Consumes one delivery.
///
/// Decodes the headers, invokes the handler, and, when the handler fails and
/// acknowledgment is explicit, negatively acknowledges the delivery with
/// redelivery requested. On handler success no acknowledgment is issued here:
/// positive acknowledgment belongs to [`Publication::ack`], invoked at the
/// handler's discretion. Under auto-ack the transport acknowledged on receipt
/// and no acknowledgment action is taken for either outcome.
pub(crate) async fn consume(
    delivery: Box<dyn Delivery>,
    handler: Arc<dyn Handler>,
    auto_ack: bool,
) -> BrokerResult<()> {
    let message = Message {
        headers: decode_headers(delivery.headers()),
        body: delivery.body().to_vec(),
    };
    let topic = delivery.routing_key().to_owned();

    let publication = Publication::new(delivery, message, topic);

    match handler.handle(&publication).await {
        Ok(_) => {
            debug!("message successfully processed");
            Ok(())
        }
        Err(err) => {
            if auto_ack {
                return Err(err);
            }

            warn!("error whiling handling msg, requeuing");
            publication.nack_requeue().await?;

            Err(err)
        }
    }
}

/// Decodes a wire header table into the message header mapping.
///
/// Only string-typed values are kept; values of any other type are silently
/// dropped. This is policy, not an error.
fn decode_headers(table: Option<&FieldTable>) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::default();

    let Some(table) = table else {
        return headers;
    };

    for (key, value) in table.inner() {
        match value {
            AMQPValue::LongString(v) => {
                headers.insert(
                    key.to_string(),
                    String::from_utf8_lossy(v.as_bytes()).to_string(),
                );
            }
            AMQPValue::ShortString(v) => {
                headers.insert(key.to_string(), v.to_string());
            }
            _ => {}
        }
    }

    headers
}
