// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! Recording fakes for the transport seams, test-only.

use crate::{
    errors::{BrokerError, BrokerResult},
    handler::Handler,
    message::Message,
    subscriber::Publication,
    transport::{Channel, Delivery, DeliveryStream},
};
use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use lapin::types::FieldTable;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::sync::{mpsc, watch};

/// Acknowledgment calls observed on one fake delivery.
pub(crate) struct DeliveryRecord {
    acks: AtomicUsize,
    nacks: AtomicUsize,
    requeues: Mutex<Vec<bool>>,
}

impl DeliveryRecord {
    pub(crate) fn acks(&self) -> usize {
        self.acks.load(Ordering::SeqCst)
    }

    pub(crate) fn nacks(&self) -> usize {
        self.nacks.load(Ordering::SeqCst)
    }

    pub(crate) fn requeues(&self) -> Vec<bool> {
        self.requeues.lock().unwrap().clone()
    }
}

pub(crate) struct FakeDelivery {
    body: Vec<u8>,
    headers: Option<FieldTable>,
    routing_key: String,
    record: Arc<DeliveryRecord>,
}

impl FakeDelivery {
    pub(crate) fn new(
        body: Vec<u8>,
        headers: Option<FieldTable>,
        routing_key: &str,
    ) -> (FakeDelivery, Arc<DeliveryRecord>) {
        let record = Arc::new(DeliveryRecord {
            acks: AtomicUsize::new(0),
            nacks: AtomicUsize::new(0),
            requeues: Mutex::new(vec![]),
        });

        (
            FakeDelivery {
                body,
                headers,
                routing_key: routing_key.to_owned(),
                record: record.clone(),
            },
            record,
        )
    }
}

#[async_trait]
impl Delivery for FakeDelivery {
    fn body(&self) -> &[u8] {
        &self.body
    }

    fn headers(&self) -> Option<&FieldTable> {
        self.headers.as_ref()
    }

    fn routing_key(&self) -> &str {
        &self.routing_key
    }

    async fn ack(&self, _multiple: bool) -> BrokerResult<()> {
        self.record.acks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn nack(&self, _multiple: bool, requeue: bool) -> BrokerResult<()> {
        self.record.nacks.fetch_add(1, Ordering::SeqCst);
        self.record.requeues.lock().unwrap().push(requeue);
        Ok(())
    }
}

/// Fake channel whose `close` ends the paired delivery stream.
pub(crate) struct FakeChannel {
    close_tx: watch::Sender<bool>,
}

#[async_trait]
impl Channel for FakeChannel {
    async fn close(&self) -> BrokerResult<()> {
        let _ = self.close_tx.send(true);
        Ok(())
    }
}

/// Builds a fake subscription channel.
///
/// # Returns
/// The channel handle, the sender feeding the stream, and the stream itself;
/// closing the channel ends the stream even while senders are alive
pub(crate) fn fake_channel() -> (
    Box<dyn Channel>,
    mpsc::UnboundedSender<BrokerResult<Box<dyn Delivery>>>,
    DeliveryStream,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (close_tx, close_rx) = watch::channel(false);

    let stream: DeliveryStream = stream::unfold((rx, close_rx), |(mut rx, mut close_rx)| async move {
        tokio::select! {
            biased;
            Ok(()) = close_rx.changed() => None,
            item = rx.recv() => item.map(|item| (item, (rx, close_rx))),
        }
    })
    .boxed();

    (Box::new(FakeChannel { close_tx }), tx, stream)
}

pub(crate) struct Seen {
    pub(crate) topic: String,
    pub(crate) message: Message,
}

/// Handler fake that counts invocations and tracks in-flight concurrency.
pub(crate) struct CountingHandler {
    fail: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    last_seen: Mutex<Option<Seen>>,
}

impl CountingHandler {
    fn new(fail: bool, delay: Option<Duration>) -> CountingHandler {
        CountingHandler {
            fail,
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            last_seen: Mutex::new(None),
        }
    }

    pub(crate) fn succeeding() -> CountingHandler {
        CountingHandler::new(false, None)
    }

    pub(crate) fn failing() -> CountingHandler {
        CountingHandler::new(true, None)
    }

    pub(crate) fn slow(delay: Duration) -> CountingHandler {
        CountingHandler::new(false, Some(delay))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn last_seen(&self) -> Option<Seen> {
        self.last_seen.lock().unwrap().take()
    }
}

#[async_trait]
impl Handler for CountingHandler {
    async fn handle(&self, publication: &Publication) -> BrokerResult<()> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        *self.last_seen.lock().unwrap() = Some(Seen {
            topic: publication.topic().to_owned(),
            message: publication.message().clone(),
        });
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(BrokerError::Handler("boom".to_owned()));
        }

        Ok(())
    }
}
