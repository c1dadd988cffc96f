use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Items a subscriber may leave unread before further items are dropped.
pub const DEFAULT_STREAM_CAPACITY: usize = 64;

/// Single-subscriber event channel.
///
/// ### Rules
/// - At most one active subscriber; [`subscribe`](Self::subscribe) replaces the previous one.
/// - No buffering for absent subscribers: publishing with nobody attached drops the item.
/// - Fire-and-forget: a subscriber with `capacity` unread items misses new ones.
/// - [`complete`](Self::complete) ends the current subscription; the channel stays usable.
pub struct StreamChannel<T> {
    name: &'static str,
    capacity: usize,
    sink: Mutex<Option<mpsc::Sender<T>>>,
}

impl<T: Send + 'static> StreamChannel<T> {
    pub fn new(name: &'static str) -> Self {
        Self::with_capacity(name, DEFAULT_STREAM_CAPACITY)
    }

    /// Channel whose subscriber queue holds at most `capacity` items (minimum 1).
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity: capacity.max(1),
            sink: Mutex::new(None),
        }
    }

    /// Channel name (for logs).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Attaches a new subscriber, ending any previous subscription.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel(self.capacity);
        if self.sink.lock().replace(tx).is_some() {
            tracing::debug!(channel = self.name, "replacing previous subscriber");
        }
        Subscription { rx }
    }

    /// Delivers `item` to the current subscriber.
    ///
    /// Returns `false` when the item was dropped: nobody attached, the
    /// subscriber's queue is full, or the subscriber dropped its stream (which
    /// also detaches it).
    pub fn publish(&self, item: T) -> bool {
        let mut sink = self.sink.lock();
        let Some(tx) = sink.as_ref() else {
            return false;
        };
        match tx.try_send(item) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(channel = self.name, "subscriber queue full; item dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                *sink = None;
                false
            }
        }
    }

    /// Detaches the current subscriber; its stream terminates.
    pub fn complete(&self) {
        self.sink.lock().take();
    }

    /// True while a live subscriber is attached.
    pub fn is_subscribed(&self) -> bool {
        self.sink
            .lock()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }
}

/// Receiving half of a [`StreamChannel`] subscription.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::Receiver<T>,
}

impl<T> Subscription<T> {
    /// Non-blocking receive; `None` when nothing is pending or the subscription ended.
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_recv(cx)
    }
}
