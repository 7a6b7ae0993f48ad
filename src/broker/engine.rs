//! Broker engine
//!
//! This module contains the in-memory broker implementation responsible for:
//! - managing topics and subscriber lists via the topic registry
//! - queueing published messages and handing them to consumers FIFO
//! - tracking in-flight messages until they are acknowledged
//! - moving timed-out or explicitly retried messages through the
//!   dead-letter queue and back into circulation
//!
//! Concurrency and usage notes:
//! - The broker is shared as a plain `Arc<Broker>`; there is no outer lock.
//!   Every operation takes only the target topic's own mutex, so sessions
//!   working on different topics never block each other.
//! - Each operation is a single critical section against its topic: a
//!   consume and its pending-log insert are never separately visible.
//! - No I/O happens inside a critical section; all operations complete in
//!   bounded time. The only suspension point is `consume_wait`, which parks
//!   on the topic's notifier until a publish signals availability.
//! - The expiry sweep is designed to run as a background task; it takes each
//!   topic lock briefly in turn and never holds one across topics.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::broker::message::Message;
use crate::broker::registry::TopicRegistry;
use crate::utils::error::BrokerError;

#[derive(Debug, Default)]
pub struct Broker {
    registry: TopicRegistry,
}

impl Broker {
    pub fn new() -> Self {
        Self {
            registry: TopicRegistry::new(),
        }
    }

    /// Append a message to the topic's queue and return its assigned id.
    /// Wakes one consumer blocked in [`Broker::consume_wait`], if any.
    pub fn publish(&self, topic: &str, body: String) -> u64 {
        let entry = self.registry.get_or_create(topic);
        let id = entry.state.lock().unwrap().publish(body);
        entry.available.notify_one();
        id
    }

    /// Subscribe a client to a topic. Creates the topic if it doesn't exist;
    /// repeated subscribes are a no-op.
    pub fn subscribe(&self, topic: &str, client: &str) {
        let entry = self.registry.get_or_create(topic);
        entry.state.lock().unwrap().subscribe(client.to_string());
    }

    /// Unsubscribe a client from a topic. Unknown topics and non-subscribed
    /// clients are a no-op, not an error.
    pub fn unsubscribe(&self, topic: &str, client: &str) {
        let entry = self.registry.get_or_create(topic);
        entry.state.lock().unwrap().unsubscribe(client);
    }

    /// Deliver the message at the head of the topic's queue to `client`,
    /// recording it as in flight. Returns `None` when the queue is empty;
    /// the caller decides whether to poll again or use
    /// [`Broker::consume_wait`].
    ///
    /// This is the at-least-once delivery point: the message is not
    /// deleted, only moved to the pending-acknowledgment log until the same
    /// client acknowledges it by id.
    pub fn consume(&self, topic: &str, client: &str) -> Option<Message> {
        let entry = self.registry.get_or_create(topic);
        entry.state.lock().unwrap().consume(client)
    }

    /// Blocking variant of [`Broker::consume`]: suspends the calling task on
    /// the topic's notifier until a message is available.
    pub async fn consume_wait(&self, topic: &str, client: &str) -> Message {
        let entry = self.registry.get_or_create(topic);
        loop {
            // Register interest before checking the queue so a publish
            // between the check and the await is not missed.
            let notified = entry.available.notified();
            if let Some(message) = entry.state.lock().unwrap().consume(client) {
                return message;
            }
            notified.await;
        }
    }

    /// Acknowledge an in-flight message, permanently discarding it. Fails
    /// with [`BrokerError::NotFound`] for an unknown id, an already
    /// acknowledged id, or an id delivered to a different client — a caller
    /// can never acknowledge another client's in-flight message.
    pub fn acknowledge(&self, topic: &str, id: u64, client: &str) -> Result<(), BrokerError> {
        let entry = self.registry.get_or_create(topic);
        if entry.state.lock().unwrap().acknowledge(id, client) {
            Ok(())
        } else {
            Err(BrokerError::NotFound)
        }
    }

    /// Requeue in one of two forms. With `Some(id)`, move that in-flight
    /// message to the dead-letter queue for later redelivery. With `None`,
    /// drain the dead-letter head back onto the queue tail so any consumer
    /// can receive it again. Fails with [`BrokerError::Empty`] when the
    /// relevant source container has nothing to move.
    pub fn requeue(&self, topic: &str, id: Option<u64>) -> Result<(), BrokerError> {
        let entry = self.registry.get_or_create(topic);
        let moved = match id {
            Some(id) => entry.state.lock().unwrap().move_to_dead_letter(id),
            None => entry.state.lock().unwrap().drain_dead_letter(),
        };
        if moved { Ok(()) } else { Err(BrokerError::Empty) }
    }

    /// Move every in-flight message of `topic` older than `timeout` to the
    /// dead-letter queue. Returns the number of messages moved.
    ///
    /// A consumer that took a message and vanished without acknowledging
    /// must not silently lose it forever; expiry is what feeds such
    /// messages back into the dead-letter recovery path.
    pub fn expire_stale(&self, topic: &str, timeout: Duration) -> usize {
        let entry = self.registry.get_or_create(topic);
        let cutoff = Utc::now().timestamp_millis() - timeout.as_millis() as i64;
        let expired = entry.state.lock().unwrap().expire_stale(cutoff);
        for id in &expired {
            info!("Expired in-flight message {id} on topic {topic} to dead-letter queue");
        }
        expired.len()
    }

    /// Run [`Broker::expire_stale`] across every registered topic, taking
    /// each topic lock briefly in turn.
    pub fn sweep_expired(&self, timeout: Duration) -> usize {
        let cutoff = Utc::now().timestamp_millis() - timeout.as_millis() as i64;
        let mut total = 0;
        for entry in self.registry.entries() {
            let mut state = entry.state.lock().unwrap();
            let expired = state.expire_stale(cutoff);
            for id in &expired {
                info!(
                    "Expired in-flight message {id} on topic {} to dead-letter queue",
                    state.name
                );
            }
            total += expired.len();
        }
        total
    }

    /// Clean up after a disconnected client: remove it from every topic's
    /// subscriber set. Its in-flight messages stay in the pending log — they
    /// are recovered by an explicit acknowledge or by the expiry sweep,
    /// never silently dropped on disconnect.
    pub fn disconnect(&self, client: &str) {
        for entry in self.registry.entries() {
            let mut state = entry.state.lock().unwrap();
            if state.subscribers.remove(client) {
                debug!("Unsubscribed {client} from topic {}", state.name);
            }
        }
        info!("Cleaned up client {client}");
    }

    /// Background housekeeping loop: sweep all topics for stale in-flight
    /// messages every `interval`. Runs until the process exits; it never
    /// blocks client-facing operations for longer than one topic sweep.
    pub async fn start_expiry_loop(broker: Arc<Broker>, interval: Duration, timeout: Duration) {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let moved = broker.sweep_expired(timeout);
            if moved > 0 {
                debug!("Expiry sweep moved {moved} message(s) to dead-letter queues");
            }
        }
    }

    pub(crate) fn registry(&self) -> &TopicRegistry {
        &self.registry
    }
}
