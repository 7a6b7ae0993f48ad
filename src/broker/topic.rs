//! Per-topic state
//!
//! A `TopicState` owns everything the broker knows about one topic: the FIFO
//! queue of undelivered messages, the set of subscribed clients, the
//! pending-acknowledgment log of in-flight messages, and the dead-letter
//! queue of messages awaiting redelivery.
//!
//! Concurrency note: callers must synchronize access to `TopicState` via the
//! per-topic lock owned by the registry; every method here is a plain
//! single-threaded mutation so that each broker operation is one atomic
//! critical section under that lock.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::Utc;

use crate::broker::message::Message;

/// Opaque identifier for a connected session, supplied by the transport
/// layer. The broker only ever compares these for equality.
pub type ClientId = String;

/// An entry in the pending-acknowledgment log: a delivered but not yet
/// acknowledged message, together with who consumed it and when.
#[derive(Debug, Clone)]
pub struct InFlight {
    pub message: Message,
    pub consumer: ClientId,
    pub delivered_at: i64,
}

#[derive(Debug, Default)]
pub struct TopicState {
    pub name: String,
    next_id: u64,
    pub(crate) queue: VecDeque<Message>,
    pub subscribers: HashSet<ClientId>,
    pub(crate) pending: HashMap<u64, InFlight>,
    pub(crate) dead_letter: VecDeque<Message>,
}

impl TopicState {
    /// Create empty state for the given topic name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Assign the next sequence id and append the message to the queue tail.
    pub fn publish(&mut self, body: String) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.queue.push_back(Message {
            id,
            topic: self.name.clone(),
            body,
            enqueued_at: Utc::now().timestamp_millis(),
        });
        id
    }

    /// Add a subscriber to the topic. Duplicate adds are ignored.
    pub fn subscribe(&mut self, id: ClientId) {
        self.subscribers.insert(id);
    }

    /// Remove a subscriber from the topic. Absent ids are a no-op.
    pub fn unsubscribe(&mut self, id: &str) {
        self.subscribers.remove(id);
    }

    /// Take the message at the queue head and record it as in flight for
    /// `consumer`. Returns `None` when the queue is empty.
    ///
    /// The message moves into the pending log in the same step, so no other
    /// consumer can receive it until it is acknowledged, requeued, or
    /// expired. The queue is strict FIFO: always the head, never the tail.
    pub fn consume(&mut self, consumer: &str) -> Option<Message> {
        let message = self.queue.pop_front()?;
        let delivered = message.clone();
        self.pending.insert(
            message.id,
            InFlight {
                message,
                consumer: consumer.to_string(),
                delivered_at: Utc::now().timestamp_millis(),
            },
        );
        Some(delivered)
    }

    /// Discard the pending entry for `id`, but only if it was delivered to
    /// `consumer`. Check and removal happen as one step under the topic
    /// lock, so two clients racing to acknowledge the same id cannot both
    /// succeed. Returns `false` for an unknown, already-acknowledged, or
    /// foreign id.
    pub fn acknowledge(&mut self, id: u64, consumer: &str) -> bool {
        match self.pending.get(&id) {
            Some(entry) if entry.consumer == consumer => {
                self.pending.remove(&id);
                true
            }
            _ => false,
        }
    }

    /// Move the pending entry for `id` to the dead-letter tail (explicit
    /// retry of one in-flight message). Returns `false` if `id` is not in
    /// flight.
    pub fn move_to_dead_letter(&mut self, id: u64) -> bool {
        match self.pending.remove(&id) {
            Some(entry) => {
                self.dead_letter.push_back(entry.message);
                true
            }
            None => false,
        }
    }

    /// Move the dead-letter head back to the queue tail for redelivery.
    /// The message keeps its original id. Returns `false` if the dead-letter
    /// queue is empty.
    pub fn drain_dead_letter(&mut self) -> bool {
        match self.dead_letter.pop_front() {
            Some(message) => {
                self.queue.push_back(message);
                true
            }
            None => false,
        }
    }

    /// Move every pending entry delivered at or before `cutoff_ms` to the
    /// dead-letter tail. Returns the ids moved, oldest delivery first.
    pub fn expire_stale(&mut self, cutoff_ms: i64) -> Vec<u64> {
        let mut stale: Vec<(i64, u64)> = self
            .pending
            .values()
            .filter(|entry| entry.delivered_at <= cutoff_ms)
            .map(|entry| (entry.delivered_at, entry.message.id))
            .collect();
        stale.sort_unstable();

        let ids: Vec<u64> = stale.into_iter().map(|(_, id)| id).collect();
        for id in &ids {
            if let Some(entry) = self.pending.remove(id) {
                self.dead_letter.push_back(entry.message);
            }
        }
        ids
    }
}
