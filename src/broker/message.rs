/// A published message in the broker.
///
/// A message is created once on publish and is immutable afterwards. At any
/// point in time it is owned by exactly one container of its topic: the
/// queue (awaiting delivery), the pending-acknowledgment log (in flight),
/// or the dead-letter queue (awaiting redelivery). Moving a message between
/// containers is a transfer of ownership, never a copy with two live homes.
///
/// # Fields
///
/// - `id` - Broker-assigned sequence number, monotonic and unique within the
///   topic, never reused. Consumers echo it back on ACKNOWLEDGE/REQUEUE.
/// - `topic` - The name of the topic this message belongs to.
/// - `body` - The message content as published by the client.
/// - `enqueued_at` - Milliseconds since the UNIX epoch at publish time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub topic: String,
    pub body: String,
    pub enqueued_at: i64,
}
