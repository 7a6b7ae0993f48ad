pub mod engine;
pub mod message;
pub mod registry;
pub mod topic;

pub use engine::Broker;
