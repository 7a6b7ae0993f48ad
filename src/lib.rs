//! # Intercom
//!
//! `intercom` is a minimalist, in-memory message broker built with Rust.
//! Clients publish messages to named topics over a plain-text TCP protocol,
//! other clients consume those topics, and the broker tracks every delivery
//! so that unacknowledged messages can be recovered (at-least-once
//! semantics).
//!
//! ## Core Modules
//!
//! The library is structured into several modules, each with a distinct responsibility:
//!
//! - `broker`: The central component: per-topic queues, the subscriber
//!   registry, the pending-acknowledgment log, and dead-letter recovery.
//! - `config`: Handles loading and managing server configuration.
//! - `transport`: Manages the TCP server and the line-oriented command
//!   protocol spoken by clients.
//! - `utils`: Contains shared utilities, such as error types and logging setup.

pub mod broker;
pub mod config;
pub mod transport;
pub mod utils;
