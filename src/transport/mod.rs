//! The `transport` module is responsible for handling network communication
//! with clients over plain TCP.
//!
//! It defines the line-oriented command protocol used between clients and
//! the server, and implements the TCP server itself, managing connections,
//! command parsing, and forwarding client requests to the broker.

pub mod command;
pub mod server;

#[cfg(test)]
mod tests;
