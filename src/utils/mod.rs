//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `intercom` application.
//!
//! This module centralizes the error taxonomy shared by the broker and the
//! transport layer, and the tracing setup used by the binary and by tests.

pub mod error;
pub mod logging;
