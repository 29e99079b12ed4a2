//! Integration test utilities for the pairchat gateway
//!
//! This crate provides helpers for running end-to-end tests against
//! a real gateway listening on a local port.

pub mod helpers;

pub use helpers::*;
