//! Shared test helpers for `buildhound-core` integration tests.
//!
//! These helpers provide build fixtures and lightweight client fakes so the
//! export tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod builds;
pub mod clients;
