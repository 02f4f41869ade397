//! Scenario tests for the command bridge and the sweep orchestrator
//!
//! Tests are organized by topic:
//! - `support` - In-memory fake engine shared by the other modules
//! - `session` - Domain tracking, prefixes and reply decoding through a session
//! - `api` - Pre/post-processor command rendering
//! - `model` - Model lifecycle and scoped session release
//! - `sweep` - Grid ordering, shapes, error policy and scenes

mod support;
mod sweep;
