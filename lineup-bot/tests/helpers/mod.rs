//! Test helpers for lineup-bot integration tests
//!
//! - FakePlatform: in-memory ChatPlatform with call recording and failure injection
//! - Event builders for messages, reactions and slash commands

#![allow(dead_code)]

pub mod events;
pub mod fake_platform;

pub use events::*;
pub use fake_platform::{FakePlatform, InteractionCall};
