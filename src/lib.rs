//! `guildstore` - Guild-scoped durable stores for a Discord bot
//!
//! This crate provides the persistence layer behind the bot's command
//! handlers: small JSON-file-backed stores scoped by guild (and sometimes
//! channel or user) for panel locations, per-channel GIF overrides, embed
//! colours, and join/leave counters, with atomic writes, in-memory caching,
//! and a leaderboard query over the counters. Command routing and all
//! Discord client behavior live outside this crate; callers hand in opaque
//! string identifiers and get owned values back.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,

    // Correctness
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Style consistency
    clippy::enum_glob_use,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]
// Tests use env manipulation and unwrap/expect freely.
#![cfg_attr(test, allow(unsafe_code, clippy::unwrap_used, clippy::expect_used))]

/// Data directory resolution (env override + memoization)
pub mod config;
/// Generic file-backed load/mutate/save engine
pub mod engine;
/// Unified error types and result handling
pub mod errors;
/// Concrete guild-scoped stores (panels, GIFs, colours, counters)
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use engine::StoreEngine;
pub use errors::{Error, Result};
pub use store::{CounterKind, EmbedColorStore, GifStore, JoinLeaveStore, Panel, PanelStore, UserCounters};
