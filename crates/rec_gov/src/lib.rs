//! # RecGov
//!
//! This crate provides a client for the recreation.gov APIs: the public RIDB
//! API, which lists campsites page by page, and the internal month endpoint,
//! which reports per-night availability for every site of a campground.

/// Errors raised by the recreation.gov client.
mod error;
pub use error::*;

/// Wire formats of the RIDB and month endpoints.
mod types;
pub use types::*;

/// Interfaces the rest of the workspace fetches through.
mod source;
pub use source::*;

/// Offset/limit pagination over RIDB list endpoints.
mod pager;
pub use pager::*;

/// Client settings.
mod config;
pub use config::*;

/// reqwest-backed implementation of the source traits.
mod client;
pub use client::*;
