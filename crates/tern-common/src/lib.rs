//! Shared utilities for the tern rendering engine.
//!
//! This crate carries the pieces every other tern crate leans on:
//!
//! - [`warning`] — deduplicated warn-once reporting for unsupported or
//!   malformed constructs encountered while parsing real-world pages.
//! - [`urlutil`] — base-URL resolution helpers for stylesheet and image
//!   references, including `data:` URLs.
//! - [`net`] — a small blocking fetcher used by headless configurations
//!   to resolve `@import`/`<link>` stylesheets and image resources.

pub mod net;
pub mod urlutil;
pub mod warning;

pub use warning::{clear_warnings, warn_once};
