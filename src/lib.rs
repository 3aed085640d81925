//! Display metadata for waterfall feed items.
//!
//! The [`feed`] module holds the enrichment pipeline and is all a host
//! application needs. [`config`], [`input`] and [`output`] back the
//! `feedmeta` command-line tool.

pub mod config;
pub mod feed;
pub mod input;
pub mod output;
pub mod util;
