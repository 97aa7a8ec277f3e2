//! # hws-core — Whitespace scanner for hws
//!
//! The host-independent half of the whitespace highlighter:
//!
//! - **[`region`]** — `Region` char ranges, the two named region sets, draw flags
//! - **[`scan`]** — the space-run / tab-run patterns and the pure scanner
//! - **[`config`]** — highlighter options read leniently from persisted settings
//!
//! Nothing here talks to an editor. The scanner is a pure function of
//! (buffer text, configuration), so every rule can be tested on plain strings.

pub mod config;
pub mod region;
pub mod scan;

pub use config::Config;
pub use region::{DrawFlags, Region, RegionKey};
pub use scan::{Scan, Skip};
