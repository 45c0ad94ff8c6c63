//! Almanac - calendar and layout-shell components for terminal UIs.
//!
//! This crate provides keyboard-accessible, themeable calendar widgets
//! (single date, month granularity, and date range) together with an
//! app-layout shell whose drawers and feature notifications can be injected
//! at runtime through a message bus, decoupled from the shell's lifecycle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the layout bus and drawer registration API.
pub mod application;
/// Domain layer containing calendar values, movement, and grid algorithms.
pub mod domain;
/// Presentation layer containing widgets, theme, and the demo UI.
pub mod presentation;

/// Current version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = "almanac";
