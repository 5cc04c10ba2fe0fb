//! Revitlegis library
//!
//! Character-level comparison engine plus the review workflow around it.
//! The binary in `main.rs` only wires these modules into an eframe window.

pub mod app;
pub mod backend;
pub mod config;
pub mod constant;
pub mod diff;
pub mod engine;
pub mod messages;
pub mod review;
pub mod style;
pub mod ui;
