//! Terminal table viewer built around a client side table engine.
//!
//! [`engine`] holds the UI independent core (search, sort, paging, selection).
//! The remaining modules wire it into a ratatui application.

pub mod context;
pub mod controller;
pub mod demo;
pub mod domain;
pub mod engine;
pub mod export;
pub mod inputter;
pub mod loader;
pub mod model;
pub mod ui;
