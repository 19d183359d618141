//! Progress-bar and footer navigation for slide-based presentations.
//!
//! The chrome ([`navigation::NavigationLine`]) runs against any [`session::Host`]; the crate
//! also ships a deck-backed host ([`presentation::Presentation`]) and an egui player.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod deck;
pub mod footer;
pub mod l10n;
pub mod navigation;
pub mod popup;
pub mod presentation;
pub mod progress;
pub mod render;
pub mod session;
pub mod state;
pub mod theme;
pub mod tracking;
pub mod view;
pub mod xapi;

#[cfg(test)]
mod testing;
