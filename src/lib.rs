//! trainerdex - trainer dashboard for the Discord Pokémon game
//!
//! The library holds the Pokédex engine (species lookup, sprite naming,
//! ingestion, filtering), the backend client, and the tui-dispatch store
//! and views. The binary wires them to a terminal.

pub mod action;
pub mod api;
pub mod config;
pub mod dex;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod session;
pub mod set;
pub mod species;
pub mod sprite;
pub mod state;
pub mod ui;
