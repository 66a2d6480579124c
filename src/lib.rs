//! City Weather Library
//!
//! The reusable core of the application: the cached WeatherAPI client, the
//! response formatter, static lookup tables, configuration and CLI parsing.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
