//! Command implementations for the pros2vi CLI

pub mod config;
pub mod render;
