//! CLI commands.

pub mod bootstrap;
pub mod info;
pub mod models;
pub mod smoke;
pub mod wait;
