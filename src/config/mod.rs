//! Configuration loading and management for the Workforce Engine.
//!
//! This module provides functionality to load engine configuration from YAML
//! files: server settings, the attendance policy (late cutoff, half-day
//! threshold, standard day), directory client settings and an optional
//! static employee roster.
//!
//! # Example
//!
//! ```no_run
//! use workforce_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Listening on {}", loader.config().server().bind_addr);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendancePolicy, DirectorySettings, EngineConfig, EngineSettings, RosterConfig, ServerConfig,
};
