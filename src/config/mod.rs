// src/config/mod.rs

//! Spawn profiles.
//!
//! - `model.rs`: the TOML-backed data model and CLI overrides.
//! - `loader.rs`: read a profile from disk.
//! - `validate.rs`: turn a raw profile into validated [`SpawnOptions`](crate::SpawnOptions).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, Overrides, RawConfigFile};
pub use validate::parse_env_pair;
