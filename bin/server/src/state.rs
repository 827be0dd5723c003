//! Server application state

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use common::SecretGate;
use storage::{BodyWriter, SaveDirectory};

/// Read-only state shared by every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub secret: SecretGate,
    pub save_dir: SaveDirectory,
    pub writer: BodyWriter,
}

impl AppState {
    pub fn new(secret: SecretGate, save_dir: SaveDirectory, writer: BodyWriter) -> Self {
        Self {
            secret,
            save_dir,
            writer,
        }
    }

    /// Build the state, checking that the save directory exists.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let save_dir = SaveDirectory::open(&config.directory, config.max_name_attempts)
            .context("Cannot use save directory")?;
        Ok(Self::new(
            config.secret.clone(),
            save_dir,
            BodyWriter::new(config.part_size),
        ))
    }
}
