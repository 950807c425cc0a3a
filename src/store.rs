use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Simulation;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse data file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize data file: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no simulation with id {0}")]
    NotFound(u64),

    #[error("could not find config directory")]
    NoConfigDir,
}

/// On-disk layout of the data file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DataFile {
    #[serde(default)]
    simulations: Vec<Simulation>,
}

/// TOML-backed store for the simulation collection.
///
/// The store owns the records; the UI only reads slices out of it and
/// routes edits back through `add`/`update`/`remove`.
#[derive(Debug)]
pub struct SimStore {
    path: PathBuf,
    simulations: Vec<Simulation>,
}

impl SimStore {
    /// Default data file path (~/.config/simboard/simulations.toml)
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let dir = dirs::config_dir()
            .ok_or(StoreError::NoConfigDir)?
            .join("simboard");

        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(dir.join("simulations.toml"))
    }

    /// Load the store from a data file, starting empty if it doesn't exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let simulations = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let data: DataFile = toml::from_str(&content)?;
            data.simulations
        } else {
            tracing::debug!("No data file at {}, starting empty", path.display());
            Vec::new()
        };

        Ok(Self { path, simulations })
    }

    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Could not create data directory: {}", e);
            }
        }

        let data = DataFile {
            simulations: self.simulations.clone(),
        };
        let content = toml::to_string_pretty(&data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn simulations(&self) -> &[Simulation] {
        &self.simulations
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn get(&self, id: u64) -> Option<&Simulation> {
        self.simulations.iter().find(|s| s.id == id)
    }

    /// Add a new record, assigning the next free id. Returns the new id.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        status: impl Into<String>,
    ) -> Result<u64, StoreError> {
        let id = self
            .simulations
            .iter()
            .map(|s| s.id)
            .max()
            .map_or(1, |max| max + 1);

        self.simulations.push(Simulation::new(id, name, status));
        self.save()?;
        tracing::info!("Added simulation {}", id);
        Ok(id)
    }

    /// Replace the name and status of the record with the given id.
    pub fn update(
        &mut self,
        id: u64,
        name: impl Into<String>,
        status: impl Into<String>,
    ) -> Result<(), StoreError> {
        let sim = self
            .simulations
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;

        sim.name = name.into();
        sim.status = status.into();
        self.save()?;
        tracing::info!("Updated simulation {}", id);
        Ok(())
    }

    /// Remove the record with the given id.
    pub fn remove(&mut self, id: u64) -> Result<Simulation, StoreError> {
        let pos = self
            .simulations
            .iter()
            .position(|s| s.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let removed = self.simulations.remove(pos);
        self.save()?;
        tracing::info!("Removed simulation {}", id);
        Ok(removed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
