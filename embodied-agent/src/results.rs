//! Persists a finished run to `results/<simulation_name>/`, grounded on the
//! original implementation's `save_success_history`/`env_history`/`config.json`
//! outputs. GIF and plot export are an external collaborator's concern; this
//! module only leaves the seam (the [`ResultWriter`] trait) for one.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::RunConfig;
use crate::error::{AgentError, Result};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SuccessRecord {
    pub succeeded: bool,
    pub tick: u64,
}

/// Everything a finished run accumulated, ready to be persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RunResults<'a> {
    pub env_history: &'a [(f64, f64)],
    pub free_energy_history: &'a [f64],
    pub success_history: &'a [SuccessRecord],
    pub config: &'a RunConfig,
}

/// Seam for result persistence. The JSON writer below is the only
/// implementation in this crate; a GIF/plot exporter is a separate concern.
pub trait ResultWriter {
    fn write(&self, simulation_name: &str, results: &RunResults) -> Result<()>;
}

/// Writes every history as its own JSON file under `results/<simulation_name>/`.
#[derive(Debug, Clone)]
pub struct JsonResultWriter {
    results_root: PathBuf,
}

impl JsonResultWriter {
    pub fn new(results_root: impl Into<PathBuf>) -> Self {
        Self {
            results_root: results_root.into(),
        }
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(|e| AgentError::Loading {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| AgentError::Loading {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

impl ResultWriter for JsonResultWriter {
    fn write(&self, simulation_name: &str, results: &RunResults) -> Result<()> {
        let dir = self.results_root.join(simulation_name);
        fs::create_dir_all(&dir).map_err(|e| AgentError::Loading {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;

        Self::write_json(&dir.join("env_history.json"), &results.env_history)?;
        Self::write_json(
            &dir.join("free_energy_history.json"),
            &results.free_energy_history,
        )?;
        Self::write_json(&dir.join("success_history.json"), &results.success_history)?;
        Self::write_json(&dir.join("config.json"), &results.config)
    }
}
