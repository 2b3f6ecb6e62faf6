//! Saving and loading run results for reporting and plotting.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::schema::{ClusteringConfig, ClusteringResult, FitnessHistory, LabelAlphabet};

/// A finished run with its label names resolved, ready to be written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringExport {
    /// Configuration the run used.
    pub config: ClusteringConfig,
    /// Label names, indexed by label.
    pub alphabet: Vec<String>,
    /// Label name of every point under the best assignment.
    pub assignment: Vec<String>,
    /// The full result.
    pub result: ClusteringResult,
}

impl ClusteringExport {
    pub fn new(config: &ClusteringConfig, alphabet: &LabelAlphabet, result: ClusteringResult) -> Self {
        let assignment = result
            .best
            .labels
            .iter()
            .map(|&label| alphabet.name(label).unwrap_or("?").to_owned())
            .collect();

        Self {
            config: config.clone(),
            alphabet: alphabet.names().to_vec(),
            assignment,
            result,
        }
    }

    /// Write as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Load a previously saved export.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Write the fitness history alone, for external plotting tools.
pub fn save_history<P: AsRef<Path>>(history: &FitnessHistory, path: P) -> io::Result<()> {
    let json = serde_json::to_string_pretty(history)?;
    fs::write(path, json)
}
