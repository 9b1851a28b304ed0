//! Writes a run's port interactions to a cassette file.

use std::path::PathBuf;

use chrono::Utc;

use super::format::Cassette;

/// Accumulates interactions into a [`Cassette`] and saves it as YAML.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    cassette: Cassette,
}

impl CassetteRecorder {
    /// Starts an empty cassette for `repository` that will be saved to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self::resume(path, Cassette::new(name, repository))
    }

    /// Continues recording on top of an existing cassette.
    pub fn resume(path: impl Into<PathBuf>, cassette: Cassette) -> Self {
        Self {
            path: path.into(),
            cassette,
        }
    }

    /// Appends one interaction; sequence numbers follow recording order.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.cassette.push(port, method, input, output);
    }

    /// Stamps the cassette with the finish time and writes it, creating
    /// parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be serialized or written.
    pub fn finish(mut self) -> Result<PathBuf, std::io::Error> {
        self.cassette.recorded_at = Utc::now();
        let yaml = serde_yaml::to_string(&self.cassette).map_err(std::io::Error::other)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}
