use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub batch: Batch,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    /// Directory holding the per-OS engine binaries; also the engine's cwd.
    pub bin_dir: String,
    /// Explicit executable path; empty selects by operating system.
    pub executable: String,
    /// Hash table size in bits (`-h`).
    pub hash_table_size: Option<u32>,
    /// Engine-internal search tasks (`-n`).
    pub tasks: Option<u32>,
    /// Search level limit (`-l`).
    pub level: Option<u32>,
    /// Per-invocation limit; 0 disables it.
    pub timeout_seconds: u64,
}
impl Default for Engine {
    fn default() -> Self {
        Self {
            bin_dir: "bin".into(),
            executable: "".into(),
            hash_table_size: None,
            tasks: None,
            level: None,
            timeout_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Batch {
    /// Concurrent engine invocations; 0 uses the available parallelism.
    pub parallelism: usize,
    pub strict_positions: bool,
}
impl Default for Batch {
    fn default() -> Self {
        Self {
            parallelism: 0,
            strict_positions: false,
        }
    }
}

impl Batch {
    pub fn effective_parallelism(&self) -> usize {
        if self.parallelism > 0 {
            return self.parallelism;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub format: String,
    pub write_report_json: bool,
    pub report_path: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            format: "json".into(),
            write_report_json: false,
            report_path: "out/batch-report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "out/edax-batch.log".into(),
        }
    }
}
