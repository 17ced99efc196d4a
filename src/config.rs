//! Configuration system for the melody-to-score quantizer

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub version: String,
    pub tempo: TempoConfig,
    pub grid: GridConfig,
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            tempo: TempoConfig::default(),
            grid: GridConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// Tempo resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    /// Fixed BPM supplied by the caller; takes precedence over everything else
    pub bpm_override: Option<f64>,
    /// Estimate tempo from inter-onset intervals when the file carries none
    pub estimate_from_events: bool,
    /// Plausible BPM range for the estimator
    pub range_bpm: [f64; 2],
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            bpm_override: None,
            estimate_from_events: true,
            range_bpm: [40.0, 250.0],
        }
    }
}

/// Grid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Subdivisions per quarter note (4 = sixteenth-note grid)
    pub subdivision: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { subdivision: 4 }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub midi_filename: String,
    pub analysis_filename: String,
    pub write_analysis: bool,
    /// Pulses per quarter note for the exported SMF
    pub ppq: u16,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            midi_filename: "quantized.mid".to_string(),
            analysis_filename: "analysis.json".to_string(),
            write_analysis: true,
            ppq: 960,
        }
    }
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> anyhow::Result<()> {
    if config.tempo.range_bpm[0] >= config.tempo.range_bpm[1] {
        anyhow::bail!("tempo range_bpm min must be < max");
    }
    if config.tempo.range_bpm[0] <= 0.0 {
        anyhow::bail!("tempo range_bpm min must be positive");
    }
    if config.grid.subdivision == 0 {
        anyhow::bail!("grid subdivision must be >= 1");
    }
    if config.export.ppq < 24 {
        anyhow::bail!("export ppq must be >= 24");
    }

    Ok(())
}

/// Load configuration from JSON file
pub fn load_config<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Save configuration to JSON file
pub fn save_config<P: AsRef<std::path::Path>>(config: &Config, path: P) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
