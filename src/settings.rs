use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CURVE_OFFSET_FACTOR, DEFAULT_CURVE_SAMPLES, DEFAULT_PORT};
use crate::curve::CurveSettings;

const CONFIG_FILE_NAME: &str = "supplychain_map.ini";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub port: u16,
    #[serde(default)]
    pub auto_open_browser: bool,
    pub curve_samples: usize,
    pub curve_offset_factor: f64,
    #[serde(default)]
    pub data_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            auto_open_browser: false,
            curve_samples: DEFAULT_CURVE_SAMPLES,
            curve_offset_factor: DEFAULT_CURVE_OFFSET_FACTOR,
            data_file: None,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut settings = Settings::default();
        if !config_path.exists() {
            return Ok(settings);
        }

        let file = File::open(config_path).context("Failed to open config file")?;
        let reader = BufReader::new(file);
        let mut config_map = HashMap::new();

        for line in reader.lines() {
            let line = line.context("Failed to read line from config")?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        if let Some(port_str) = config_map.get("port") {
            match port_str.parse::<u16>() {
                Ok(port) => settings.port = port,
                Err(_) => tracing::warn!("Ignoring invalid port in config: {}", port_str),
            }
        }
        if let Some(auto_open_str) = config_map.get("auto_open_browser") {
            match auto_open_str.parse::<bool>() {
                Ok(auto_open) => settings.auto_open_browser = auto_open,
                Err(_) => tracing::warn!("Ignoring invalid auto_open_browser: {}", auto_open_str),
            }
        }
        if let Some(samples_str) = config_map.get("curve_samples") {
            match samples_str.parse::<usize>() {
                Ok(samples) if samples > 0 => settings.curve_samples = samples,
                _ => tracing::warn!("Ignoring invalid curve_samples: {}", samples_str),
            }
        }
        if let Some(factor_str) = config_map.get("curve_offset_factor") {
            match factor_str.parse::<f64>() {
                Ok(factor) if factor.is_finite() => settings.curve_offset_factor = factor,
                _ => tracing::warn!("Ignoring invalid curve_offset_factor: {}", factor_str),
            }
        }
        if let Some(data_file) = config_map.get("data_file") {
            let data_file = data_file.trim_matches('"');
            if !data_file.is_empty() {
                settings.data_file = Some(data_file.to_string());
            }
        }

        Ok(settings)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }

        let mut content = String::new();
        content.push_str("# Supply Chain Map Configuration File\n");
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));
        content.push_str(&format!("curve_samples = {}\n", self.curve_samples));
        content.push_str(&format!("curve_offset_factor = {}\n", self.curve_offset_factor));
        if let Some(ref data_file) = self.data_file {
            content.push_str(&format!("data_file = \"{}\"\n", data_file));
        }

        std::fs::write(config_path, content).context("Failed to write to config file")?;
        Ok(())
    }

    pub fn curve(&self) -> CurveSettings {
        CurveSettings {
            samples: self.curve_samples,
            offset_factor: self.curve_offset_factor,
        }
    }

    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push(CONFIG_FILE_NAME);
        path
    }
}
