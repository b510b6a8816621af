//! Configuration management for freshroute
//!
//! Config stored at: ~/.config/freshroute/config.json

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use freshroute_domain::model::route::DEFAULT_FUEL_PER_PACKAGE;
use freshroute_domain::service::ReportOptions;
use freshroute_store::CorruptPolicy;
use freshroute_types::{ConfigError, OutputFormat, Result};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding packages.json and routes.json
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Directory report exports are written to
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Liters of fuel estimated per package on a route
    #[serde(default = "default_fuel_rate")]
    pub fuel_liters_per_package: f64,

    /// Minimum age in days before an open package counts as delayed
    #[serde(default)]
    pub delay_threshold_days: i64,

    /// Undelivered packages needed for an address to be reported
    #[serde(default = "default_problem_min")]
    pub problem_address_min_packages: usize,

    /// Refuse to start from an unreadable data document
    #[serde(default)]
    pub strict_storage: bool,
}

fn default_fuel_rate() -> f64 {
    DEFAULT_FUEL_PER_PACKAGE
}

fn default_problem_min() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            export_dir: None,
            output_format: OutputFormat::default(),
            fuel_liters_per_package: default_fuel_rate(),
            delay_threshold_days: 0,
            problem_address_min_packages: default_problem_min(),
            strict_storage: false,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("freshroute");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("freshroute");
        Ok(data_dir)
    }

    /// Export directory, the working directory unless configured
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn corrupt_policy(&self) -> CorruptPolicy {
        if self.strict_storage {
            CorruptPolicy::Fail
        } else {
            CorruptPolicy::Tolerate
        }
    }

    /// Report inputs for `date` (today when `None`)
    pub fn report_options(&self, date: Option<NaiveDate>) -> ReportOptions {
        let now = Local::now();
        ReportOptions {
            date: date.unwrap_or_else(|| now.date_naive()),
            now,
            delay_threshold_days: self.delay_threshold_days,
            problem_address_min_packages: self.problem_address_min_packages,
        }
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveError(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "FreshRoute Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Data dir:        {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Export dir:      {}", self.export_dir().display())?;
        writeln!(f, "Output format:   {}", self.output_format)?;
        writeln!(f, "Fuel per pkg:    {} L", self.fuel_liters_per_package)?;
        writeln!(f, "Delay threshold: {} day(s)", self.delay_threshold_days)?;
        writeln!(f, "Problem address: {}+ undelivered", self.problem_address_min_packages)?;
        writeln!(f, "Strict storage:  {}", self.strict_storage)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:     {}", path.display())?;
        }

        Ok(())
    }
}
