//! Configuration module

use crate::archive::ZipOptions;
use crate::filter::FilterPatterns;
use crate::{Error, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// File selection defaults
    #[serde(default)]
    pub filter: FilterConfig,
    /// Archive writing defaults
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// File selection configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Default filter string (comma/newline separated, `!` excludes)
    #[serde(default)]
    pub patterns: String,
}

/// Archive configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Compressed size limit in bytes (0 = unlimited). Accepts size strings
    /// such as "100MiB" in the config file.
    #[serde(default, deserialize_with = "deserialize_size")]
    pub max_zip_size: u64,
    /// Deflate level (0-9, 0 stores entries uncompressed)
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

fn default_compression_level() -> u32 {
    6
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            max_zip_size: 0,
            compression_level: default_compression_level(),
        }
    }
}

/// Size given either as a number of bytes or as a size string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Bytes(u64),
    Text(String),
}

fn deserialize_size<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    match SizeValue::deserialize(deserializer)? {
        SizeValue::Bytes(bytes) => Ok(bytes),
        SizeValue::Text(text) => parse_size(&text)
            .map_err(|e| D::Error::custom(format!("Failed to parse size: {}", e))),
    }
}

/// Parse size string like "100MiB" to bytes
pub fn parse_size(size_str: &str) -> Result<u64> {
    let size_str = size_str.trim();

    // Try to parse as plain number first
    if let Ok(bytes) = size_str.parse::<u64>() {
        return Ok(bytes);
    }

    // Find where the number ends and unit begins
    let split_pos = size_str
        .chars()
        .position(|c| !c.is_ascii_digit() && c != '.')
        .unwrap_or(size_str.len());

    if split_pos == 0 {
        return Err(Error::Config(format!("Invalid size format: {}", size_str)));
    }

    let (number_part, unit_part) = size_str.split_at(split_pos);
    let number: f64 = number_part
        .parse()
        .map_err(|_| Error::Config(format!("Invalid number in size: {}", number_part)))?;

    let multiplier: u64 = match unit_part.trim().to_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" => 1_000,
        "m" | "mb" => 1_000_000,
        "g" | "gb" => 1_000_000_000,
        "t" | "tb" => 1_000_000_000_000,
        "ki" | "kib" => 1_024,
        "mi" | "mib" => 1_048_576,
        "gi" | "gib" => 1_073_741_824,
        "ti" | "tib" => 1_099_511_627_776,
        _ => return Err(Error::Config(format!("Unknown size unit: {}", unit_part))),
    };

    Ok((number * multiplier as f64) as u64)
}

impl Config {
    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| Error::Config("Unable to determine config directory".to_string()))?;

        let zipper_dir = config_dir.join("zipper");
        if !zipper_dir.exists() {
            fs::create_dir_all(&zipper_dir)?;
        }

        Ok(zipper_dir.join("config.toml"))
    }

    /// Get default configuration content with examples
    pub fn default_config_content() -> String {
        r#"# Zipper Configuration File

[filter]
# Default filter: comma or newline separated glob patterns.
# Patterns starting with "!" exclude files. Empty selects everything.
# patterns = "**/*.java, **/*.xml, !**/target/**"
patterns = ""

[archive]
# Compressed size limit, checked before each file is added.
# Plain bytes or a size string such as "100MiB". 0 = unlimited.
max_zip_size = 0
# Deflate level (0-9, 0 stores entries uncompressed)
compression_level = 6
"#
        .to_string()
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            fs::write(&path, Self::default_config_content())?;
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, contents)?;
        Ok(())
    }

    /// Load configuration or use defaults if loading fails
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Reject values the archive writer cannot use
    pub fn validate(&self) -> Result<()> {
        self.zip_options().compression().map(|_| ())
    }

    /// Parsed default filter
    pub fn filter_patterns(&self) -> FilterPatterns {
        FilterPatterns::parse(Some(&self.filter.patterns))
    }

    /// Writer options derived from this configuration
    pub fn zip_options(&self) -> ZipOptions {
        ZipOptions {
            max_zip_size: self.archive.max_zip_size,
            compression_level: Some(self.archive.compression_level),
            ..Default::default()
        }
    }
}
