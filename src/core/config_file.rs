//! Pipeline configuration file handling
//!
//! Settings come from a JSON file, by default ./pixel-design.json or
//! ~/.config/pixel-glyph-design/settings.json

use crate::design::name::LocaleFlavors;
use crate::design::{DesignContext, DesignError};
use crate::unicode::{BlockTable, EastAsianWidthTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the project-level config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "pixel-design.json";

const APP_DIR_NAME: &str = "pixel-glyph-design";

fn default_outputs_dir() -> PathBuf {
    PathBuf::from("build/outputs")
}

/// Pipeline configuration
///
/// Relative paths are resolved against the directory holding the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Design roots, each holding one `<px>` tree per size
    pub design_dirs: Vec<PathBuf>,
    /// Pixel sizes to build
    pub font_sizes: Vec<u32>,
    /// Accepted locale flavor tags, in canonical order
    #[serde(default)]
    pub locale_flavors: Vec<String>,
    /// UCD Blocks.txt
    pub unicode_blocks_file: PathBuf,
    /// UCD EastAsianWidth.txt
    pub east_asian_width_file: PathBuf,
    /// Where collected alphabets and design maps are written
    #[serde(default = "default_outputs_dir")]
    pub outputs_dir: PathBuf,
}

impl ConfigFile {
    /// Get the path to the user config directory
    pub fn config_dir() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
        config_dir.join(APP_DIR_NAME)
    }

    /// Get the path to the user-level config file
    pub fn user_config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Pick the config file to use
    ///
    /// Priority order:
    /// 1. Explicit path (--config)
    /// 2. ./pixel-design.json
    /// 3. User config directory
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }
        let user = Self::user_config_path();
        user.is_file().then_some(user)
    }

    /// Load, resolve and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: ConfigFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let base = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        config.resolve_paths(base);
        config
            .validate()
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        self.design_dirs.iter_mut().for_each(resolve);
        resolve(&mut self.unicode_blocks_file);
        resolve(&mut self.east_asian_width_file);
        resolve(&mut self.outputs_dir);
    }

    /// Check the values a build cannot run without
    pub fn validate(&self) -> Result<(), DesignError> {
        let invalid = |message: String| Err(DesignError::InvalidConfig(message));

        if self.design_dirs.is_empty() {
            return invalid("'design_dirs' is empty".to_string());
        }
        if self.font_sizes.is_empty() {
            return invalid("'font_sizes' is empty".to_string());
        }
        if self.font_sizes.contains(&0) {
            return invalid("'font_sizes' contains 0".to_string());
        }
        for (index, flavor) in self.locale_flavors.iter().enumerate() {
            if flavor.is_empty()
                || flavor.chars().any(|c| c == ',' || c.is_whitespace())
                || flavor.to_lowercase() != *flavor
            {
                return invalid(format!(
                    "locale flavor '{flavor}' must be lowercase without spaces or commas"
                ));
            }
            if self.locale_flavors[..index].contains(flavor) {
                return invalid(format!("locale flavor '{flavor}' is listed twice"));
            }
        }
        Ok(())
    }

    pub fn flavors(&self) -> LocaleFlavors {
        LocaleFlavors::new(self.locale_flavors.iter().cloned())
    }

    /// Load the Unicode tables and build the context shared by every stage
    pub fn load_context(&self) -> Result<DesignContext> {
        let blocks_text = fs::read_to_string(&self.unicode_blocks_file).with_context(|| {
            format!(
                "Failed to read Unicode block table {}",
                self.unicode_blocks_file.display()
            )
        })?;
        let blocks = BlockTable::parse(&blocks_text)
            .with_context(|| format!("In {}", self.unicode_blocks_file.display()))?;

        let widths_text = fs::read_to_string(&self.east_asian_width_file).with_context(|| {
            format!(
                "Failed to read east asian width table {}",
                self.east_asian_width_file.display()
            )
        })?;
        let widths = EastAsianWidthTable::parse(&widths_text)
            .with_context(|| format!("In {}", self.east_asian_width_file.display()))?;

        debug!(
            "Loaded {} Unicode blocks and {} locale flavors",
            blocks.len(),
            self.locale_flavors.len()
        );
        Ok(DesignContext::new(blocks, self.flavors(), widths))
    }

    /// Example configuration written by --new-config
    pub fn example() -> Self {
        Self {
            design_dirs: vec![PathBuf::from("assets/design")],
            font_sizes: vec![10, 12, 16],
            locale_flavors: ["latin", "zh_cn", "zh_hk", "zh_tw", "zh_tr", "ko", "ja"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            unicode_blocks_file: PathBuf::from("assets/unicode/Blocks.txt"),
            east_asian_width_file: PathBuf::from("assets/unicode/EastAsianWidth.txt"),
            outputs_dir: default_outputs_dir(),
        }
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Write the example config unless a file already exists
    ///
    /// Returns whether a file was written.
    pub fn initialize(path: &Path) -> Result<bool> {
        if path.exists() {
            println!("Config file already exists: {:?}", path);
            return Ok(false);
        }
        Self::example().save(path)?;
        println!("Created config file: {:?}", path);
        println!("\nEdit it to point at your design directories and the UCD files:");
        println!("  - Blocks.txt and EastAsianWidth.txt from https://www.unicode.org/Public/UCD/latest/ucd/");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DefectKind;
    use tempfile::TempDir;

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"{
                "design_dirs": ["assets/design", "/abs/design"],
                "font_sizes": [12],
                "locale_flavors": ["zh_cn", "ja"],
                "unicode_blocks_file": "ucd/Blocks.txt",
                "east_asian_width_file": "ucd/EastAsianWidth.txt"
            }"#,
        )
        .unwrap();

        let config = ConfigFile::load(&path).unwrap();
        assert_eq!(
            config.design_dirs,
            vec![dir.path().join("assets/design"), PathBuf::from("/abs/design")]
        );
        assert_eq!(config.unicode_blocks_file, dir.path().join("ucd/Blocks.txt"));
        assert_eq!(config.outputs_dir, dir.path().join("build/outputs"));
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut value = serde_json::to_value(ConfigFile::example()).unwrap();
        value["font_size"] = serde_json::json!(12);
        fs::write(&path, value.to_string()).unwrap();

        assert!(ConfigFile::load(&path).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(ConfigFile::example().validate().is_ok());

        let mut config = ConfigFile::example();
        config.font_sizes.clear();
        assert_eq!(config.validate().unwrap_err().kind(), DefectKind::Config);

        let mut config = ConfigFile::example();
        config.locale_flavors.push("zh_CN".to_string());
        assert!(config.validate().is_err());

        let mut config = ConfigFile::example();
        config.locale_flavors.push("ja".to_string());
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("listed twice"));
    }

    #[test]
    fn test_initialize_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        assert!(ConfigFile::initialize(&path).unwrap());
        assert_eq!(ConfigFile::load(&path).unwrap().font_sizes, vec![10, 12, 16]);

        fs::write(&path, "{}").unwrap();
        assert!(!ConfigFile::initialize(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_load_context_reads_unicode_tables() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Blocks.txt"), "0000..007F; Basic Latin\n").unwrap();
        fs::write(dir.path().join("EastAsianWidth.txt"), "0020..007E;Na\n").unwrap();

        let mut config = ConfigFile::example();
        config.unicode_blocks_file = dir.path().join("Blocks.txt");
        config.east_asian_width_file = dir.path().join("EastAsianWidth.txt");

        let ctx = config.load_context().unwrap();
        assert_eq!(ctx.blocks.len(), 1);
        assert!(ctx.flavors.contains("ja"));
        assert_eq!(
            ctx.east_asian_widths.east_asian_width('A'),
            crate::unicode::EastAsianWidth::Narrow
        );
    }

    #[test]
    fn test_load_context_reports_missing_tables() {
        let dir = TempDir::new().unwrap();
        let mut config = ConfigFile::example();
        config.unicode_blocks_file = dir.path().join("missing.txt");
        let err = config.load_context().unwrap_err();
        assert!(format!("{err:#}").contains("missing.txt"));
    }
}
