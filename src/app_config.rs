//! Application configuration loading: TOML file defaults merged under CLI flags.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use harvester_core::HarvestConfig;
use harvester_core::config::parse_seed_list;
use serde::Deserialize;

use crate::cli::Args;

/// TOML-backed file configuration for harvester defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Scheme and host prefixed to relative links.
    pub base_domain: Option<String>,
    /// Directory documents are saved into.
    pub output_dir: Option<PathBuf>,
    /// Aggregate page file; derived from the base domain when absent.
    pub aggregate_path: Option<PathBuf>,
    /// Seed pages listed inline.
    pub seed_urls: Option<Vec<String>>,
    /// Seed pages listed in a separate file, one per line.
    pub seeds_file: Option<PathBuf>,
    /// Maximum concurrent downloads.
    pub concurrency: Option<u8>,
    /// Per-download timeout in seconds.
    pub download_timeout_secs: Option<u64>,
    /// Per-page timeout in seconds.
    pub page_timeout_secs: Option<u64>,
    /// Identity header for every request.
    pub user_agent: Option<String>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(concurrency) = self.concurrency
            && !(1..=32).contains(&concurrency)
        {
            bail!("Invalid config value for `concurrency`: {concurrency}. Expected range: 1..=32");
        }
        validate_timeout_secs("download_timeout_secs", self.download_timeout_secs)?;
        validate_timeout_secs("page_timeout_secs", self.page_timeout_secs)?;

        if self.seed_urls.is_some() && self.seeds_file.is_some() {
            bail!("Config sets both `seed_urls` and `seeds_file`; use one");
        }
        if let Some(user_agent) = &self.user_agent
            && user_agent.trim().is_empty()
        {
            bail!("Invalid config value for `user_agent`: must not be empty");
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value == 0 {
        bail!("Invalid config value for `{field}`: 0. Expected a positive number of seconds");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Path the config was read from, if any.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/harvester/config.toml`
/// 2. `$HOME/.config/harvester/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("harvester")
                .join("config.toml"),
        );
    }

    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("harvester")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file.
///
/// An explicit path must exist. The default path is optional: a missing file
/// yields no config.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
        });
    }

    let Some(path) = resolve_default_config_path() else {
        return Ok(LoadedConfig {
            path: None,
            config: None,
        });
    };
    if !path.exists() {
        return Ok(LoadedConfig {
            path: None,
            config: None,
        });
    }

    let config = load_file_config(&path)?;
    Ok(LoadedConfig {
        path: Some(path),
        config: Some(config),
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let mut config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

    // A relative seeds file is looked up next to the config file.
    if let (Some(seeds_file), Some(parent)) = (&config.seeds_file, path.parent())
        && seeds_file.is_relative()
    {
        config.seeds_file = Some(parent.join(seeds_file));
    }
    Ok(config)
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

fn read_seeds_file(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seeds file '{}'", path.display()))?;
    Ok(parse_seed_list(&raw))
}

/// Builds the run configuration: CLI flags over file values over built-ins.
pub fn build_harvest_config(args: &Args, file: Option<&FileConfig>) -> Result<HarvestConfig> {
    let file = file.cloned().unwrap_or_default();

    let mut config = match args.base_domain.clone().or(file.base_domain) {
        Some(base_domain) => HarvestConfig::new(base_domain),
        None => HarvestConfig::default(),
    };

    if let Some(aggregate_path) = file.aggregate_path {
        config.aggregate_path = aggregate_path;
    }
    if let Some(output_dir) = args.output_dir.clone().or(file.output_dir) {
        config.output_dir = output_dir;
    }

    if let Some(seeds_file) = &args.seeds_file {
        config.seed_urls = read_seeds_file(seeds_file)?;
    } else if let Some(seed_urls) = file.seed_urls {
        config.seed_urls = seed_urls;
    } else if let Some(seeds_file) = &file.seeds_file {
        config.seed_urls = read_seeds_file(seeds_file)?;
    }

    if let Some(concurrency) = args.concurrency.or(file.concurrency) {
        config.concurrency = usize::from(concurrency);
    }
    if let Some(secs) = args.download_timeout.or(file.download_timeout_secs) {
        config.download_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.page_timeout_secs {
        config.page_timeout = Some(Duration::from_secs(secs));
    }
    if let Some(user_agent) = file.user_agent {
        config.user_agent = user_agent;
    }

    config.validate()?;
    Ok(config)
}
