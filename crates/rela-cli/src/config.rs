//! Configuration for the Rela CLI.
//!
//! Provides [`RelaConfig`], loaded from TOML files, environment variables,
//! and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `RELA_CONFIG` environment variable
//! 3. XDG default: `~/.config/rela/config.toml`
//! 4. Built-in defaults
//!
//! Individual keys can be overridden with `RELA_<SECTION>_<KEY>`, e.g.
//! `RELA_GRAPH_SNAPSHOT_PATH`.

use confyg::{Confygery, env};
use rela_core::{Error, Result};
use rela_graph::{DEFAULT_PATH_DEPTH, PathSearch, SuggestOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default all-paths deadline in milliseconds.
pub const DEFAULT_PATH_TIMEOUT_MS: u64 = 2000;

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the Rela CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaConfig {
    /// Graph loading and traversal settings.
    pub graph: GraphConfig,

    /// Relationship suggestion defaults.
    pub suggest: SuggestOptions,
}

/// Graph loading and traversal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Snapshot file used when `--snapshot` is not given.
    pub snapshot_path: Option<String>,

    /// Default `max_depth` for all-paths search.
    pub max_path_depth: usize,

    /// All-paths deadline in milliseconds; 0 disables it.
    pub path_timeout_ms: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            max_path_depth: DEFAULT_PATH_DEPTH,
            path_timeout_ms: DEFAULT_PATH_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl RelaConfig {
    /// Load configuration from file, environment, and defaults.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        let mut env_opts = env::Options::with_top_level("RELA");
        env_opts.add_section("graph");
        env_opts.add_section("suggest");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("RELA_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("rela").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Snapshot file to query: the explicit path, else `graph.snapshot_path`.
    pub fn snapshot_path(&self, explicit: Option<&str>) -> Result<PathBuf> {
        explicit
            .or(self.graph.snapshot_path.as_deref())
            .map(PathBuf::from)
            .ok_or_else(|| {
                Error::config("no snapshot file: pass --snapshot or set graph.snapshot_path")
            })
    }

    /// Build all-paths search bounds, letting flags override configured values.
    pub fn path_search(&self, max_depth: Option<usize>, timeout_ms: Option<u64>) -> PathSearch {
        let search = PathSearch::new(max_depth.unwrap_or(self.graph.max_path_depth));
        match timeout_ms.unwrap_or(self.graph.path_timeout_ms) {
            0 => search,
            ms => search.with_timeout(Duration::from_millis(ms)),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
