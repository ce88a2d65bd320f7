// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional TOML file, and command-line flags (each of which also reads
//! a `RESIZEP_*` environment variable).

use crate::auth::firebase::DEFAULT_BASE_URL;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Identity provider back end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Supabase,
    Firebase,
}

impl ProviderKind {
    /// Whether signing out also drops saved projects unless overridden.
    pub fn clears_projects_on_logout(self) -> bool {
        match self {
            ProviderKind::Supabase => true,
            ProviderKind::Firebase => false,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "resizep", version, about = "Resize images to presets or custom dimensions")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "RESIZEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the local store
    #[arg(long, env = "RESIZEP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Identity provider to authenticate against
    #[arg(long, env = "RESIZEP_PROVIDER", value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long, env = "RESIZEP_SUPABASE_URL")]
    pub supabase_url: Option<String>,

    #[arg(long, env = "RESIZEP_SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_anon_key: Option<String>,

    #[arg(long, env = "RESIZEP_FIREBASE_API_KEY", hide_env_values = true)]
    pub firebase_api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FirebaseSettings {
    pub base_url: String,
    pub api_key: String,
}

impl Default for FirebaseSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

/// Contents of the TOML file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    provider: Option<ProviderKind>,
    data_dir: Option<PathBuf>,
    store_quota_bytes: Option<usize>,
    clear_projects_on_logout: Option<bool>,
    supabase: SupabaseSettings,
    firebase: FirebaseSettings,
}

/// Resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub provider: ProviderKind,
    /// `None` when no per-user data directory could be found; the app then
    /// keeps its store in memory.
    pub data_dir: Option<PathBuf>,
    pub store_quota_bytes: Option<usize>,
    pub clear_projects_on_logout: bool,
    pub supabase: SupabaseSettings,
    pub firebase: FirebaseSettings,
}

impl Settings {
    pub fn store_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join("store.json"))
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join("resizep"))
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
}

/// Resolve settings from the command line and the optional config file.
pub fn load(cli: Cli) -> Result<Settings> {
    let file = match &cli.config {
        Some(path) => read_file(path)?,
        None => FileConfig::default(),
    };
    Ok(merge(cli, file, default_data_dir()))
}

fn merge(cli: Cli, file: FileConfig, fallback_dir: Option<PathBuf>) -> Settings {
    let provider = cli.provider.or(file.provider).unwrap_or_default();
    let mut supabase = file.supabase;
    let mut firebase = file.firebase;
    if let Some(url) = cli.supabase_url {
        supabase.url = url;
    }
    if let Some(key) = cli.supabase_anon_key {
        supabase.anon_key = key;
    }
    if let Some(key) = cli.firebase_api_key {
        firebase.api_key = key;
    }
    Settings {
        provider,
        data_dir: cli.data_dir.or(file.data_dir).or(fallback_dir),
        store_quota_bytes: file.store_quota_bytes,
        clear_projects_on_logout: file
            .clear_projects_on_logout
            .unwrap_or_else(|| provider.clears_projects_on_logout()),
        supabase,
        firebase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["resizep"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = merge(cli(&[]), FileConfig::default(), Some(PathBuf::from("/data")));
        assert_eq!(settings.provider, ProviderKind::Supabase);
        assert!(settings.clear_projects_on_logout);
        assert_eq!(settings.store_path(), Some(PathBuf::from("/data/store.json")));
        assert_eq!(settings.firebase.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_firebase_keeps_projects_by_default() {
        let settings = merge(cli(&["--provider", "firebase"]), FileConfig::default(), None);
        assert_eq!(settings.provider, ProviderKind::Firebase);
        assert!(!settings.clear_projects_on_logout);
        assert_eq!(settings.store_path(), None);
    }

    #[test]
    fn test_file_then_flags() {
        let file: FileConfig = toml::from_str(
            r#"
            provider = "firebase"
            data_dir = "/from/file"
            store_quota_bytes = 5000000
            clear_projects_on_logout = true

            [supabase]
            url = "https://example.supabase.co"
            anon_key = "file-key"

            [firebase]
            api_key = "fb-key"
            "#,
        )
        .unwrap();

        let settings = merge(
            cli(&["--provider", "supabase", "--supabase-anon-key", "flag-key"]),
            file,
            Some(PathBuf::from("/fallback")),
        );
        assert_eq!(settings.provider, ProviderKind::Supabase);
        assert_eq!(settings.data_dir, Some(PathBuf::from("/from/file")));
        assert_eq!(settings.store_quota_bytes, Some(5_000_000));
        assert!(settings.clear_projects_on_logout);
        assert_eq!(settings.supabase.url, "https://example.supabase.co");
        assert_eq!(settings.supabase.anon_key, "flag-key");
        assert_eq!(settings.firebase.api_key, "fb-key");
        assert_eq!(settings.firebase.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_unknown_file_keys_rejected() {
        assert!(toml::from_str::<FileConfig>("colour = \"red\"").is_err());
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resizep.toml");
        std::fs::write(&path, "data_dir = \"/x\"\n").unwrap();

        let settings = load(cli(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(settings.data_dir, Some(PathBuf::from("/x")));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        assert!(load(cli(&["--config", "/no/such/resizep.toml"])).is_err());
    }
}
