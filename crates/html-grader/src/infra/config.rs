//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::report::ReportFormat;
use crate::infra::http::FetchSettings;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".html-grader/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub fetch: Fetch,
    #[serde(default)]
    pub report: Report,
}

/// Default input locations used when the command line names none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Defaults {
    #[serde(default)]
    checks: Option<PathBuf>,
    #[serde(default)]
    file: Option<PathBuf>,
}

impl Defaults {
    fn default_checks() -> PathBuf {
        PathBuf::from("checks.json")
    }

    fn default_file() -> PathBuf {
        PathBuf::from("index.html")
    }

    pub fn checks(&self) -> PathBuf {
        self.checks.clone().unwrap_or_else(Self::default_checks)
    }

    pub fn file(&self) -> PathBuf {
        self.file.clone().unwrap_or_else(Self::default_file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Fetch {
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    user_agent: Option<String>,
}

impl Fetch {
    fn default_timeout_secs() -> u64 {
        30
    }

    fn default_user_agent() -> String {
        concat!("html-grader/", env!("CARGO_PKG_VERSION")).to_owned()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or_else(Self::default_timeout_secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    pub fn settings(&self) -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_secs(self.timeout_secs()),
            user_agent: self.user_agent(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Report {
    #[serde(default)]
    format: Option<ReportFormat>,
}

impl Report {
    pub fn format(&self) -> ReportFormat {
        self.format.unwrap_or_default()
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    checks: Option<String>,
    file: Option<String>,
    timeout_secs: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            checks: env::var("HTML_GRADER_CHECKS").ok(),
            file: env::var("HTML_GRADER_FILE").ok(),
            timeout_secs: env::var("HTML_GRADER_TIMEOUT_SECS").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(checks: &str, timeout_secs: &str) -> Self {
        Self {
            checks: Some(checks.to_owned()),
            file: None,
            timeout_secs: Some(timeout_secs.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        let config = apply_env_overrides(merged, env_overrides)?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: Defaults {
                checks: other.defaults.checks.or(self.defaults.checks),
                file: other.defaults.file.or(self.defaults.file),
            },
            fetch: Fetch {
                timeout_secs: other.fetch.timeout_secs.or(self.fetch.timeout_secs),
                user_agent: other.fetch.user_agent.or(self.fetch.user_agent),
            },
            report: Report {
                format: other.report.format.or(self.report.format),
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.fetch.timeout_secs() == 0 {
            bail!("fetch.timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("html-grader/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(checks) = env.checks {
        config.defaults.checks = Some(PathBuf::from(checks));
    }
    if let Some(file) = env.file {
        config.defaults.file = Some(PathBuf::from(file));
    }
    if let Some(raw) = env.timeout_secs {
        let secs = raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("HTML_GRADER_TIMEOUT_SECS must be whole seconds, got '{raw}'"))?;
        config.fetch.timeout_secs = Some(secs);
    }
    Ok(config)
}
