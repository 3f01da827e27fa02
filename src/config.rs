use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::http::parser::ParserLimits;
use crate::routing::redirect::{MatchKind, RedirectKind};
use crate::routing::static_files::DEFAULT_INDEX;

/// Upper bound on configured static mounts.
pub const MAX_MOUNTS: usize = 8;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub limits: ParserLimits,
    pub api: ApiConfig,
    pub mounts: Vec<MountConfig>,
    pub redirects: RedirectsConfig,
}

/// Defaults to one `/public` mount served from `./public`.
impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            limits: ParserLimits::default(),
            api: ApiConfig::default(),
            mounts: vec![MountConfig {
                prefix: "/public".to_string(),
                root: PathBuf::from("./public"),
                index: default_index(),
                max_bytes: 0,
            }],
            redirects: RedirectsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub prefix: String,
    pub capacity: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            capacity: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MountConfig {
    pub prefix: String,
    pub root: PathBuf,
    #[serde(default = "default_index")]
    pub index: String,
    /// 0 means unlimited.
    #[serde(default)]
    pub max_bytes: u64,
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedirectsConfig {
    pub capacity: usize,
    pub rules: Vec<RedirectConfig>,
}

impl Default for RedirectsConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedirectConfig {
    pub from: String,
    pub to: String,
    #[serde(rename = "match")]
    pub match_kind: MatchKind,
    #[serde(default)]
    pub kind: RedirectKind,
    #[serde(default)]
    pub append_tail: bool,
}

impl Config {
    /// Loads from the process environment.
    ///
    /// `PORTHOLE_CONFIG` names a YAML file; without it defaults are used.
    /// `LISTEN` overrides the listen address either way.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_env(|key| std::env::var(key).ok())
    }

    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = match lookup("PORTHOLE_CONFIG") {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        if let Some(addr) = lookup("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("loading config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text).context("invalid YAML configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.mounts.len() > MAX_MOUNTS {
            bail!(
                "{} static mounts configured, at most {} allowed",
                self.mounts.len(),
                MAX_MOUNTS
            );
        }
        if self.limits.max_headers == 0 || self.limits.header_section == 0 {
            bail!("header limits must be non-zero");
        }
        Ok(())
    }
}
