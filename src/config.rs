use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub seed_demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            template_dir: PathBuf::from("resources/templates"),
            static_dir: PathBuf::from("resources/static"),
            seed_demo: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("APP_PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid APP_PORT {:?}", v))?,
            None => defaults.port,
        };

        let seed_demo = match lookup("SEED_DEMO") {
            Some(v) => parse_flag(&v).with_context(|| format!("invalid SEED_DEMO {:?}", v))?,
            None => defaults.seed_demo,
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port,
            template_dir: lookup("TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            seed_demo,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(v: &str) -> anyhow::Result<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => anyhow::bail!("expected true/false, got {other}"),
    }
}
