use crate::error::ConfigError;
use crate::llm::{DEFAULT_SYSTEM_PROMPT, LlmSettings};
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Environment variables holding the Gemini API key, in lookup order.
pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Config file picked up from the working directory when none is given.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Gemini model name
    #[arg(long, env = "LLM_MODEL")]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
    /// Replaces the built-in persona when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl LlmConfig {
    /// System instruction sent with every prompt.
    #[must_use]
    pub fn system_instruction(&self) -> &str {
        self.system_prompt
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Layering: defaults < config file < `AIPLONEX_*` env < CLI flags.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;

        let mut builder = Config::builder()
            .set_default("server.port", 5000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("llm.base_url", "https://generativelanguage.googleapis.com")?
            .set_default("llm.model", "models/gemini-1.5-flash")?
            .set_default("llm.temperature", 0.7)?;

        // Explicit file must exist; the cwd fallback is optional.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path).required(true));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::with_name(CWD_CONFIG_FILE).required(false));
        }

        // E.g. AIPLONEX_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("AIPLONEX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(model) = cli.model {
            builder = builder.set_override("llm.model", model)?;
        }

        let cfg = builder.build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// `host:port` string to bind.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Resolve driver settings, reading the API key from the environment.
pub fn load_llm_settings(llm: &LlmConfig) -> Result<LlmSettings, ConfigError> {
    let api_key = API_KEY_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .ok_or(ConfigError::MissingEnv(API_KEY_VARS[0]))?;
    if api_key.trim().is_empty() {
        return Err(ConfigError::Empty(API_KEY_VARS[0]));
    }

    if llm.model.trim().is_empty() {
        return Err(ConfigError::Empty("llm.model"));
    }
    if llm.base_url.trim().is_empty() {
        return Err(ConfigError::Empty("llm.base_url"));
    }

    Ok(LlmSettings {
        base_url: llm.base_url.clone(),
        api_key: api_key.trim().to_string(),
        model: llm.model.clone(),
        temperature: llm.temperature,
        max_output_tokens: llm.max_output_tokens,
    })
}
