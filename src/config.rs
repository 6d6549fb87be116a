use crate::error::CoachError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Clone)]
pub struct ModelConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub timeout: Option<Duration>,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CoachError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoachError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("GROQ_API_KEY")
            .ok_or_else(|| CoachError::Config("GROQ_API_KEY must be set".into()))?;

        let temperature = match get("GROQ_TEMPERATURE") {
            Some(raw) => parse::<f64>("GROQ_TEMPERATURE", &raw)?,
            None => DEFAULT_TEMPERATURE,
        };
        if !(0.0..=2.0).contains(&temperature) {
            return Err(CoachError::Config(format!(
                "GROQ_TEMPERATURE must be between 0.0 and 2.0, got {temperature}"
            )));
        }

        let timeout = get("GROQ_TIMEOUT_SECS")
            .map(|raw| parse::<u64>("GROQ_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        let host = parse::<IpAddr>(
            "CODECRAFT_HOST",
            &get("CODECRAFT_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
        )?;
        let port = match get("CODECRAFT_PORT") {
            Some(raw) => parse::<u16>("CODECRAFT_PORT", &raw)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            model: ModelConfig {
                api_key,
                model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
                base_url: get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
                temperature,
                timeout,
            },
            server: ServerConfig { host, port },
        })
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, CoachError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.parse()
        .map_err(|e| CoachError::Config(format!("{key}='{raw}' is invalid: {e}")))
}
