use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Application-level constants
pub const APP_NAME: &str = "medreport";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "medgemma";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 300;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "medreport=debug,medreport_lib=debug,tower_http=info"
    } else {
        "medreport=info,medreport_lib=info,tower_http=warn"
    }
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub ollama_url: String,
    pub llm_model: String,
    pub vision_model: String,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_MODEL.to_string(),
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep the default; values that
    /// fail to parse keep the default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Self {
            bind_addr: parsed(&lookup, "MEDREPORT_BIND_ADDR", defaults.bind_addr),
            port: parsed(&lookup, "PORT", defaults.port),
            ollama_url: text("MEDREPORT_OLLAMA_URL", defaults.ollama_url),
            llm_model: text("MEDREPORT_LLM_MODEL", defaults.llm_model),
            vision_model: text("MEDREPORT_VISION_MODEL", defaults.vision_model),
            llm_timeout_secs: parsed(&lookup, "MEDREPORT_LLM_TIMEOUT_SECS", defaults.llm_timeout_secs),
            max_upload_bytes: parsed(&lookup, "MEDREPORT_MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// One model serving both OCR and text stages must stay resident.
    pub fn unload_vision_after_ocr(&self) -> bool {
        self.vision_model != self.llm_model
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, default = %default, "Invalid config value, using default");
            default
        }),
    }
}
