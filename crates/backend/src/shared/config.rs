use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub uploads: UploadsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Каталог со сборкой фронтенда (trunk dist)
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    /// Пустой ключ: берётся из переменной окружения OPENAI_API_KEY
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i32,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl LlmConfig {
    pub const API_KEY_ENV: &'static str = "OPENAI_API_KEY";

    /// Ключ из конфига, иначе из окружения. `None` если не задан нигде.
    pub fn resolved_api_key(&self) -> Option<String> {
        let key = self.api_key.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }
        std::env::var(Self::API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            max_files: default_max_files(),
        }
    }
}

impl UploadsConfig {
    /// Лимит тела multipart-запроса: все файлы плюс запас на текст и заголовки
    pub fn body_limit(&self) -> usize {
        let files = self.max_file_bytes.saturating_mul(self.max_files as u64);
        usize::try_from(files)
            .unwrap_or(usize::MAX)
            .saturating_add(1024 * 1024)
    }
}

fn default_port() -> u16 {
    3000
}
fn default_static_dir() -> String {
    "dist".into()
}
fn default_db_path() -> String {
    "target/db/app.db".into()
}
fn default_api_endpoint() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> i32 {
    1024
}
fn default_system_prompt() -> String {
    "You are Kosh Agent, a reviewer who gives clear, constructive feedback on the \
     user's reports and documents. Be specific and suggest concrete next steps."
        .into()
}
fn default_max_file_bytes() -> u64 {
    10 * 1024 * 1024
}
fn default_max_files() -> usize {
    10
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000
static_dir = "dist"

[database]
path = "target/db/app.db"

[llm]
api_endpoint = "https://api.openai.com/v1"
model = "gpt-4o-mini"
temperature = 0.7
max_tokens = 1024

[uploads]
max_file_bytes = 10485760
max_files = 10
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert!(!config.llm.system_prompt.is_empty());
        assert_eq!(config.uploads.max_files, 10);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [llm]
            model = "gpt-4.1"
            api_key = "sk-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "gpt-4.1");
        assert_eq!(config.llm.resolved_api_key().as_deref(), Some("sk-test"));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.uploads.max_file_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_body_limit_covers_all_files() {
        let uploads = UploadsConfig {
            max_file_bytes: 1000,
            max_files: 3,
        };
        assert_eq!(uploads.body_limit(), 3000 + 1024 * 1024);
    }
}
