use crate::utils::error::{PriceError, Result};
use crate::utils::logger::LogFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerConfig>,
    pub model: Option<ModelConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PriceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PriceError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MODEL_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PriceError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn host(&self) -> Option<&str> {
        self.server.as_ref().and_then(|s| s.host.as_deref())
    }

    pub fn port(&self) -> Option<u16> {
        self.server.as_ref().and_then(|s| s.port)
    }

    pub fn model_path(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.path.as_str())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_format(&self) -> Option<LogFormat> {
        self.logging.as_ref().and_then(|l| l.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8080

[model]
path = "model/car_price_model.json"

[logging]
level = "debug"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.host(), Some("127.0.0.1"));
        assert_eq!(config.port(), Some(8080));
        assert_eq!(config.model_path(), Some("model/car_price_model.json"));
        assert_eq!(config.log_level(), Some("debug"));
        assert_eq!(config.log_format(), Some(LogFormat::Json));
    }

    #[test]
    fn test_sections_are_optional() {
        let config = TomlConfig::from_toml_str("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.port(), Some(9000));
        assert_eq!(config.host(), None);
        assert_eq!(config.model_path(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CAR_PRICE_TEST_MODEL_DIR", "/srv/models");

        let toml_content = r#"
[model]
path = "${CAR_PRICE_TEST_MODEL_DIR}/bundle.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.model_path(), Some("/srv/models/bundle.json"));

        std::env::remove_var("CAR_PRICE_TEST_MODEL_DIR");
    }

    #[test]
    fn test_unset_env_var_left_in_place() {
        let toml_content = r#"
[model]
path = "${CAR_PRICE_TEST_UNSET_VAR}/bundle.json"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.model_path(),
            Some("${CAR_PRICE_TEST_UNSET_VAR}/bundle.json")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, PriceError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[server]\nhost = \"0.0.0.0\"\nport = 5001\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.port(), Some(5001));
    }
}
