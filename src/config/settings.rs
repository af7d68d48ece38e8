use crate::config::{CliConfig, TomlConfig};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_file_extension, validate_non_empty_string, validate_path, validate_range, Validate,
};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_PATH: &str = "model/car_price_model.json";

/// 合併預設值、TOML 檔案與 CLI/環境變數後的最終設定
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub model_path: String,
    pub log_format: LogFormat,
    pub log_level: Option<String>,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_path: DEFAULT_MODEL_PATH.to_string(),
            log_format: LogFormat::default(),
            log_level: None,
            verbose: false,
        }
    }
}

impl Settings {
    /// CLI 旗標與環境變數優先於 TOML 檔案
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        Ok(Self::merge(cli, &file))
    }

    pub fn merge(cli: &CliConfig, file: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            host: cli
                .host
                .clone()
                .or_else(|| file.host().map(str::to_string))
                .unwrap_or(defaults.host),
            port: cli.port.or(file.port()).unwrap_or(defaults.port),
            model_path: cli
                .model_path
                .clone()
                .or_else(|| file.model_path().map(str::to_string))
                .unwrap_or(defaults.model_path),
            log_format: cli
                .log_format
                .or(file.log_format())
                .unwrap_or(defaults.log_format),
            log_level: file.log_level().map(str::to_string),
            verbose: cli.verbose,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_range("server.port", self.port, 1, u16::MAX)?;
        validate_path("model.path", &self.model_path)?;
        validate_file_extension("model.path", &self.model_path, &["json"])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> CliConfig {
        let mut argv = vec!["car-price-api"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = TomlConfig::from_toml_str(
            "[server]\nhost = \"127.0.0.1\"\nport = 8080\n[model]\npath = \"file.json\"\n",
        )
        .unwrap();
        let cli = CliConfig {
            port: Some(9090),
            host: None,
            model_path: None,
            ..cli(&[])
        };

        let settings = Settings::merge(&cli, &file);
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.model_path, "file.json");
    }

    #[test]
    fn test_defaults_when_nothing_given() {
        let cli = CliConfig {
            host: None,
            port: None,
            model_path: None,
            log_format: None,
            ..cli(&[])
        };
        let settings = Settings::merge(&cli, &TomlConfig::default());
        assert_eq!(settings, Settings::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_port_zero_and_non_json_model() {
        let mut settings = Settings::default();
        settings.port = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.model_path = "model/car_price_model.pkl".to_string();
        assert!(settings.validate().is_err());
    }
}
