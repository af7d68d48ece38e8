use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// 產生日誌過濾器；RUST_LOG 優先
pub fn build_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = match (verbose, level) {
            (true, _) => "car_price_api=debug,info".to_string(),
            (false, Some(level)) => format!("car_price_api={}", level),
            (false, None) => "car_price_api=info".to_string(),
        };
        EnvFilter::new(directive)
    })
}

pub fn init_logger(format: LogFormat, verbose: bool, level: Option<&str>) {
    let filter = build_filter(verbose, level);

    match format {
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .json(), // 容器環境交給日誌收集器解析
                )
                .init();
        }
    }
}
