use anyhow::Context;
use car_price_api::utils::{logger, validation::Validate};
use car_price_api::{server, AppState, CliConfig, Command, InputRecord, ModelBundle, Settings};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match Settings::resolve(&cli).and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    logger::init_logger(settings.log_format, settings.verbose, settings.log_level.as_deref());
    tracing::debug!("Resolved settings: {:?}", settings);

    // 模型載入失敗時直接結束，不開始服務
    let bundle = match ModelBundle::from_file(&settings.model_path) {
        Ok(bundle) => {
            tracing::info!(
                "✅ Model loaded successfully from {} ({} features, {} categorical)",
                settings.model_path,
                bundle.feature_columns().len(),
                bundle.categorical_columns().count()
            );
            bundle
        }
        Err(e) => {
            tracing::error!("❌ Failed to load model from {}: {}", settings.model_path, e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let addr = format!("{}:{}", settings.host, settings.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {}", addr))?;
            server::serve(listener, AppState::new(bundle)).await?;
        }
        Command::Predict { input } => {
            let raw = match input.strip_prefix('@') {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read input file {}", path))?,
                None => input,
            };
            let value: serde_json::Value =
                serde_json::from_str(&raw).context("input is not valid JSON")?;
            let record = InputRecord::try_from(value)?;

            match bundle.predict_price(&record) {
                Ok(price) => println!("{}", price),
                Err(e) => {
                    tracing::error!("❌ Prediction failed: {}", e);
                    eprintln!("❌ {}", e);
                    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                    std::process::exit(e.exit_code());
                }
            }
        }
    }

    Ok(())
}
