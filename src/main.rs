use clap::Parser;
use relinfo::core::ConfigProvider;
use relinfo::utils::{error::EtlError, logger, validation::Validate};
use relinfo::{CliConfig, EtlEngine, LocalStorage, ReleaseInfoPipeline, TomlConfig};

fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting relinfo");
    tracing::debug!("CLI config: {:?}", cli);

    let outcome = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(apply_cli_overrides(config, &cli)),
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    Err(e)
                }
            }
        }
        None => run(cli),
    };

    if let Err(e) = outcome {
        std::process::exit(e.exit_code());
    }
}

fn apply_cli_overrides(mut config: TomlConfig, cli: &CliConfig) -> TomlConfig {
    if let Some(workdir) = &cli.workdir {
        config.input.workdir = workdir.clone();
        tracing::info!("🔧 Working directory overridden to: {}", workdir);
    }
    if let Some(input) = &cli.input {
        config.input.file = input.clone();
        tracing::info!("🔧 Input file overridden to: {}", input);
    }
    if cli.package_changes {
        config.output.package_changes = true;
    }
    config
}

fn run<C: ConfigProvider + Validate>(config: C) -> Result<String, EtlError> {
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return Err(e);
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ReleaseInfoPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run() {
        Ok(output_path) => {
            println!("📁 Output saved to: {}", output_path);
            Ok(output_path)
        }
        Err(e) => {
            tracing::error!(
                "❌ Release info extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            Err(e)
        }
    }
}
