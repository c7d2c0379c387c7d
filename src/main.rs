// SPDX-License-Identifier: MIT
use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use codec_compare::{default_codecs, ArtifactStore, Config, Dataset, Harness, LogFormat, Schema};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_format().unwrap_or(LogFormat::Text));
    config.validate()?;
    info!("Configuration loaded and validated");

    let schema = Schema::load(&config.schema_path)
        .with_context(|| format!("loading schema {}", config.schema_path.display()))?;
    let codecs = default_codecs(&schema).context("binding the Protobuf codec to the schema")?;

    let store = ArtifactStore::new(&config.output_dir, config.artifact_stem.as_str());
    let harness = Harness::new(store, config.harness_options());

    let report = harness
        .run_comparison(&Dataset::sample(), &codecs)
        .map_err(|e| {
            error!("Comparison failed: {}", e);
            e
        })?;

    println!("=== Codec comparison: JSON, XML and Protobuf ===\n");
    print!("{report}");
    println!("\n=== Done ===");

    Ok(())
}
