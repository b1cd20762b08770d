use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use design_matrix::config::{Config, DEFAULT_CONFIG_PATH};
use design_matrix::pipeline::DesignMatrixBuilder;
use design_matrix::source::SqlitePriceStore;

fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match Config::load_from_path(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Usage: design-matrix [path/to/config.toml]");
            std::process::exit(1);
        }
    };

    // Logs go to stderr so the JSON matrix can be piped from stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        config = %config_path.display(),
        db = %config.data.db_path.display(),
        "Starting design-matrix"
    );

    let store = SqlitePriceStore::open(&config.data.db_path)?;
    let builder = DesignMatrixBuilder::new(config.matrix.clone())?;
    let matrix = builder.build(&store).context("failed to build design matrix")?;

    match &config.data.output_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            matrix.write_json(&mut writer)?;
            writer.flush()?;
            tracing::info!(output = %path.display(), rows = matrix.len(), "Wrote design matrix");
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            matrix.write_json(&mut writer)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}
