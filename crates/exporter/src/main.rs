//! Model Conversion Entry Point

use exporter::{init_logging, ConvertConfig, Pipeline};
use tracing::{error, info};

fn main() {
    init_logging();

    info!("=== Model Export Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let config = ConvertConfig::default();
    match Pipeline::new(config).run() {
        Ok(report) => {
            info!(
                "Conversion finished: model={} scalers={} sample={}",
                report.model_exported, report.scalers_exported, report.sample_exported
            );
            for e in &report.errors {
                error!("[{}] {}", e.stage, e.message);
            }
            if !report.success() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("Conversion aborted: {}", e);
            std::process::exit(1);
        }
    }
}
