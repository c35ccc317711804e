//! Conversion Pipeline

use crate::artifacts::write_json_atomic;
use crate::config::ConvertConfig;
use crate::convert::{find_latest_checkpoint, ModelConverter};
use crate::sample::extract_sample;
use crate::ExportError;
use dataset::load_records;
use feature_engine::{engineer, label, EngineeredRecord};
use scaler::{fit_scalers, ScalerInfo};
use std::fmt;
use tracing::{info, warn};

/// Pipeline stage, for error attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ModelExport,
    ScalerExport,
    SampleExport,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ModelExport => "model_export",
            Stage::ScalerExport => "scaler_export",
            Stage::SampleExport => "sample_export",
        };
        write!(f, "{name}")
    }
}

/// One recorded stage failure
#[derive(Debug, Clone)]
pub struct StageError {
    pub stage: Stage,
    pub message: String,
}

/// Per-stage outcome of a conversion run. Always fully populated: a failed
/// stage is recorded here, not raised.
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub model_exported: bool,
    pub scalers_exported: bool,
    pub sample_exported: bool,
    pub errors: Vec<StageError>,
}

impl ConversionReport {
    /// True when every stage exported its artifact
    pub fn success(&self) -> bool {
        self.model_exported && self.scalers_exported && self.sample_exported
    }

    fn record(&mut self, stage: Stage, message: impl Into<String>) {
        let message = message.into();
        warn!("[{}] {}", stage, message);
        self.errors.push(StageError { stage, message });
    }
}

/// Sequences the conversion: model export (with fallback ladder), then
/// scaling parameters and demo sample. The dataset is loaded once and the
/// engineered rows are shared by the scaler and sample stages, so both see
/// the identical feature derivation.
pub struct Pipeline {
    config: ConvertConfig,
    converter: ModelConverter,
}

impl Pipeline {
    pub fn new(config: ConvertConfig) -> Self {
        Self::with_converter(config, ModelConverter::default())
    }

    /// Inject a converter ladder (tests use stub strategies)
    pub fn with_converter(config: ConvertConfig, converter: ModelConverter) -> Self {
        Self { config, converter }
    }

    /// Run the full conversion.
    ///
    /// A missing or entirely unparsable dataset is the only hard stop.
    /// Everything else lands in the report: a missing trained checkpoint
    /// marks the model stage failed and skips the downstream stages, since
    /// scaler and sample artifacts are useless without a servable model.
    pub fn run(&self) -> Result<ConversionReport, ExportError> {
        let records = load_records(&self.config.dataset_path)?;
        let mut report = ConversionReport::default();

        match find_latest_checkpoint(&self.config.checkpoint_dir) {
            Err(e) => report.record(Stage::ModelExport, e.to_string()),
            Ok(checkpoint) => {
                info!("Found checkpoint {}", checkpoint.display());
                let outcome = self.converter.convert(&checkpoint, &self.config.model_dir);
                for (strategy, message) in outcome.failures {
                    report.record(Stage::ModelExport, format!("{strategy}: {message}"));
                }
                report.model_exported = outcome.succeeded.is_some();
            }
        }

        if !report.model_exported {
            warn!("Model export failed; skipping scaler and sample export");
            return Ok(report);
        }

        let engineered = engineer(&records, self.config.window);

        match self.export_scalers(&engineered) {
            Ok(()) => report.scalers_exported = true,
            Err(e) => report.record(Stage::ScalerExport, e.to_string()),
        }

        match self.export_sample(&engineered) {
            Ok(()) => report.sample_exported = true,
            Err(e) => report.record(Stage::SampleExport, e.to_string()),
        }

        Ok(report)
    }

    /// Fit both scalers on the entire labeled dataset and write the
    /// parameter artifact.
    fn export_scalers(&self, engineered: &[EngineeredRecord]) -> Result<(), ExportError> {
        let labeled = label(engineered, self.config.horizon);
        let features: Vec<_> = labeled.iter().map(|l| l.record.features()).collect();
        let prices: Vec<f64> = labeled.iter().map(|l| l.future_price).collect();

        let (feature_scaler, price_scaler) = fit_scalers(&features, &prices)?;
        info!(
            "Fitted scalers on {} rows; price range {:.2} - {:.2}",
            labeled.len(),
            price_scaler.data_min[0],
            price_scaler.data_max[0]
        );

        let info = ScalerInfo::new(
            &feature_scaler,
            &price_scaler,
            self.config.window,
            self.config.horizon,
        );
        write_json_atomic(&self.config.scaler_path, &info)
    }

    /// Write the tail sample of engineered rows for the demo client.
    fn export_sample(&self, engineered: &[EngineeredRecord]) -> Result<(), ExportError> {
        let sample = extract_sample(engineered, self.config.sample_size);
        write_json_atomic(&self.config.sample_path, &sample)?;
        info!("Exported {} sample rows", sample.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertStrategy;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    struct StubOk;

    impl ConvertStrategy for StubOk {
        fn name(&self) -> &'static str {
            "stub-ok"
        }
        fn convert(&self, _checkpoint: &Path, dest: &Path) -> Result<(), ExportError> {
            fs::write(dest.join("model.json"), "{}")?;
            Ok(())
        }
    }

    struct StubFail;

    impl ConvertStrategy for StubFail {
        fn name(&self) -> &'static str {
            "stub-fail"
        }
        fn convert(&self, _checkpoint: &Path, _dest: &Path) -> Result<(), ExportError> {
            Err(ExportError::Converter("no converter on host".to_string()))
        }
    }

    /// Scratch layout with a 30-row dataset and one checkpoint
    fn fixture(rows: usize, with_checkpoint: bool) -> (TempDir, ConvertConfig) {
        let dir = tempdir().unwrap();

        let mut csv = String::new();
        for i in 0..rows {
            let close = 16800.0 + i as f64;
            csv.push_str(&format!(
                "02/01/2024;{:02}:{:02}:00;{};{};{};{};{}\n",
                9 + (30 + i) / 60,
                (30 + i) % 60,
                close - 0.25,
                close + 0.5,
                close - 0.5,
                close,
                200 + i
            ));
        }
        let dataset_path = dir.path().join("nq-1m.csv");
        fs::write(&dataset_path, csv).unwrap();

        let checkpoint_dir = dir.path().join("model_checkpoints");
        if with_checkpoint {
            fs::create_dir_all(&checkpoint_dir).unwrap();
            fs::write(checkpoint_dir.join("model_20240101.h5"), b"weights").unwrap();
        }

        let config = ConvertConfig {
            dataset_path,
            checkpoint_dir,
            model_dir: dir.path().join("tfjs_model/model"),
            scaler_path: dir.path().join("tfjs_model/scaler_info.json"),
            sample_path: dir.path().join("web_app/sample_data.json"),
            window: 20,
            horizon: 5,
            sample_size: 50,
        };
        (dir, config)
    }

    fn stub_pipeline(config: ConvertConfig) -> Pipeline {
        Pipeline::with_converter(config, ModelConverter::new(vec![Box::new(StubOk)]))
    }

    #[test]
    fn test_full_run_succeeds() {
        let (_dir, config) = fixture(30, true);
        let report = stub_pipeline(config.clone()).run().unwrap();

        assert!(report.success());
        assert!(report.errors.is_empty());
        assert!(config.model_dir.join("model.json").exists());
        assert!(config.scaler_path.exists());
        assert!(config.sample_path.exists());
    }

    #[test]
    fn test_scaler_artifact_matches_engineered_data() {
        let (_dir, config) = fixture(30, true);
        stub_pipeline(config.clone()).run().unwrap();

        let info: ScalerInfo =
            serde_json::from_str(&fs::read_to_string(&config.scaler_path).unwrap()).unwrap();

        // Recompute what the pipeline must have fit on: 30 - 19 - 5 = 6 rows.
        let records = load_records(&config.dataset_path).unwrap();
        let labeled = feature_engine::engineer_labeled(&records, 20, 5);
        assert_eq!(labeled.len(), 6);

        for dim in 0..feature_engine::FEATURE_DIMENSION {
            let column: Vec<f64> = labeled.iter().map(|l| l.record.features()[dim]).collect();
            let min = column.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = column.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert_eq!(info.feature_scaler.data_min_[dim], min);
            assert_eq!(info.feature_scaler.data_max_[dim], max);
        }

        let prices: Vec<f64> = labeled.iter().map(|l| l.future_price).collect();
        let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(info.price_scaler.data_min_[0], min);

        assert_eq!(info.sequence_length, 20);
        assert_eq!(info.prediction_steps, 5);
    }

    #[test]
    fn test_sample_artifact_rows_and_timestamps() {
        let (_dir, config) = fixture(30, true);
        stub_pipeline(config.clone()).run().unwrap();

        let sample: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&config.sample_path).unwrap()).unwrap();

        // 30 cleaned rows -> 11 engineered rows, all under the 50-row cap
        assert_eq!(sample.len(), 11);
        let first_ts = sample[0]["timestamp"].as_str().unwrap();
        assert_eq!(first_ts, "2024-01-02T09:49:00");
        assert!(sample[0]["close_ma"].is_number());
    }

    #[test]
    fn test_missing_checkpoint_reported_not_fatal() {
        let (_dir, config) = fixture(30, false);
        let report = stub_pipeline(config.clone()).run().unwrap();

        assert!(!report.model_exported);
        assert!(!report.scalers_exported);
        assert!(!report.sample_exported);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].stage, Stage::ModelExport);
        assert!(report.errors[0].message.contains("not found"));
        assert!(!config.scaler_path.exists());
    }

    #[test]
    fn test_missing_dataset_is_hard_stop() {
        let (_dir, mut config) = fixture(30, true);
        config.dataset_path = config.dataset_path.with_file_name("absent.csv");

        let err = stub_pipeline(config).run().unwrap_err();
        assert!(matches!(
            err,
            ExportError::Dataset(dataset::DatasetError::SourceMissing(_))
        ));
    }

    #[test]
    fn test_all_strategies_failing_marks_stage() {
        let (_dir, config) = fixture(30, true);
        let pipeline = Pipeline::with_converter(
            config.clone(),
            ModelConverter::new(vec![Box::new(StubFail), Box::new(StubFail)]),
        );
        let report = pipeline.run().unwrap();

        assert!(!report.model_exported);
        assert_eq!(report.errors.len(), 2);
        assert!(report
            .errors
            .iter()
            .all(|e| e.stage == Stage::ModelExport));
        // Downstream stages short-circuit
        assert!(!config.scaler_path.exists());
        assert!(!config.sample_path.exists());
    }

    #[test]
    fn test_fallback_success_still_reports_failed_attempts() {
        let (_dir, config) = fixture(30, true);
        let pipeline = Pipeline::with_converter(
            config,
            ModelConverter::new(vec![Box::new(StubFail), Box::new(StubOk)]),
        );
        let report = pipeline.run().unwrap();

        assert!(report.success());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].stage, Stage::ModelExport);
    }

    #[test]
    fn test_short_dataset_fails_scaler_stage_only() {
        // 24 rows engineer to 5 rows but label to 0: nothing to fit.
        let (_dir, config) = fixture(24, true);
        let report = stub_pipeline(config.clone()).run().unwrap();

        assert!(report.model_exported);
        assert!(!report.scalers_exported);
        assert!(report.sample_exported);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].stage, Stage::ScalerExport);

        // Sample still holds the engineered rows that do exist
        let sample: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&config.sample_path).unwrap()).unwrap();
        assert_eq!(sample.len(), 5);
    }

    #[test]
    fn test_rerun_overwrites_artifacts() {
        let (_dir, config) = fixture(30, true);
        let pipeline = stub_pipeline(config.clone());

        pipeline.run().unwrap();
        let first = fs::read_to_string(&config.scaler_path).unwrap();
        pipeline.run().unwrap();
        let second = fs::read_to_string(&config.scaler_path).unwrap();

        assert_eq!(first, second);
    }
}
