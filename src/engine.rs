//! Batch recap engine: rate loading, per-file enrichment and batch assembly

use crate::aggregate::RecapSummary;
use crate::calendar::MonthKey;
use crate::data::fx::{load_jisdor, JisdorFormat, RateTable};
use crate::data::trades::{read_trade_file, TradeRecord};
use crate::enrich::{enrich_trade, EnrichedTrade};
use crate::error::{RecapError, Result};
use crate::finance::SpotWindowMargin;
use crate::types::{Cash, DEFAULT_RATE_REMOTE, DEFAULT_RATE_SPOT};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Configuration for the recap engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Margin rate per lot per side inside the spot window
    pub rate_spot: Cash,
    /// Margin rate per lot per side outside the spot window
    pub rate_remote: Cash,
    /// Layout of the JISDOR reference file
    pub jisdor: JisdorFormat,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_spot: DEFAULT_RATE_SPOT,
            rate_remote: DEFAULT_RATE_REMOTE,
            jisdor: JisdorFormat::default(),
        }
    }
}

impl EngineConfig {
    /// Margin model described by this configuration
    pub fn margin_model(&self) -> Result<SpotWindowMargin> {
        SpotWindowMargin::new(self.rate_spot, self.rate_remote)
    }
}

/// Enriched trades of one input file
#[derive(Debug, Clone)]
pub struct FileBatch {
    pub source: PathBuf,
    /// Month of the file's earliest trade; `None` for an empty file
    pub month: Option<MonthKey>,
    /// Sorted by trade date
    pub trades: Vec<EnrichedTrade>,
}

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub trades: usize,
    pub month: Option<MonthKey>,
    /// Set when the file was skipped because it could not be read
    pub error: Option<String>,
}

impl FileReport {
    pub fn is_skipped(&self) -> bool {
        self.error.is_some() || self.trades == 0
    }
}

/// Detail table of one trade month
#[derive(Debug, Clone)]
pub struct MonthlySheet {
    pub month: MonthKey,
    pub trades: Vec<EnrichedTrade>,
}

impl MonthlySheet {
    /// Sheet name such as `JAN25`
    pub fn name(&self) -> String {
        self.month.sheet_name()
    }
}

/// Result of a batch run
#[derive(Debug, Clone)]
pub struct RecapRun {
    /// Every enriched trade, files concatenated in input order
    pub trades: Vec<EnrichedTrade>,
    /// One detail table per month label, chronological
    pub monthly: Vec<MonthlySheet>,
    pub files: Vec<FileReport>,
}

impl RecapRun {
    pub fn summary(&self) -> RecapSummary {
        RecapSummary::build(&self.trades)
    }

    pub fn files_skipped(&self) -> usize {
        self.files.iter().filter(|f| f.is_skipped()).count()
    }
}

/// Trade recap engine
pub struct RecapEngine {
    /// Engine configuration
    config: EngineConfig,
    /// JISDOR reference rates
    rates: RateTable,
    /// Margin model built from the configured rates
    margin: SpotWindowMargin,
}

impl RecapEngine {
    /// Create a new engine over an already-built rate table
    pub fn new(config: EngineConfig, rates: RateTable) -> Result<Self> {
        let margin = config.margin_model()?;
        Ok(Self {
            config,
            rates,
            margin,
        })
    }

    /// Create an engine, loading rates from a JISDOR file
    pub fn from_rate_file(config: EngineConfig, rate_path: &Path) -> Result<Self> {
        if !rate_path.exists() {
            return Err(RecapError::FileNotFound(rate_path.to_path_buf()));
        }
        let rates = load_jisdor(rate_path, &config.jisdor)?;
        Self::new(config, rates)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Enrich a single trade
    pub fn enrich(&self, record: TradeRecord) -> EnrichedTrade {
        enrich_trade(record, &self.rates, &self.margin)
    }

    /// Enrich a batch of trades, ordered by trade date (ties keep input order)
    pub fn enrich_batch(&self, mut records: Vec<TradeRecord>) -> Vec<EnrichedTrade> {
        records.sort_by_key(|r| r.trade_date);
        records.into_iter().map(|r| self.enrich(r)).collect()
    }

    /// Read and enrich one trade history file
    pub fn process_file(&self, path: &Path) -> Result<FileBatch> {
        let records = read_trade_file(path)?;
        let trades = self.enrich_batch(records);
        let month = trades.first().map(EnrichedTrade::month_key);

        log::debug!(
            "{}: {} trades, sheet {}",
            path.display(),
            trades.len(),
            month.map_or_else(|| "-".to_string(), |m| m.sheet_name())
        );

        Ok(FileBatch {
            source: path.to_path_buf(),
            month,
            trades,
        })
    }

    /// Process a batch of trade files.
    ///
    /// Every path must exist. Files are read and enriched in parallel;
    /// a file that fails to parse is logged and skipped. `on_file` is called
    /// once per file as it completes. Fails with `NoData` when no file yields
    /// a trade.
    pub fn run<F>(&self, paths: &[PathBuf], on_file: F) -> Result<RecapRun>
    where
        F: Fn(&FileReport) + Sync,
    {
        if let Some(missing) = paths.iter().find(|p| !p.exists()) {
            return Err(RecapError::FileNotFound(missing.clone()));
        }

        log::info!("Processing {} trade file(s)", paths.len());

        let outcomes: Vec<(FileReport, Option<FileBatch>)> = paths
            .par_iter()
            .map(|path| {
                let outcome = match self.process_file(path) {
                    Ok(batch) => (
                        FileReport {
                            path: path.clone(),
                            trades: batch.trades.len(),
                            month: batch.month,
                            error: None,
                        },
                        Some(batch),
                    ),
                    Err(e) => (
                        FileReport {
                            path: path.clone(),
                            trades: 0,
                            month: None,
                            error: Some(e.to_string()),
                        },
                        None,
                    ),
                };
                on_file(&outcome.0);
                outcome
            })
            .collect();

        let mut trades = Vec::new();
        let mut by_month: BTreeMap<MonthKey, Vec<EnrichedTrade>> = BTreeMap::new();
        let mut files = Vec::with_capacity(outcomes.len());

        for (report, batch) in outcomes {
            match (&report.error, batch) {
                (Some(error), _) => {
                    log::warn!("Skipping {}: {}", report.path.display(), error);
                }
                (None, Some(FileBatch { month: Some(month), trades: batch_trades, .. })) => {
                    by_month
                        .entry(month)
                        .or_default()
                        .extend(batch_trades.iter().cloned());
                    trades.extend(batch_trades);
                }
                (None, _) => {
                    log::warn!("No valid data in {}", report.path.display());
                }
            }
            files.push(report);
        }

        if trades.is_empty() {
            return Err(RecapError::NoData);
        }

        let monthly: Vec<MonthlySheet> = by_month
            .into_iter()
            .map(|(month, trades)| MonthlySheet { month, trades })
            .collect();

        log::info!(
            "Combined {} trades from {} file(s) into {} monthly sheet(s)",
            trades.len(),
            files.len() - files.iter().filter(|f| f.is_skipped()).count(),
            monthly.len()
        );

        Ok(RecapRun {
            trades,
            monthly,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine() -> RecapEngine {
        let rates = RateTable::build(vec![(date(2024, 12, 2), Some(15_750.0))]);
        RecapEngine::new(EngineConfig::default(), rates).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.rate_spot, 5_000_000.0);
        assert_eq!(config.rate_remote, 3_500_000.0);
        assert_eq!(config.jisdor.header_row, 4);
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let config = EngineConfig {
            rate_spot: -5.0,
            ..EngineConfig::default()
        };
        let result = RecapEngine::new(config, RateTable::default());
        assert!(matches!(result, Err(RecapError::ConfigError(_))));
    }

    #[test]
    fn test_enrich_batch_sorts_by_trade_date() {
        let records = vec![
            TradeRecord::new(date(2025, 1, 9), "CPOID-FEB25", Some(4000.0), Some(1.0), "IDR"),
            TradeRecord::new(date(2025, 1, 2), "CPOID-FEB25", Some(4000.0), Some(2.0), "IDR"),
        ];
        let trades = engine().enrich_batch(records);
        assert_eq!(trades[0].trade_date(), date(2025, 1, 2));
        assert_eq!(trades[1].trade_date(), date(2025, 1, 9));
    }

    #[test]
    fn test_run_without_files_is_no_data() {
        let result = engine().run(&[], |_| {});
        assert!(matches!(result, Err(RecapError::NoData)));
    }

    #[test]
    fn test_run_missing_file_is_fatal() {
        let paths = vec![PathBuf::from("/definitely/not/here.xlsx")];
        let result = engine().run(&paths, |_| {});
        assert!(matches!(result, Err(RecapError::FileNotFound(_))));
    }
}
