//! One import, from loaded CSV to stored trades.

use std::path::Path;
use std::time::Duration;

use tj_ingest::{CsvTable, collect_samples, distinct_values, read_csv_file, read_csv_str};
use tj_map::{MappingState, MatchOptions};
use tj_model::{ColumnSamples, ImportContext, ImportDefaults};
use tj_normalize::{NormalizationTable, Normalizers};
use tj_translate::{Enrichment, Translator, header_candidates, value_candidates};
use tracing::{debug, info};

use crate::derived::apply_derived;
use crate::error::{ImportError, Result};
use crate::parser::{ParseOutcome, RowParser};
use crate::readiness::{SubmissionBlock, check_ready};
use crate::submit::{ImportReport, ImportRequest, ImportResponse, TradeStore, reconcile};

/// State of one import.
///
/// Nothing is persisted until [`ImportSession::submit`]; dropping the session
/// abandons the import.
#[derive(Debug, Clone)]
pub struct ImportSession {
    table: CsvTable,
    samples: ColumnSamples,
    options: MatchOptions,
    mapping: MappingState,
    enrichment: Enrichment,
    defaults: ImportDefaults,
    context: ImportContext,
}

impl ImportSession {
    /// Loads CSV text and detects a first mapping.
    pub fn from_csv_str(text: &str, options: MatchOptions) -> Result<Self> {
        Ok(Self::from_table(read_csv_str(text)?, options))
    }

    pub fn from_path(path: &Path, options: MatchOptions) -> Result<Self> {
        Ok(Self::from_table(read_csv_file(path)?, options))
    }

    pub fn from_table(table: CsvTable, options: MatchOptions) -> Self {
        let samples = collect_samples(&table, options.sample_size);
        let mapping = MappingState::detect(&table.headers, &samples, &options);
        Self {
            table,
            samples,
            options,
            mapping,
            enrichment: Enrichment::default(),
            defaults: ImportDefaults::default(),
            context: ImportContext::default(),
        }
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: ImportDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: ImportContext) -> Self {
        self.context = context;
        self
    }

    pub fn table(&self) -> &CsvTable {
        &self.table
    }

    pub fn samples(&self) -> &ColumnSamples {
        &self.samples
    }

    pub fn mapping(&self) -> &MappingState {
        &self.mapping
    }

    /// Mutable mapping for manual edits.
    pub fn mapping_mut(&mut self) -> &mut MappingState {
        &mut self.mapping
    }

    pub fn enrichment(&self) -> &Enrichment {
        &self.enrichment
    }

    pub fn defaults(&self) -> &ImportDefaults {
        &self.defaults
    }

    pub fn context(&self) -> &ImportContext {
        &self.context
    }

    /// Applies translations to the current mapping and categorical values.
    ///
    /// Header glosses trigger a fresh detection; manual edits made so far
    /// are replayed on top. Columns that become categorical through a gloss
    /// get a follow-up value translation. Returns whether anything was
    /// accepted. Translator failures only leave the session as it was.
    pub async fn enrich(&mut self, translator: &dyn Translator, budget: Duration) -> bool {
        let headers = header_candidates(self.mapping.matches());
        let values = value_candidates(&self.normalization_table());
        let requested_values = values.clone();
        let enrichment = tj_translate::enrich(translator, headers, values, budget).await;
        if enrichment.is_empty() {
            return false;
        }
        self.absorb(enrichment);

        if !self.enrichment.header_glosses.is_empty() {
            self.remap();
            let mut followup = value_candidates(&self.normalization_table());
            for (field, values) in &mut followup {
                if let Some(asked) = requested_values.get(field) {
                    values.retain(|value| !asked.contains(value));
                }
            }
            followup.retain(|_, values| !values.is_empty());
            if !followup.is_empty() {
                debug!(fields = followup.len(), "translating values of newly mapped columns");
                let more = tj_translate::enrich(translator, Vec::new(), followup, budget).await;
                self.absorb(more);
            }
        }
        true
    }

    fn absorb(&mut self, enrichment: Enrichment) {
        self.enrichment
            .header_glosses
            .extend(enrichment.header_glosses);
        for (field, values) in enrichment.values {
            self.enrichment
                .values
                .entry(field)
                .or_default()
                .extend(values);
        }
    }

    fn remap(&mut self) {
        let edits = self.mapping.manual_edits();
        let mut mapping = MappingState::detect_with_glosses(
            &self.table.headers,
            &self.enrichment.header_glosses,
            &self.samples,
            &self.options,
        );
        mapping.replay_manual(&edits);
        self.mapping = mapping;
    }

    /// Categorical lookup built from every mapped categorical column.
    pub fn normalization_table(&self) -> NormalizationTable {
        let mut table = NormalizationTable::new();
        for column in self.mapping.matches() {
            let Some(field) = column.db_field.as_deref() else {
                continue;
            };
            let values = distinct_values(&self.table, &column.csv_header);
            table.observe(field, values.iter().map(String::as_str));
        }
        for (field, translations) in &self.enrichment.values {
            let merged = table.merge_translated(field, translations);
            if merged > 0 {
                debug!(field = %field, merged, "translated values added");
            }
        }
        table
    }

    /// Whether submission is allowed with the current mapping and defaults.
    pub fn check_ready(&self) -> std::result::Result<(), SubmissionBlock> {
        check_ready(self.mapping.matches(), &self.defaults)
    }

    /// Parses every row with the current mapping and computes derived fields.
    pub fn parse(&self) -> ParseOutcome {
        let normalizers = Normalizers::new(self.normalization_table());
        let mut outcome =
            RowParser::new(self.mapping.matches(), &normalizers, &self.defaults).parse(&self.table);
        for row in &mut outcome.accepted {
            apply_derived(&mut row.trade, self.defaults.account_balance);
        }
        outcome
    }

    /// Parses and stores the import.
    ///
    /// Refuses with [`ImportError::SubmissionBlocked`] before touching the
    /// store when a required numeric field has no column and no default.
    /// The store is not called when no row was accepted.
    pub async fn submit(&self, store: &dyn TradeStore) -> Result<ImportReport> {
        self.check_ready().map_err(ImportError::SubmissionBlocked)?;
        let outcome = self.parse();
        let response = if outcome.accepted.is_empty() {
            debug!("no accepted rows; store not called");
            ImportResponse::default()
        } else {
            let request = ImportRequest {
                mode: self.context.mode,
                account_id: self.context.account_id.clone(),
                strategy_id: self.context.strategy_id.clone(),
                trades: outcome.trades(),
            };
            store.import_trades(request).await?
        };
        let report = reconcile(&outcome, response);
        info!(
            inserted = report.inserted,
            failed_rows = report.failed_rows(),
            skipped_blank = report.skipped_blank,
            "import finished"
        );
        Ok(report)
    }
}
