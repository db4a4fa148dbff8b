//! The storage boundary and reconciliation of its answer with row errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tj_model::{ParsedRow, RowError, TradingMode};
use tracing::warn;

use crate::error::Result;
use crate::parser::ParseOutcome;

/// One batch of trades for a single account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub mode: TradingMode,
    pub account_id: String,
    pub strategy_id: Option<String>,
    pub trades: Vec<ParsedRow>,
}

/// A trade the store refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageFailure {
    /// 1-based position in [`ImportRequest::trades`].
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResponse {
    pub inserted: usize,
    pub failed: Vec<StorageFailure>,
}

/// Persists trades. Each trade is stored or refused on its own.
///
/// An `Err` means the call as a whole failed and nothing is known to be stored.
#[async_trait]
pub trait TradeStore: Send + Sync {
    async fn import_trades(&self, request: ImportRequest) -> Result<ImportResponse>;
}

/// A row that did not end up stored, from either validation or storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFailure {
    /// 1-based data row position in the source CSV.
    pub row_index: usize,
    /// Field at fault; `None` for storage refusals.
    pub field: Option<String>,
    pub reason: String,
}

impl From<RowError> for ImportFailure {
    fn from(err: RowError) -> Self {
        Self {
            row_index: err.row_index,
            field: Some(err.field),
            reason: err.message,
        }
    }
}

/// Final outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub inserted: usize,
    /// Ordered by row, then field.
    pub failed: Vec<ImportFailure>,
    pub skipped_blank: usize,
}

impl ImportReport {
    /// Distinct source rows with at least one failure.
    pub fn failed_rows(&self) -> usize {
        let mut rows: Vec<usize> = self.failed.iter().map(|f| f.row_index).collect();
        rows.dedup();
        rows.len()
    }

    /// Some trades stored while other rows failed.
    pub fn is_partial(&self) -> bool {
        self.inserted > 0 && !self.failed.is_empty()
    }
}

/// Merges row errors with the store's refusals.
///
/// Storage positions are translated back to source CSV rows through the
/// order of `outcome.accepted`, which is the order the batch was sent in.
pub fn reconcile(outcome: &ParseOutcome, response: ImportResponse) -> ImportReport {
    let mut failed: Vec<ImportFailure> = outcome
        .errors
        .iter()
        .cloned()
        .map(ImportFailure::from)
        .collect();
    for failure in response.failed {
        let row_index = match failure
            .row
            .checked_sub(1)
            .and_then(|pos| outcome.accepted.get(pos))
        {
            Some(accepted) => accepted.row_index,
            None => {
                warn!(position = failure.row, "store reported a position outside the batch");
                failure.row
            }
        };
        failed.push(ImportFailure {
            row_index,
            field: None,
            reason: failure.reason,
        });
    }
    failed.sort_by(|a, b| {
        a.row_index
            .cmp(&b.row_index)
            .then_with(|| a.field.cmp(&b.field))
    });
    ImportReport {
        inserted: response.inserted,
        failed,
        skipped_blank: outcome.skipped_blank,
    }
}
