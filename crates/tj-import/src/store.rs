//! Trade stores: an in-memory one and a JSON-lines file.
//!
//! Both refuse a trade whose fingerprint matches one already stored for the
//! same account, so importing the same file twice does not double the journal.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tj_model::{ParsedRow, TradingMode};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{ImportError, Result};
use crate::submit::{ImportRequest, ImportResponse, StorageFailure, TradeStore};

const DUPLICATE_REASON: &str = "duplicate of an existing trade";

/// A stored trade with the account it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTrade {
    pub mode: TradingMode,
    pub account_id: String,
    pub strategy_id: Option<String>,
    #[serde(flatten)]
    pub trade: ParsedRow,
}

impl StoredTrade {
    fn fingerprint(&self) -> String {
        fingerprint(&self.account_id, &self.trade)
    }
}

fn fingerprint(account_id: &str, trade: &ParsedRow) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{:.4}|{:.4}",
        account_id,
        trade.trade_date,
        trade
            .trade_time
            .map(|time| time.format("%H:%M:%S").to_string())
            .unwrap_or_default(),
        trade.market.to_lowercase(),
        trade.direction,
        trade.trade_outcome,
        trade.risk_per_trade,
        trade.risk_reward_ratio,
    )
}

/// Splits a batch into new trades and duplicate refusals.
///
/// Duplicates inside the batch are refused too; the first occurrence wins.
fn partition(
    request: ImportRequest,
    known: &mut BTreeSet<String>,
) -> (Vec<StoredTrade>, Vec<StorageFailure>) {
    let mut fresh = Vec::new();
    let mut failed = Vec::new();
    for (pos, trade) in request.trades.into_iter().enumerate() {
        let stored = StoredTrade {
            mode: request.mode,
            account_id: request.account_id.clone(),
            strategy_id: request.strategy_id.clone(),
            trade,
        };
        if known.insert(stored.fingerprint()) {
            fresh.push(stored);
        } else {
            debug!(position = pos + 1, "duplicate trade refused");
            failed.push(StorageFailure {
                row: pos + 1,
                reason: DUPLICATE_REASON.to_string(),
            });
        }
    }
    (fresh, failed)
}

/// Keeps trades in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    trades: Mutex<Vec<StoredTrade>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything stored so far.
    pub fn trades(&self) -> Vec<StoredTrade> {
        self.trades
            .lock()
            .map(|trades| trades.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn import_trades(&self, request: ImportRequest) -> Result<ImportResponse> {
        let mut trades = self
            .trades
            .lock()
            .map_err(|_| ImportError::Storage("trade store lock poisoned".to_string()))?;
        let mut known: BTreeSet<String> = trades.iter().map(StoredTrade::fingerprint).collect();
        let (fresh, failed) = partition(request, &mut known);
        let inserted = fresh.len();
        trades.extend(fresh);
        Ok(ImportResponse { inserted, failed })
    }
}

/// Appends trades to a file, one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every stored trade. A missing file reads as empty.
    pub async fn load(&self) -> Result<Vec<StoredTrade>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(ImportError::Storage(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )));
            }
        };
        let mut trades = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StoredTrade>(line) {
                Ok(trade) => trades.push(trade),
                Err(err) => warn!(
                    path = %self.path.display(),
                    line = line_no + 1,
                    error = %err,
                    "skipping unreadable stored trade"
                ),
            }
        }
        Ok(trades)
    }
}

#[async_trait]
impl TradeStore for JsonLinesStore {
    async fn import_trades(&self, request: ImportRequest) -> Result<ImportResponse> {
        let mut known: BTreeSet<String> = self
            .load()
            .await?
            .iter()
            .map(StoredTrade::fingerprint)
            .collect();
        let (fresh, failed) = partition(request, &mut known);

        let mut buffer = String::new();
        for trade in &fresh {
            let line = serde_json::to_string(trade)
                .map_err(|err| ImportError::Storage(format!("failed to encode trade: {err}")))?;
            buffer.push_str(&line);
            buffer.push('\n');
        }
        if !buffer.is_empty() {
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await
                .map_err(|err| {
                    ImportError::Storage(format!("failed to open {}: {err}", self.path.display()))
                })?;
            file.write_all(buffer.as_bytes()).await.map_err(|err| {
                ImportError::Storage(format!("failed to write {}: {err}", self.path.display()))
            })?;
            file.flush().await.map_err(|err| {
                ImportError::Storage(format!("failed to write {}: {err}", self.path.display()))
            })?;
        }
        info!(
            path = %self.path.display(),
            inserted = fresh.len(),
            refused = failed.len(),
            "trades stored"
        );
        Ok(ImportResponse {
            inserted: fresh.len(),
            failed,
        })
    }
}
