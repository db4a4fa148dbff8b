use anyhow::{Context, Result, anyhow, bail};
use tracing::{Instrument, debug, error, info, info_span, warn};

use tj_cli::config::ImportConfig;
use tj_cli::logging::redact_value;
use tj_cli::summary::{
    print_fields, print_mapping, print_missing, print_parse_outcome, print_report,
};
use tj_import::{
    ImportError, ImportReport, ImportResponse, ImportSession, JsonLinesStore, reconcile,
};
use tj_model::{ImportContext, ImportDefaults};
use tj_translate::HttpTranslator;

use crate::cli::{ImportArgs, InputArgs, PreviewArgs, parse_map_override};

pub fn run_fields() -> Result<()> {
    print_fields();
    Ok(())
}

pub async fn run_preview(args: &PreviewArgs, config: &ImportConfig) -> Result<()> {
    let span = info_span!("preview", file = %args.input.csv.display());
    async {
        let session = build_session(&args.input, config).await?;
        print_mapping(session.mapping(), session.samples());
        print_missing(&session.mapping().missing_required(session.defaults()));
        print_parse_outcome(&session.parse(), args.all_errors);
        Ok::<(), anyhow::Error>(())
    }
    .instrument(span)
    .await
}

/// Runs an import and prints its report.
///
/// Returns true when rows failed and none were imported; a partial import is a success.
pub async fn run_import(args: &ImportArgs, config: &ImportConfig) -> Result<bool> {
    let span = info_span!("import", file = %args.input.csv.display(), dry_run = args.dry_run);
    async {
        let context = import_context(args, config)?;
        let session = build_session(&args.input, config)
            .await?
            .with_context(context);

        let report = if args.dry_run {
            dry_run(&session)?
        } else {
            let path = args.store.clone().unwrap_or_else(|| config.store_path());
            info!(store = %path.display(), "storing trades");
            let store = JsonLinesStore::new(path);
            session.submit(&store).await.map_err(|err| {
                if let ImportError::Storage(detail) = &err {
                    error!(detail = %detail, "storage failed");
                }
                anyhow!(err.user_message())
            })?
        };

        for failure in &report.failed {
            debug!(
                row = failure.row_index,
                field = failure.field.as_deref().unwrap_or("-"),
                reason = %redact_value(&failure.reason),
                "row not imported"
            );
        }
        print_report(&report, args.dry_run, false);
        Ok::<bool, anyhow::Error>(report.inserted == 0 && !report.failed.is_empty())
    }
    .instrument(span)
    .await
}

/// Validation only: every valid row counts as inserted.
fn dry_run(session: &ImportSession) -> Result<ImportReport> {
    session
        .check_ready()
        .map_err(|block| anyhow!(block.to_string()))?;
    let outcome = session.parse();
    let response = ImportResponse {
        inserted: outcome.accepted.len(),
        failed: Vec::new(),
    };
    Ok(reconcile(&outcome, response))
}

/// Loads the CSV, applies `--map` edits and, when asked, translation.
async fn build_session(input: &InputArgs, config: &ImportConfig) -> Result<ImportSession> {
    let mut session = ImportSession::from_path(&input.csv, config.matching)
        .map_err(|err| anyhow!("{}: {}", input.csv.display(), err.user_message()))?
        .with_defaults(merge_defaults(&config.defaults, input));

    for raw in &input.map {
        let (header, field) = parse_map_override(raw).map_err(|message| anyhow!(message))?;
        let mapping = session.mapping_mut();
        match field {
            Some(key) => mapping
                .assign(&header, &key)
                .with_context(|| format!("--map {raw}"))?,
            None => {
                mapping
                    .clear(&header)
                    .with_context(|| format!("--map {raw}"))?;
            }
        }
    }

    if input.translate {
        match HttpTranslator::from_config(&config.translator)? {
            Some(translator) => {
                let changed = session
                    .enrich(&translator, config.translator.timeout())
                    .await;
                debug!(changed, endpoint = translator.endpoint(), "translation finished");
            }
            None => warn!("--translate given but no translator endpoint is enabled in the config"),
        }
    }
    Ok(session)
}

fn merge_defaults(configured: &ImportDefaults, input: &InputArgs) -> ImportDefaults {
    ImportDefaults {
        risk_per_trade: input.risk.or(configured.risk_per_trade),
        risk_reward_ratio: input.rr.or(configured.risk_reward_ratio),
        account_balance: input.balance.or(configured.account_balance),
    }
}

fn import_context(args: &ImportArgs, config: &ImportConfig) -> Result<ImportContext> {
    let settings = config.context.with_overrides(
        args.mode.map(Into::into),
        args.account.as_deref(),
        args.strategy.as_deref(),
    );
    match settings.to_context() {
        Some(context) => Ok(context),
        None if args.dry_run => Ok(ImportContext {
            mode: settings.mode,
            ..ImportContext::default()
        }),
        None => {
            bail!("no target account: pass --account or set account_id under [context] in the config")
        }
    }
}
