//! Subcommand handlers.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use khata_core::engine::{CommandEnvelope, Engine, Outcome};
use khata_core::reports::AccountSummary;
use khata_core::statement::LedgerEntry;
use khata_core::Snapshot;
use serde::Serialize;
use tracing::info;

use crate::cli::Action;
use crate::store;

/// Runs one subcommand against the snapshot at `path`.
pub fn handle(engine: &Engine, path: &Path, action: &Action, json: bool) -> Result<()> {
    match action {
        Action::Init { force } => init(path, *force),
        Action::Apply { file } => apply(engine, path, file, json),
        Action::Statement { party_id } => {
            let snapshot = store::load(path)?;
            let entries = engine.build_statement(&snapshot, *party_id)?;
            if json {
                print_json(&entries)
            } else {
                print_statement(&entries);
                Ok(())
            }
        }
        Action::Summary => {
            let summary = engine.summarize(&store::load(path)?)?;
            if json {
                print_json(&summary)
            } else {
                print_summary(&summary);
                Ok(())
            }
        }
        Action::Relink { dry_run } => {
            let snapshot = store::load(path)?;
            let (next, report) = engine.relink_legacy(&snapshot);
            if !*dry_run {
                store::save(path, &next)?;
            }
            print_json(&report)
        }
        Action::NextInvoiceNo { kind } => {
            let snapshot = store::load(path)?;
            println!("{}", engine.next_invoice_no(&snapshot, (*kind).into()));
            Ok(())
        }
    }
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    store::save(path, &Snapshot::new())?;
    info!(path = %path.display(), "Snapshot initialized");
    Ok(())
}

fn apply(engine: &Engine, path: &Path, file: &Path, json: bool) -> Result<()> {
    let raw = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading command from stdin")?;
        buf
    } else {
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?
    };
    let envelope: CommandEnvelope =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", file.display()))?;

    let snapshot = store::load(path)?;
    let (next, outcome) = engine.execute(&snapshot, &envelope)?;
    store::save(path, &next)?;

    if json {
        print_json(&outcome)
    } else {
        println!("{} (version {})", describe(&outcome), next.version);
        Ok(())
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Invoice(invoice) => format!(
            "Invoice {} posted: total {}, paid {}",
            invoice.invoice_no, invoice.totals.grand_total, invoice.amount_paid
        ),
        Outcome::Transaction(transaction) => format!(
            "Transaction {} recorded: {} {}",
            transaction.id,
            transaction.direction.label(),
            transaction.amount
        ),
        Outcome::Transactions(posted) => format!("{} transactions recorded", posted.len()),
        Outcome::Deleted => "Deleted".to_string(),
        Outcome::Relinked(report) => format!(
            "{} linked, {} unresolved, {} ambiguous",
            report.linked(),
            report.unresolved.len(),
            report.ambiguous.len()
        ),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_statement(entries: &[LedgerEntry]) {
    println!(
        "{:<10}  {:<12}  {:<6}  {:>12}  {:>12}  DESCRIPTION",
        "DATE", "REFERENCE", "DIR", "AMOUNT", "BALANCE"
    );
    for entry in entries {
        println!(
            "{:<10}  {:<12}  {:<6}  {:>12}  {:>12}  {}",
            entry.date.to_string(),
            entry.reference,
            entry.direction.label(),
            entry.amount,
            entry.running_balance,
            entry.description
        );
    }
}

fn print_summary(summary: &AccountSummary) {
    let rows = [
        ("Revenue", summary.revenue),
        ("Purchases", summary.purchases),
        ("Expenses", summary.expenses),
        ("Profit", summary.profit),
        ("Collected", summary.collected),
        ("Given", summary.given),
        ("Receivables", summary.receivables),
        ("Payables", summary.payables),
    ];
    for (label, value) in rows {
        println!("{label:<12} {value:>14}");
    }
    if !summary.low_stock.is_empty() {
        println!();
        println!("Low stock:");
        for item in &summary.low_stock {
            println!(
                "  {} ({} left, alert at {})",
                item.name, item.stock, item.min_stock_alert
            );
        }
    }
}
