//! Command line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use khata_core::model::InvoiceKind;
use khata_shared::types::PartyId;

/// Khata ledger reconciliation engine.
#[derive(Debug, Parser)]
#[command(name = "khata", version, about)]
pub struct Cli {
    /// Snapshot document (overrides `storage.snapshot_path`).
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Action,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Action {
    /// Create an empty snapshot document.
    Init {
        /// Overwrite an existing document.
        #[arg(long)]
        force: bool,
    },
    /// Apply a JSON command envelope and save the new snapshot.
    Apply {
        /// Command file, or `-` for standard input.
        file: PathBuf,
    },
    /// Print a party statement, newest entry first.
    Statement {
        /// Party ID.
        party_id: PartyId,
    },
    /// Print the accounting summary.
    Summary,
    /// Link legacy transactions by description and save the result.
    Relink {
        /// Report only; do not save.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the next free invoice number.
    NextInvoiceNo {
        /// Invoice kind.
        #[arg(value_enum)]
        kind: KindArg,
    },
}

/// Invoice kind argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// Sale invoice.
    Sale,
    /// Purchase invoice.
    Purchase,
}

impl From<KindArg> for InvoiceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Sale => Self::Sale,
            KindArg::Purchase => Self::Purchase,
        }
    }
}
