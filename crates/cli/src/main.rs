//! `lagerscan` — scan-driven stock tracking over a snapshot file.
//!
//! Each invocation is one session: load the snapshot, apply the command,
//! save with the version token observed at load time.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use lagerscan_core::{LedgerError, Price, TagId};
use lagerscan_ledger::{Intake, InventoryRecord, ReintakePolicy, ScanAction};
use lagerscan_session::{ScanOutcome, Session, SessionError};
use lagerscan_store::{FsSnapshotStore, SnapshotStore, StoreError};

#[derive(Parser)]
#[command(name = "lagerscan", version, about = "Scan-driven stock tracking")]
struct Cli {
    /// Snapshot file holding the stock table.
    #[arg(long, global = true, default_value = "Lagerbestand.csv")]
    file: PathBuf,

    /// Reject re-intake of tags that were consumed earlier.
    #[arg(long, global = true)]
    strict_tags: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the current stock.
    List,
    /// Apply one decoded scan string: `tag;material[;supplier[;price]]`
    /// takes a unit in, a bare tag consumes it.
    Scan {
        text: String,
        /// Overwrite the snapshot even if it changed since load.
        #[arg(long)]
        force: bool,
    },
    /// Take a new unit into stock.
    Intake {
        tag: String,
        material: String,
        #[arg(long)]
        supplier: Option<String>,
        #[arg(long, default_value = "0")]
        price: String,
        #[arg(long)]
        force: bool,
    },
    /// Mark the active record for a tag as consumed.
    Consume {
        tag: String,
        #[arg(long)]
        force: bool,
    },
    /// Write the current stock (Received rows only) to a separate file.
    Export {
        #[arg(long)]
        out: PathBuf,
    },
    /// Discard every record and persist the empty table.
    Reset {
        /// Confirm the irreversible clear.
        #[arg(long)]
        yes: bool,
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    lagerscan_observability::init();
    let cli = Cli::parse();

    let policy = if cli.strict_tags {
        ReintakePolicy::Rejected
    } else {
        ReintakePolicy::Allowed
    };
    let store: Arc<dyn SnapshotStore> = Arc::new(FsSnapshotStore::new(&cli.file));
    let mut session = Session::open_with_policy(store, policy)
        .with_context(|| format!("opening snapshot {}", cli.file.display()))?;

    match cli.command {
        Command::List => {
            print_stock(&session.ledger().current_stock());
        }
        Command::Scan { text, force } => {
            let action = ScanAction::parse(&text).map_err(|e| anyhow::anyhow!(e))?;
            let consume_tag = match &action {
                ScanAction::Consume { tag } => Some(tag.clone()),
                ScanAction::Intake { .. } => None,
            };
            match session.apply(action, Utc::now()) {
                Ok(ScanOutcome::TakenIn(record)) => {
                    println!(
                        "taken in: {} ({} from {})",
                        record.tag(),
                        record.material(),
                        record.supplier()
                    );
                }
                Ok(ScanOutcome::Consumed(record)) => {
                    println!("consumed: {} ({})", record.tag(), record.material());
                }
                Err(e) => return Err(ledger_miss(&session, consume_tag.as_ref(), e)),
            }
            persist(&mut session, force)?;
        }
        Command::Intake {
            tag,
            material,
            supplier,
            price,
            force,
        } => {
            let intake = Intake {
                tag: TagId::parse(&tag).map_err(|e| anyhow::anyhow!(e))?,
                material,
                supplier,
                price: Price::parse(&price).map_err(|e| anyhow::anyhow!(e))?,
                occurred_at: Utc::now(),
            };
            let record = session
                .intake(intake)
                .map_err(|e| ledger_miss(&session, None, e))?;
            println!("taken in: {} ({})", record.tag(), record.material());
            persist(&mut session, force)?;
        }
        Command::Consume { tag, force } => {
            let tag = TagId::parse(&tag).map_err(|e| anyhow::anyhow!(e))?;
            let record = session
                .consume(&tag, Utc::now())
                .map_err(|e| ledger_miss(&session, Some(&tag), e))?;
            println!("consumed: {} ({})", record.tag(), record.material());
            persist(&mut session, force)?;
        }
        Command::Export { out } => {
            let stock = session.ledger().current_stock();
            let bytes = lagerscan_codec::encode(stock.iter().copied())
                .map_err(|e| anyhow::anyhow!(e))?;
            std::fs::write(&out, bytes)
                .with_context(|| format!("writing export to {}", out.display()))?;
            println!("exported {} rows to {}", stock.len(), out.display());
        }
        Command::Reset { yes, force } => {
            if !yes {
                anyhow::bail!("refusing to clear the ledger without --yes");
            }
            session.reset();
            persist(&mut session, force)?;
            println!("ledger cleared");
        }
    }

    Ok(())
}

fn print_stock(stock: &[&InventoryRecord]) {
    if stock.is_empty() {
        println!("stock is empty");
        return;
    }
    println!(
        "{:<16} {:<24} {:<16} {:>10}",
        "QR_ID", "Material", "Lieferant", "Preis"
    );
    for record in stock {
        println!(
            "{:<16} {:<24} {:<16} {:>10}",
            record.tag().as_str(),
            record.material(),
            record.supplier(),
            record.price().to_string()
        );
    }
}

/// Turn a ledger miss into a user-facing message. The ledger reports one
/// `NotFound`; the phrasing ("already consumed" vs "never seen") comes from
/// a separate query.
fn ledger_miss(session: &Session, tag: Option<&TagId>, err: SessionError) -> anyhow::Error {
    match err {
        SessionError::Ledger(LedgerError::NotFound) => match tag {
            Some(tag) if session.ledger().was_consumed(tag) => {
                anyhow::anyhow!("tag '{tag}' was already consumed")
            }
            Some(tag) => anyhow::anyhow!("tag '{tag}' not found"),
            None => anyhow::anyhow!("tag not found"),
        },
        SessionError::Ledger(LedgerError::DuplicateActiveRecord(tag)) => {
            anyhow::anyhow!("tag '{tag}' already has an active record in stock")
        }
        other => other.into(),
    }
}

fn persist(session: &mut Session, force: bool) -> anyhow::Result<()> {
    let result = if force {
        session.save_forced()
    } else {
        session.save()
    };
    match result {
        Ok(version) => {
            tracing::info!(%version, "snapshot persisted");
            Ok(())
        }
        Err(SessionError::Store(StoreError::ConcurrentModification { .. })) => {
            anyhow::bail!(
                "snapshot changed on disk while this command ran; \
                 re-run it, or pass --force to overwrite"
            )
        }
        Err(e) => Err(e).context("saving snapshot"),
    }
}
