//! # Freezer Seed Loader
//!
//! Loads the product catalog and freezer inventory into SQLite.
//!
//! ## Usage
//! ```bash
//! # Load the built-in fixture
//! cargo run -p freezer-db --bin seed
//!
//! # Load a fixture file, tolerating rows that already exist
//! cargo run -p freezer-db --bin seed -- --fixture fixtures/freezers.json --on-conflict skip
//!
//! # Only check the fixture
//! cargo run -p freezer-db --bin seed -- --dry-run
//! ```
//!
//! Flags override the `FREEZER_*` environment variables, which may also be
//! set in `.env.local` or `.env`.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use freezer_core::validation::validate_fixture;
use freezer_core::Fixture;
use freezer_db::{
    ConflictPolicy, Database, DbConfig, LogFormat, SeedConfig, SeedSummary, VerifyReport,
};

/// Load the freezer fixture into a SQLite database.
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Cli {
    /// Database file path [env: FREEZER_DB_PATH]
    #[arg(short = 'd', long = "db")]
    db: Option<PathBuf>,

    /// Fixture JSON file; the built-in fixture when omitted [env: FREEZER_FIXTURE]
    #[arg(short = 'f', long)]
    fixture: Option<PathBuf>,

    /// `fail` or `skip` on duplicate keys [env: FREEZER_ON_CONFLICT]
    #[arg(long)]
    on_conflict: Option<ConflictPolicy>,

    /// Do not read the data back after loading
    #[arg(long)]
    no_verify: bool,

    /// Validate the fixture and exit without touching the database
    #[arg(long)]
    dry_run: bool,

    /// `pretty` or `json` [env: FREEZER_LOG_FORMAT]
    #[arg(long)]
    log_format: Option<LogFormat>,
}

impl Cli {
    fn apply(self, mut config: SeedConfig) -> SeedConfig {
        if let Some(db) = self.db {
            config.database_path = db;
        }
        if let Some(fixture) = self.fixture {
            config.fixture_path = Some(fixture);
        }
        if let Some(policy) = self.on_conflict {
            config.on_conflict = policy;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if self.no_verify {
            config.verify = false;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let dry_run = cli.dry_run;
    let config = cli.apply(SeedConfig::from_env()?);

    init_tracing(config.log_format);

    info!(
        database = %config.database_path.display(),
        fixture = %config.fixture_label(),
        on_conflict = %config.on_conflict,
        verify = config.verify,
        "Seed configuration loaded"
    );

    let fixture = load_fixture(&config)?;
    validate_fixture(&fixture).context("fixture failed integrity checks")?;
    info!(
        products = fixture.products.len(),
        freezers = fixture.freezers.len(),
        stock_entries = fixture.stock_entry_count(),
        "Fixture is valid"
    );

    if dry_run {
        match config.log_format {
            LogFormat::Json => println!(
                "{}",
                serde_json::json!({ "fixture": config.fixture_label(), "valid": true, "dry_run": true })
            ),
            LogFormat::Pretty => println!("✓ Fixture {} is valid (dry run)", config.fixture_label()),
        }
        return Ok(());
    }

    let db = Database::new(DbConfig::new(&config.database_path))
        .await
        .context("could not open database")?;

    let seeder = db.seeder();
    let summary = seeder
        .load(&fixture, config.on_conflict, &config.fixture_label())
        .await?;

    let report = if config.verify {
        Some(seeder.verify(&fixture).await?)
    } else {
        None
    };

    // Logs go to stderr, stdout carries only the summary
    match config.log_format {
        LogFormat::Json => println!("{}", summary_document(&summary, report.as_ref())),
        LogFormat::Pretty => print_summary(&summary, report.as_ref()),
    }

    db.close().await;
    Ok(())
}

/// The run summary as one JSON document.
fn summary_document(summary: &SeedSummary, report: Option<&VerifyReport>) -> serde_json::Value {
    serde_json::json!({ "summary": summary, "verified": report })
}

fn print_summary(summary: &SeedSummary, report: Option<&VerifyReport>) {
    println!();
    println!("✓ Seed run {}", summary.run_id);
    println!(
        "  Products: {} inserted, {} skipped",
        summary.products_inserted, summary.products_skipped
    );
    println!(
        "  Freezers: {} inserted, {} skipped",
        summary.freezers_inserted, summary.freezers_skipped
    );
    println!("  Stock entries: {} inserted", summary.stock_inserted);

    if let Some(report) = report {
        println!(
            "✓ Verified {} products, {} freezers, {} stock entries",
            report.products, report.freezers, report.stock_entries
        );
    }
}

fn load_fixture(config: &SeedConfig) -> anyhow::Result<Fixture> {
    let Some(path) = &config.fixture_path else {
        return Ok(Fixture::builtin());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read fixture {}", path.display()))?;

    Fixture::from_json_str(&text).with_context(|| format!("could not parse fixture {}", path.display()))
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "seed",
            "--db",
            "/tmp/x.db",
            "--on-conflict",
            "skip",
            "--no-verify",
            "--log-format",
            "json",
        ]);
        let config = cli.apply(SeedConfig::default());

        assert_eq!(config.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.on_conflict, ConflictPolicy::Skip);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.verify);
        assert_eq!(config.fixture_path, None);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let base = SeedConfig {
            on_conflict: ConflictPolicy::Skip,
            ..SeedConfig::default()
        };
        let config = Cli::parse_from(["seed"]).apply(base.clone());
        assert_eq!(config, base);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["seed", "--on-conflict", "replace"]).is_err());
    }

    #[test]
    fn test_summary_document_is_single_line_json() {
        let summary = SeedSummary {
            run_id: "run-1".to_string(),
            products_inserted: 6,
            freezers_inserted: 5,
            stock_inserted: 7,
            ..SeedSummary::default()
        };
        let report = VerifyReport {
            products: 6,
            freezers: 5,
            stock_entries: 7,
        };

        let line = summary_document(&summary, Some(&report)).to_string();
        assert!(!line.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["summary"]["run_id"], "run-1");
        assert_eq!(parsed["summary"]["stock_inserted"], 7);
        assert_eq!(parsed["verified"]["freezers"], 5);
    }

    #[test]
    fn test_summary_document_without_verify() {
        let doc = summary_document(&SeedSummary::default(), None);
        assert!(doc["verified"].is_null());
    }

    #[test]
    fn test_builtin_fixture_when_no_path() {
        let fixture = load_fixture(&SeedConfig::default()).unwrap();
        assert_eq!(fixture, Fixture::builtin());
    }
}
