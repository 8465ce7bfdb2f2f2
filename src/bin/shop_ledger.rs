use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Shop Ledger CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply pending schema migrations.
    Migrate,
    Catalog(CatalogCmd),
    Report(ReportCmd),
}

#[derive(Args)]
struct CatalogCmd {
    #[command(subcommand)]
    sub: CatalogSub,
}

#[derive(Subcommand)]
enum CatalogSub {
    /// Sync a TOML catalog file into the store.
    Sync {
        #[arg(long, value_name = "FILE")]
        file: String,
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Args)]
struct ReportCmd {
    #[command(subcommand)]
    sub: ReportSub,
}

#[derive(Subcommand)]
enum ReportSub {
    /// Total order revenue over [start, end), RFC3339 timestamps.
    Revenue {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();
    let db_url = std::env::var("DATABASE_URL")?;

    match cli.cmd {
        Cmd::Migrate => {
            shop_ledger::db::migrate::run_sqlite(&db_url)?;
        }
        Cmd::Catalog(CatalogCmd {
            sub: CatalogSub::Sync { file, dry_run },
        }) => {
            let cat = shop_ledger::catalog::config::load_catalog_path(&file)?;
            let mut conn = shop_ledger::db::connection::connect_sqlite(&db_url)?;
            let opt = shop_ledger::catalog::sync::SyncOptions { dry_run };
            let report = shop_ledger::catalog::sync::sync_catalog(&mut conn, &cat, opt)?;
            println!(
                "categories created: {}, products created: {}, updated: {}, unchanged: {}",
                report.categories_created,
                report.products_created,
                report.products_updated,
                report.products_unchanged
            );
        }
        Cmd::Report(ReportCmd {
            sub: ReportSub::Revenue { start, end },
        }) => {
            let start = shop_ledger::tz::parse_ts_to_utc(&start)?;
            let end = shop_ledger::tz::parse_ts_to_utc(&end)?;
            let mut conn = shop_ledger::db::connection::connect_sqlite(&db_url)?;
            let cents = shop_ledger::reports::revenue_in_range(&mut conn, start, end)?;
            println!("{}", shop_ledger::money::format_cents(cents));
        }
    }

    Ok(())
}
