//! Subsman CLI
//!
//! Database bootstrap commands:
//!
//! - `migrate` - Apply schema migrations
//! - `init-db` - Migrate, then seed every empty table with sample data
//! - `clean-db` - Migrate, wipe all records, then seed unconditionally

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use subsman_db::seed::{SeedReport, Seeder};
use subsman_db::{create_pool_with_options, run_migrations, DbPool, PoolOptions, Repositories};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "subsman-cli")]
#[command(about = "Database management for the subscription manager")]
struct Cli {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Database name, reported in logs only
    #[arg(long, env = "DATABASE_NAME", default_value = "subs-db")]
    database_name: String,

    /// Deadline for a single storage call, in seconds
    #[arg(long, env = "DATABASE_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Maximum open connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations
    Migrate,
    /// Seed sample data into empty tables
    InitDb,
    /// Delete all records and reseed sample data
    CleanDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive("subsman_cli=info".parse()?)
                .add_directive("subsman_db=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let timeout = Duration::from_secs(cli.timeout_secs);

    tracing::info!(database = %cli.database_name, command = ?cli.command, "Connecting");
    let pool = create_pool_with_options(
        &cli.database_url,
        PoolOptions {
            max_connections: cli.max_connections,
            acquire_timeout: timeout,
        },
    )
    .await?;

    run_migrations(&pool).await?;

    match cli.command {
        Command::Migrate => {
            println!("Migrations applied to {}", cli.database_name);
        }
        Command::InitDb => {
            let report = seeder(pool, timeout).initialize().await?;
            print_report(&report);
        }
        Command::CleanDb => {
            let (cleared, report) = seeder(pool, timeout).clean().await?;
            println!(
                "Removed {} subscriptions, {} users, {} products",
                cleared.subscriptions, cleared.users, cleared.products
            );
            print_report(&report);
        }
    }

    Ok(())
}

type PgSeeder = Seeder<
    subsman_db::pg::PgUserRepository,
    subsman_db::pg::PgProductRepository,
    subsman_db::pg::PgSubscriptionRepository,
>;

fn seeder(pool: DbPool, timeout: Duration) -> PgSeeder {
    let repos = Repositories::with_timeout(pool, timeout);
    Seeder::new(
        Arc::new(repos.users),
        Arc::new(repos.products),
        Arc::new(repos.subscriptions),
    )
}

fn print_report(report: &SeedReport) {
    println!("products:      {}", report.products);
    println!("users:         {}", report.users);
    println!("subscriptions: {}", report.subscriptions);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from([
            "subsman-cli",
            "--database-url",
            "postgres://localhost/subs",
            "init-db",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::InitDb));
        assert_eq!(cli.timeout_secs, 10);

        let cli = Cli::try_parse_from([
            "subsman-cli",
            "--database-url",
            "postgres://localhost/subs",
            "--timeout-secs",
            "3",
            "clean-db",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::CleanDb));
        assert_eq!(cli.timeout_secs, 3);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let result = Cli::try_parse_from([
            "subsman-cli",
            "--database-url",
            "postgres://localhost/subs",
            "drop-db",
        ]);
        assert!(result.is_err());
    }
}
