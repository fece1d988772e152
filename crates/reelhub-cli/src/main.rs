mod media;
mod streak;
mod users;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::{media::MediaCommands, streak::StreakCommands, users::UsersCommands};

#[derive(Debug, Parser)]
#[command(name = "reelhub-cli")]
#[command(about = "Operator tools for the reelhub database")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Inspect uploaded content records
    Media {
        #[command(subcommand)]
        command: MediaCommands,
    },
    /// Inspect streak ledgers
    Streak {
        #[command(subcommand)]
        command: StreakCommands,
    },
    /// Look up registered users
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("no command given; run `reelhub-cli --help` for usage");
        return Ok(());
    };

    let pool = reelhub_db::connect_pool_from_env().await?;

    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            reelhub_db::ping(&pool).await?;
            println!("database reachable");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = reelhub_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Media {
            command: MediaCommands::Show { file_id },
        } => media::run_media_show(&pool, &file_id).await?,
        Commands::Streak {
            command: StreakCommands::Show { profile, watcher },
        } => streak::run_streak_show(&pool, &profile, watcher.as_deref()).await?,
        Commands::Users {
            command: UsersCommands::Search { term },
        } => users::run_users_search(&pool, &term).await?,
    }

    Ok(())
}
