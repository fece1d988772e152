use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum StreakCommands {
    /// Show how many watchers have granted a profile a streak
    Show {
        /// Profile user id
        #[arg(long)]
        profile: String,
        /// Also report whether this watcher has granted
        #[arg(long)]
        watcher: Option<String>,
    },
}

/// Print a profile's streak count and, when `watcher` is given, whether that
/// watcher is on the ledger.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_streak_show(
    pool: &sqlx::PgPool,
    profile: &str,
    watcher: Option<&str>,
) -> anyhow::Result<()> {
    let Some(row) = reelhub_db::get_streak(pool, profile).await? else {
        println!("profile {profile} has no streaks yet");
        return Ok(());
    };

    let endorsements = row.endorsements();
    println!("profile {profile}: {} streak(s)", endorsements.count());
    println!("last granted: {}", row.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("granted by: {}", endorsements.endorsers().join(", "));

    if let Some(watcher) = watcher {
        let verdict = if endorsements.contains(watcher) {
            "has granted"
        } else {
            "has not granted"
        };
        println!("watcher {watcher} {verdict}");
    }

    Ok(())
}
