use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum UsersCommands {
    /// Case-insensitive substring search over usernames
    Search {
        /// Text to look for
        term: String,
    },
}

/// # Errors
///
/// Returns an error if the term is blank or the database query fails.
pub(crate) async fn run_users_search(pool: &sqlx::PgPool, term: &str) -> anyhow::Result<()> {
    let term = term.trim();
    if term.is_empty() {
        anyhow::bail!("search term must not be blank");
    }

    let users = reelhub_db::search_users(pool, term).await?;
    if users.is_empty() {
        println!("no users match '{term}'");
        return Ok(());
    }

    println!("{:<38}{:<24}PHOTO", "USER ID", "USERNAME");
    for user in &users {
        println!(
            "{:<38}{:<24}{}",
            user.user_id,
            user.username,
            user.profile_photo_url.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
