use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum MediaCommands {
    /// Print the stored record for one upload
    Show {
        /// Upload file id
        file_id: String,
    },
}

pub(crate) async fn run_media_show(pool: &sqlx::PgPool, file_id: &str) -> anyhow::Result<()> {
    let Some(row) = reelhub_db::get_media(pool, file_id).await? else {
        anyhow::bail!("no media record with id {file_id}");
    };

    println!("{} ({}) by {}", row.file_id, row.file_type, row.user_id);
    println!("  name:       {}", row.file_name);
    println!("  url:        {}", row.file_url);
    println!("  category:   {}", row.category);
    println!("  public:     {}", row.is_public);
    println!("  views:      {}", row.view_count);
    println!("  uploaded:   {}", row.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(doc) = &row.doc_file_url {
        println!("  document:   {doc}");
    }

    Ok(())
}
