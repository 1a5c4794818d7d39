use anyhow::{Context, Result};
use clap::Args;
use sqlx::PgPool;

#[derive(Args, Debug)]
pub struct RebuildArgs {}

pub async fn execute(pool: PgPool, _args: RebuildArgs) -> Result<()> {
    println!("Rebuilding database schema...");

    storereg_db::schema::rebuild_database(&pool)
        .await
        .context("Schema rebuild failed")?;

    println!("Schema applied successfully");
    Ok(())
}
