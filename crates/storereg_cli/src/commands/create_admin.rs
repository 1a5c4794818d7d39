use anyhow::{Context, Result};
use clap::Args;
use sqlx::PgPool;

use storereg_db::repository::UserRepository;

#[derive(Args, Debug)]
pub struct CreateAdminArgs {
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    pub username: String,

    /// Taken from the environment so it never lands in shell history.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn execute(pool: PgPool, args: CreateAdminArgs) -> Result<()> {
    let password_hash =
        bcrypt::hash(&args.password, bcrypt::DEFAULT_COST).context("Password hashing failed")?;

    let repo = UserRepository::new(pool);
    let user = repo
        .insert(&args.username, &password_hash, true)
        .await
        .context("Failed to create admin user")?;

    println!("Admin user created: {} (id {})", user.username, user.id);
    Ok(())
}
