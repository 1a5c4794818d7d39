use anyhow::{Context, Result};
use clap::Args;
use sqlx::PgPool;

use storereg_core::codegen::DEFAULT_CODE_LENGTH;
use storereg_service::codes;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// How many codes to issue
    #[arg(long, default_value_t = 1)]
    pub count: u32,

    /// Code length in characters
    #[arg(long, default_value_t = DEFAULT_CODE_LENGTH)]
    pub length: usize,
}

pub async fn execute(pool: PgPool, args: GenerateArgs) -> Result<()> {
    let issued = codes::issue_multiple(&pool, args.count, args.length)
        .await
        .context("Code issuance failed")?;

    println!("Issued {} code(s):", issued.len());
    for code in issued {
        println!("  {}", code.code);
    }

    Ok(())
}
