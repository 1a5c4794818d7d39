use rust_embed::RustEmbed;
use sqlx::{Executor, PgPool};
use std::str;

#[derive(RustEmbed)]
#[folder = "schema/"]
struct SchemaAssets;

/// Reads the build order and applies all SQL files in a single transaction.
/// Statements are written to be idempotent (IF NOT EXISTS / duplicate-type
/// guards), so rebuilding against an existing database is safe.
pub async fn rebuild_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let manifest = get_file_content("00_build_order.sql").expect("Missing 00_build_order.sql");

    let mut full_script = String::new();

    for line in manifest.lines() {
        let trimmed = line.trim();

        // Parse: -- @include file.sql
        if let Some(path) = parse_include_directive(trimmed) {
            let content =
                get_file_content(path).unwrap_or_else(|| panic!("Missing included file: {path}"));
            full_script.push_str(&content);
            full_script.push('\n');
        } else if !trimmed.starts_with("--") {
            full_script.push_str(line);
            full_script.push('\n');
        }
    }

    (&mut *tx).execute(full_script.as_str()).await?;
    tx.commit().await?;

    Ok(())
}

fn get_file_content(path: &str) -> Option<String> {
    SchemaAssets::get(path).map(|f| str::from_utf8(f.data.as_ref()).unwrap().to_string())
}

fn parse_include_directive(line: &str) -> Option<&str> {
    if line.starts_with("--") && line.contains("@include") {
        line.split_whitespace().last()
    } else {
        None
    }
}
