use std::env;

use anyhow::{Context, Result};
use dotenvy::dotenv;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub s3_endpoint: String,
    pub s3_bucket: String,
    pub s3_region: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env if present

        Ok(Config {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            s3_endpoint: env::var("S3_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),

            s3_bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "storereg-videos".to_string()),

            s3_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        })
    }
}
