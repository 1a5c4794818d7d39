pub mod codes;
pub mod notify;
pub mod submission;
pub mod video;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::notify::Notifier;

/// Service facade over the datastore and the external collaborators
/// (object storage for result videos, transactional email). Holds no
/// entity state of its own; every request re-reads from the store.
#[derive(Clone)]
pub struct RegistryService {
    pub pool: PgPool,
    pub s3: S3Client,
    pub bucket: String,
    /// Base URL the bucket is reachable under, used to build durable
    /// artifact URLs (typically the S3 endpoint).
    pub media_base_url: String,
    pub notifier: Option<Notifier>,
}

impl RegistryService {
    pub fn new(
        pool: PgPool,
        s3: S3Client,
        bucket: String,
        media_base_url: String,
        notifier: Option<Notifier>,
    ) -> Self {
        Self {
            pool,
            s3,
            bucket,
            media_base_url,
            notifier,
        }
    }
}

/// Builds an S3 client against a custom endpoint (MinIO in dev, AWS in
/// production). Credentials come from the usual AWS env variables.
pub async fn build_s3_client(endpoint: &str, region: &str) -> S3Client {
    let base = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;

    let conf = aws_sdk_s3::config::Builder::from(&base)
        .endpoint_url(endpoint)
        .force_path_style(true)
        .build();

    S3Client::from_conf(conf)
}
