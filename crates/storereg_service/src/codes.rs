//! Code issuance and the redemption protocol.
//!
//! Free functions over a pool so the CLI can issue codes without wiring up
//! object storage; the HTTP layer calls them through [`RegistryService`].

use sqlx::PgPool;

use storereg_core::{codegen, Error, Result};
use storereg_db::models::unique_code::UniqueCode;
use storereg_db::repository::{CodeFilter, CodeRepository};

use crate::RegistryService;

/// Generates candidates until one is free, then persists it as `unused`.
/// The retry budget turns a saturated code space into `CapacityExhausted`
/// instead of an endless loop.
pub async fn issue_unique(pool: &PgPool, length: usize) -> Result<UniqueCode> {
    if length == 0 {
        return Err(Error::InvalidInput(
            "length must be at least 1".to_string(),
        ));
    }

    let repo = CodeRepository::new(pool.clone());
    for _ in 0..codegen::MAX_ISSUE_ATTEMPTS {
        let candidate = codegen::generate(length);
        if repo.find_by_code(&candidate).await?.is_some() {
            continue;
        }
        // The UNIQUE constraint backstops the window between the existence
        // check and the insert; a losing race just costs one attempt.
        match repo.insert(&candidate).await {
            Ok(issued) => return Ok(issued),
            Err(Error::Conflict(_)) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(Error::CapacityExhausted {
        attempts: codegen::MAX_ISSUE_ATTEMPTS,
        length,
    })
}

/// Sequential batch issuance; each call re-checks uniqueness against the
/// store's contents at that moment.
pub async fn issue_multiple(pool: &PgPool, count: u32, length: usize) -> Result<Vec<UniqueCode>> {
    let mut issued = Vec::with_capacity(count as usize);
    for _ in 0..count {
        issued.push(issue_unique(pool, length).await?);
    }
    Ok(issued)
}

/// Admin-supplied code string; `Conflict` when it is already taken.
pub async fn issue_explicit(pool: &PgPool, code: &str) -> Result<UniqueCode> {
    let code = code.trim();
    if code.is_empty() {
        return Err(Error::InvalidInput("code is required".to_string()));
    }

    let repo = CodeRepository::new(pool.clone());
    if repo.find_by_code(code).await?.is_some() {
        return Err(Error::Conflict(format!("Code '{code}' already exists")));
    }
    repo.insert(code).await
}

/// Read-only lookup for the public form gate. Success does not imply the
/// code is redeemable; callers must still check the state, and the redeem
/// statement re-checks it atomically anyway.
pub async fn validate(pool: &PgPool, code: &str) -> Result<UniqueCode> {
    if code.trim().is_empty() {
        return Err(Error::InvalidInput("code is required".to_string()));
    }
    CodeRepository::new(pool.clone())
        .find_by_code(code)
        .await?
        .ok_or_else(|| Error::NotFound("Invalid access code".to_string()))
}

pub async fn redeem(pool: &PgPool, code: &str, submission_id: i64) -> Result<UniqueCode> {
    CodeRepository::new(pool.clone())
        .redeem(code, submission_id)
        .await
}

pub async fn mark_copied(pool: &PgPool, code: &str, is_copied: bool) -> Result<UniqueCode> {
    if code.trim().is_empty() {
        return Err(Error::InvalidInput("code is required".to_string()));
    }
    CodeRepository::new(pool.clone())
        .mark_copied(code, is_copied)
        .await
}

pub async fn list(pool: &PgPool, filter: Option<CodeFilter>) -> Result<Vec<UniqueCode>> {
    CodeRepository::new(pool.clone()).list(filter).await
}

pub async fn delete(pool: &PgPool, code: &str) -> Result<bool> {
    CodeRepository::new(pool.clone()).delete(code).await
}

impl RegistryService {
    pub async fn issue_unique(&self, length: usize) -> Result<UniqueCode> {
        issue_unique(&self.pool, length).await
    }

    pub async fn issue_multiple(&self, count: u32, length: usize) -> Result<Vec<UniqueCode>> {
        issue_multiple(&self.pool, count, length).await
    }

    pub async fn issue_explicit(&self, code: &str) -> Result<UniqueCode> {
        issue_explicit(&self.pool, code).await
    }

    pub async fn validate_code(&self, code: &str) -> Result<UniqueCode> {
        validate(&self.pool, code).await
    }

    pub async fn redeem_code(&self, code: &str, submission_id: i64) -> Result<UniqueCode> {
        redeem(&self.pool, code, submission_id).await
    }

    pub async fn mark_code_copied(&self, code: &str, is_copied: bool) -> Result<UniqueCode> {
        mark_copied(&self.pool, code, is_copied).await
    }

    pub async fn list_codes(&self, filter: Option<CodeFilter>) -> Result<Vec<UniqueCode>> {
        list(&self.pool, filter).await
    }

    pub async fn delete_code(&self, code: &str) -> Result<bool> {
        delete(&self.pool, code).await
    }
}
