//! Code-redemption lifecycle tests against a real Postgres.
//!
//! These are ignored by default; run them with a local database:
//!   DATABASE_URL=postgres://... cargo test -p storereg_service -- --ignored
//!
//! Each test works with its own freshly issued codes, so the suite can run
//! against a shared dev database without interference.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use storereg_core::{codegen, Error};
use storereg_db::models::submission::NewSubmission;
use storereg_db::models::submission::SubmissionStatus;
use storereg_db::models::unique_code::CodeState;
use storereg_db::repository::SubmissionRepository;
use storereg_service::{codes, RegistryService};

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for these tests");
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    storereg_db::schema::rebuild_database(&pool)
        .await
        .expect("failed to apply schema");
    pool
}

/// S3 is never contacted by these tests, but the service facade needs a
/// client; this one points nowhere and performs no I/O until used.
fn offline_s3() -> aws_sdk_s3::Client {
    let conf = aws_sdk_s3::Config::builder()
        .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .build();
    aws_sdk_s3::Client::from_conf(conf)
}

async fn test_service() -> RegistryService {
    let pool = test_pool().await;
    RegistryService::new(
        pool,
        offline_s3(),
        "storereg-test".to_string(),
        "http://localhost:9000".to_string(),
        None,
    )
}

fn applicant(email: &str) -> NewSubmission {
    NewSubmission {
        name: "Budi".to_string(),
        store_name: "Toko Maju".to_string(),
        address: "Jl. Merdeka 1, Jakarta".to_string(),
        email: email.to_string(),
        phone: "+62-812-000".to_string(),
    }
}

#[tokio::test]
#[ignore]
async fn issue_validate_redeem_then_second_redeem_is_rejected() {
    let service = test_service().await;

    // Work with a generated code rather than the literal "ABCDEFGH" so
    // reruns against a dirty database do not collide.
    let issued = service.issue_unique(8).await.unwrap();
    assert_eq!(issued.code.len(), 8);
    assert_eq!(issued.state, CodeState::Unused);

    let validated = service.validate_code(&issued.code).await.unwrap();
    assert_eq!(validated.state, CodeState::Unused);
    assert!(validated.is_redeemable());

    let first = service
        .create_submission(&applicant("first@example.com"), None)
        .await
        .unwrap();
    let redeemed = service.redeem_code(&issued.code, first.id).await.unwrap();
    assert_eq!(redeemed.state, CodeState::Used);
    assert_eq!(redeemed.submission_id, Some(first.id));
    assert!(redeemed.used_at.is_some());

    // Second redemption must be rejected and must not disturb the record.
    let second = service
        .create_submission(&applicant("second@example.com"), None)
        .await
        .unwrap();
    let err = service.redeem_code(&issued.code, second.id).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let unchanged = service.validate_code(&issued.code).await.unwrap();
    assert_eq!(unchanged.submission_id, Some(first.id));
    assert_eq!(unchanged.used_at, redeemed.used_at);
}

#[tokio::test]
#[ignore]
async fn concurrent_redemptions_settle_on_exactly_one_winner() {
    let service = test_service().await;
    let issued = service.issue_unique(12).await.unwrap();

    let mut submission_ids = Vec::new();
    for i in 0..8 {
        let s = service
            .create_submission(&applicant(&format!("racer{i}@example.com")), None)
            .await
            .unwrap();
        submission_ids.push(s.id);
    }

    let mut handles = Vec::new();
    for id in submission_ids {
        let pool = service.pool.clone();
        let code = issued.code.clone();
        handles.push(tokio::spawn(async move {
            codes::redeem(&pool, &code, id).await
        }));
    }

    let mut winners = 0;
    let mut rejections = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(updated) => {
                assert_eq!(updated.state, CodeState::Used);
                winners += 1;
            }
            Err(Error::Conflict(_)) => rejections += 1,
            Err(other) => panic!("unexpected redemption error: {other}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(rejections, 7);
}

#[tokio::test]
#[ignore]
async fn copying_never_affects_redeemability() {
    let service = test_service().await;
    let issued = service.issue_unique(8).await.unwrap();

    let copied = service.mark_code_copied(&issued.code, true).await.unwrap();
    assert_eq!(copied.state, CodeState::Copied);
    assert!(copied.is_redeemable());

    let reverted = service.mark_code_copied(&issued.code, false).await.unwrap();
    assert_eq!(reverted.state, CodeState::Unused);

    let recopied = service.mark_code_copied(&issued.code, true).await.unwrap();
    assert_eq!(recopied.state, CodeState::Copied);

    // A copied code still redeems exactly once.
    let submission = service
        .create_submission(&applicant("copier@example.com"), None)
        .await
        .unwrap();
    let redeemed = service.redeem_code(&issued.code, submission.id).await.unwrap();
    assert_eq!(redeemed.state, CodeState::Used);

    // And copying a used code is a no-op that keeps the audit fields.
    let after = service.mark_code_copied(&issued.code, true).await.unwrap();
    assert_eq!(after.state, CodeState::Used);
    assert_eq!(after.submission_id, Some(submission.id));
}

#[tokio::test]
#[ignore]
async fn batch_issue_yields_distinct_unused_codes() {
    let service = test_service().await;

    let issued = service.issue_multiple(5, 24).await.unwrap();
    assert_eq!(issued.len(), 5);

    let mut strings: Vec<&str> = issued.iter().map(|c| c.code.as_str()).collect();
    strings.sort();
    strings.dedup();
    assert_eq!(strings.len(), 5);

    for code in &issued {
        assert_eq!(code.code.len(), 24);
        assert_eq!(code.state, CodeState::Unused);
        assert!(code.submission_id.is_none());
    }
}

#[tokio::test]
#[ignore]
async fn gated_create_rolls_back_on_used_code() {
    let service = test_service().await;
    let issued = service.issue_unique(10).await.unwrap();

    let winner = service
        .create_submission(&applicant("winner@example.com"), Some(&issued.code))
        .await
        .unwrap();
    assert_eq!(winner.status, SubmissionStatus::Pending);

    let redeemed = service.validate_code(&issued.code).await.unwrap();
    assert_eq!(redeemed.submission_id, Some(winner.id));

    // Second attempt with the same code: rejected, and its submission row
    // must have been rolled back.
    let before = service.list_submissions(None).await.unwrap().len();
    let err = service
        .create_submission(&applicant("loser@example.com"), Some(&issued.code))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    let after = service.list_submissions(None).await.unwrap().len();
    assert_eq!(before, after);

    // Unknown code: also rolled back, distinct error.
    let err = service
        .create_submission(&applicant("nobody@example.com"), Some("NO-SUCH-CODE"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(service.list_submissions(None).await.unwrap().len(), after);
}

#[tokio::test]
#[ignore]
async fn finish_attaches_artifact_and_status_together() {
    let service = test_service().await;

    let submission = service
        .create_submission(&applicant("review@example.com"), None)
        .await
        .unwrap();
    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert!(submission.video_url.is_none());

    let finished = service
        .finish_with_video(submission.id, "https://x/video.mp4")
        .await
        .unwrap();
    assert_eq!(finished.status, SubmissionStatus::Finished);
    assert_eq!(finished.video_url.as_deref(), Some("https://x/video.mp4"));
    assert!(finished.updated_at >= submission.updated_at);

    // The independent attach leaves status alone.
    let reverted = service
        .set_submission_status(finished.id, SubmissionStatus::Pending)
        .await
        .unwrap();
    let attached = service
        .set_submission_video_url(reverted.id, "https://x/v2.mp4")
        .await
        .unwrap();
    assert_eq!(attached.status, SubmissionStatus::Pending);
    assert_eq!(attached.video_url.as_deref(), Some("https://x/v2.mp4"));

    // The combined write also handles non-finished statuses, both columns
    // in the same statement.
    let rejected = service
        .set_submission_status_and_video(attached.id, SubmissionStatus::Rejected, "https://x/v3.mp4")
        .await
        .unwrap();
    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert_eq!(rejected.video_url.as_deref(), Some("https://x/v3.mp4"));
}

#[tokio::test]
#[ignore]
async fn status_filter_tracks_current_status() {
    let service = test_service().await;

    let a = service
        .create_submission(&applicant("filter-a@example.com"), None)
        .await
        .unwrap();
    let b = service
        .create_submission(&applicant("filter-b@example.com"), None)
        .await
        .unwrap();

    service
        .set_submission_status(a.id, SubmissionStatus::Rejected)
        .await
        .unwrap();

    let pending = service
        .list_submissions(Some(SubmissionStatus::Pending))
        .await
        .unwrap();
    assert!(pending.iter().any(|s| s.id == b.id));
    assert!(!pending.iter().any(|s| s.id == a.id));

    // Mutate again; the filter must follow the current value.
    service
        .set_submission_status(a.id, SubmissionStatus::Pending)
        .await
        .unwrap();
    let pending = service
        .list_submissions(Some(SubmissionStatus::Pending))
        .await
        .unwrap();
    assert!(pending.iter().any(|s| s.id == a.id));
}

#[tokio::test]
#[ignore]
async fn deleting_a_submission_leaves_the_code_reference_dangling() {
    let service = test_service().await;
    let issued = service.issue_unique(10).await.unwrap();

    let submission = service
        .create_submission(&applicant("gone@example.com"), Some(&issued.code))
        .await
        .unwrap();
    service.delete_submission(submission.id).await.unwrap();

    // The code record is terminal and untouched; the weak reference now
    // points at a deleted row.
    let code = service.validate_code(&issued.code).await.unwrap();
    assert_eq!(code.state, CodeState::Used);
    assert_eq!(code.submission_id, Some(submission.id));
    assert!(SubmissionRepository::new(service.pool.clone())
        .get(submission.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore]
async fn issuance_fails_with_capacity_exhausted_when_the_code_space_is_full() {
    let service = test_service().await;

    // Claim every single-character code so no candidate of length 1 is free.
    for byte in codegen::CODE_ALPHABET {
        let code = (*byte as char).to_string();
        match service.issue_explicit(&code).await {
            Ok(_) | Err(Error::Conflict(_)) => {}
            Err(other) => panic!("unexpected issuance error: {other}"),
        }
    }

    let err = service.issue_unique(1).await.unwrap_err();
    match err {
        Error::CapacityExhausted { attempts, length } => {
            assert_eq!(attempts, codegen::MAX_ISSUE_ATTEMPTS);
            assert_eq!(length, 1);
        }
        other => panic!("expected capacity exhaustion, got: {other}"),
    }

    // Longer codes are unaffected by the saturated length-1 space.
    let issued = service.issue_unique(8).await.unwrap();
    assert_eq!(issued.code.len(), 8);
}

#[tokio::test]
#[ignore]
async fn explicit_issue_conflicts_on_duplicate() {
    let service = test_service().await;
    let issued = service.issue_unique(16).await.unwrap();

    let err = service.issue_explicit(&issued.code).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}
