use super::*;

/// Tests looking up a job that does not exist.
///
/// Expected: Err(AppError::StoreErr) wrapping NotFound
#[tokio::test]
async fn fails_for_unknown_job() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let service = BroadcastService::new(db);
    let result = service.get_job_status(999999).await;

    assert!(result.is_err());
    match result {
        Err(AppError::StoreErr(StoreError::NotFound(id))) => assert_eq!(id, 999999),
        _ => panic!("Expected NotFound error"),
    }

    Ok(())
}

/// Tests that delivery progress is visible to the caller.
///
/// Verifies that a job mid-retry exposes its status, attempt count, last
/// error, and retry window through the status API.
///
/// Expected: Ok with full failure detail
#[tokio::test]
async fn exposes_failure_details() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let retry_at = Utc::now() + Duration::minutes(4);
    let job = BroadcastJobFactory::new(db)
        .status(JobStatus::Failed)
        .attempts(2)
        .last_error(Some("gateway timeout".to_string()))
        .next_attempt_at(Some(retry_at))
        .build()
        .await?;

    let service = BroadcastService::new(db);
    let status = service.get_job_status(job.id).await?;

    assert_eq!(status.status, JobStatus::Failed);
    assert_eq!(status.attempts, 2);
    assert_eq!(status.last_error, Some("gateway timeout".to_string()));
    assert_eq!(status.next_attempt_at, Some(retry_at));

    Ok(())
}
