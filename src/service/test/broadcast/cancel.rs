use super::*;

/// Tests cancelling a pending broadcast.
///
/// Expected: Ok with the cancelled job returned
#[tokio::test]
async fn cancels_pending_job() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let job = factory::create_broadcast_job(db).await?;

    let service = BroadcastService::new(db);
    let cancelled = service.cancel_job(job.id).await?;

    assert_eq!(cancelled.id, job.id);
    assert_eq!(cancelled.status, JobStatus::Cancelled);

    Ok(())
}

/// Tests cancelling a broadcast whose dispatch already started.
///
/// Verifies that the service refuses the cancel so the caller knows the
/// delivery may already have gone out.
///
/// Expected: Err(AppError::StoreErr) wrapping InvalidState
#[tokio::test]
async fn rejects_cancel_once_dispatching() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let job = BroadcastJobFactory::new(db)
        .status(JobStatus::Dispatching)
        .build()
        .await?;

    let service = BroadcastService::new(db);
    let result = service.cancel_job(job.id).await;

    assert!(result.is_err());
    match result {
        Err(AppError::StoreErr(StoreError::InvalidState { actual, .. })) => {
            assert_eq!(actual, JobStatus::Dispatching);
        }
        _ => panic!("Expected InvalidState error"),
    }

    Ok(())
}

/// Tests cancelling a broadcast that does not exist.
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
    let result = service.cancel_job(999999).await;

    assert!(result.is_err());
    match result {
        Err(AppError::StoreErr(StoreError::NotFound(_))) => (),
        _ => panic!("Expected NotFound error"),
    }

    Ok(())
}
