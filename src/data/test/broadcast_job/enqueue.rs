use super::*;

/// Tests enqueuing a valid broadcast.
///
/// Verifies that the repository creates the job in pending state with a
/// zeroed attempt counter and no retry bookkeeping.
///
/// Expected: Ok with pending job
#[tokio::test]
async fn creates_pending_job_with_zero_attempts() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let scheduled_at = Utc::now() + Duration::hours(1);
    let repo = BroadcastJobRepository::new(db);
    let result = repo
        .enqueue(ScheduleBroadcastParams {
            destination: Destination::new("900000000000000001", "800000000000000001"),
            title: "Fleet forming".to_string(),
            body: "Undock in ten minutes".to_string(),
            scheduled_at,
        })
        .await;

    assert!(result.is_ok());
    let job = result.unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.attempts, 0);
    assert_eq!(job.title, "Fleet forming");
    assert_eq!(job.body, "Undock in ten minutes");
    assert_eq!(job.destination.guild_id, "900000000000000001");
    assert_eq!(job.destination.channel_id, "800000000000000001");
    assert_eq!(job.scheduled_at, scheduled_at);
    assert!(job.last_error.is_none());
    assert!(job.next_attempt_at.is_none());

    // The job is durably stored, not just echoed back
    let stored = repo.find_by_id(job.id).await?;
    assert!(stored.is_some());
    assert_eq!(stored.unwrap().status, JobStatus::Pending);

    Ok(())
}

/// Tests enqueuing with an empty channel ID.
///
/// Verifies that a destination with a blank channel ID is rejected before
/// anything is written.
///
/// Expected: Err(StoreError::Validation)
#[tokio::test]
async fn rejects_empty_channel_id() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = BroadcastJobRepository::new(db);
    let result = repo
        .enqueue(ScheduleBroadcastParams {
            destination: Destination::new("900000000000000001", "  "),
            title: "Fleet forming".to_string(),
            body: "Undock in ten minutes".to_string(),
            scheduled_at: Utc::now() + Duration::hours(1),
        })
        .await;

    assert!(result.is_err());
    match result {
        Err(StoreError::Validation(_)) => (),
        _ => panic!("Expected Validation error"),
    }

    Ok(())
}

/// Tests enqueuing with an empty guild ID.
///
/// Verifies that a destination with a blank guild ID is rejected before
/// anything is written.
///
/// Expected: Err(StoreError::Validation)
#[tokio::test]
async fn rejects_empty_guild_id() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = BroadcastJobRepository::new(db);
    let result = repo
        .enqueue(ScheduleBroadcastParams {
            destination: Destination::new("", "800000000000000001"),
            title: "Fleet forming".to_string(),
            body: "Undock in ten minutes".to_string(),
            scheduled_at: Utc::now() + Duration::hours(1),
        })
        .await;

    assert!(result.is_err());
    match result {
        Err(StoreError::Validation(_)) => (),
        _ => panic!("Expected Validation error"),
    }

    Ok(())
}

/// Tests enqueuing with no message content.
///
/// Verifies that a broadcast whose title and body are both blank is
/// rejected; there would be nothing to deliver.
///
/// Expected: Err(StoreError::Validation)
#[tokio::test]
async fn rejects_blank_title_and_body() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = BroadcastJobRepository::new(db);
    let result = repo
        .enqueue(ScheduleBroadcastParams {
            destination: Destination::new("900000000000000001", "800000000000000001"),
            title: String::new(),
            body: "   ".to_string(),
            scheduled_at: Utc::now() + Duration::hours(1),
        })
        .await;

    assert!(result.is_err());
    match result {
        Err(StoreError::Validation(_)) => (),
        _ => panic!("Expected Validation error"),
    }

    Ok(())
}

/// Tests enqueuing with a title but no body.
///
/// Verifies that only one of title and body is required.
///
/// Expected: Ok with pending job
#[tokio::test]
async fn accepts_title_only_broadcast() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = BroadcastJobRepository::new(db);
    let result = repo
        .enqueue(ScheduleBroadcastParams {
            destination: Destination::new("900000000000000001", "800000000000000001"),
            title: "Fleet forming".to_string(),
            body: String::new(),
            scheduled_at: Utc::now() + Duration::hours(1),
        })
        .await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().status, JobStatus::Pending);

    Ok(())
}

/// Tests enqueuing with a past scheduled time.
///
/// Verifies that scheduling in the past is legal; the job is simply due
/// on the next dispatch tick.
///
/// Expected: Ok with pending job already due
#[tokio::test]
async fn accepts_past_scheduled_time() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = BroadcastJobRepository::new(db);
    let job = repo
        .enqueue(ScheduleBroadcastParams {
            destination: Destination::new("900000000000000001", "800000000000000001"),
            title: "Fleet forming".to_string(),
            body: "Undock now".to_string(),
            scheduled_at: Utc::now() - Duration::minutes(5),
        })
        .await?;

    let claimed = repo.claim_due(Utc::now(), 10).await?;
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].id, job.id);

    Ok(())
}
