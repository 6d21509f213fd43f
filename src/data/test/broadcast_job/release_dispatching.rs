use super::*;

/// Tests the bulk recovery sweep.
///
/// Verifies that every dispatching job is returned to pending in one
/// call while jobs in other states are untouched.
///
/// Expected: Ok(2) with both stranded jobs pending again
#[tokio::test]
async fn releases_all_dispatching_jobs() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let stranded_one = BroadcastJobFactory::new(db)
        .status(JobStatus::Dispatching)
        .build()
        .await?;
    let stranded_two = BroadcastJobFactory::new(db)
        .status(JobStatus::Dispatching)
        .build()
        .await?;
    let sent = BroadcastJobFactory::new(db)
        .status(JobStatus::Sent)
        .build()
        .await?;

    let repo = BroadcastJobRepository::new(db);
    let released = repo.release_dispatching(Utc::now()).await?;

    assert_eq!(released, 2);
    assert_eq!(
        repo.find_by_id(stranded_one.id).await?.unwrap().status,
        JobStatus::Pending
    );
    assert_eq!(
        repo.find_by_id(stranded_two.id).await?.unwrap().status,
        JobStatus::Pending
    );
    assert_eq!(
        repo.find_by_id(sent.id).await?.unwrap().status,
        JobStatus::Sent
    );

    Ok(())
}

/// Tests the sweep with nothing in flight.
///
/// Expected: Ok(0)
#[tokio::test]
async fn returns_zero_when_none_dispatching() -> Result<(), StoreError> {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_broadcast_job(db).await?;

    let repo = BroadcastJobRepository::new(db);
    let released = repo.release_dispatching(Utc::now()).await?;

    assert_eq!(released, 0);

    Ok(())
}
