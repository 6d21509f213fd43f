use crate::{
    error::{store::StoreError, AppError},
    model::broadcast::{Destination, JobStatus, ScheduleBroadcastParams},
    service::broadcast::BroadcastService,
};
use chrono::{Duration, Utc};
use test_utils::{builder::TestBuilder, factory, factory::broadcast_job::BroadcastJobFactory};

mod cancel;
mod status;
