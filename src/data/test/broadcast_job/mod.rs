use crate::{
    data::broadcast_job::BroadcastJobRepository,
    error::store::StoreError,
    model::broadcast::{Destination, ScheduleBroadcastParams},
};
use chrono::{Duration, Utc};
use entity::broadcast_job::JobStatus;
use test_utils::{builder::TestBuilder, factory, factory::broadcast_job::BroadcastJobFactory};

mod enqueue;
mod release_dispatching;
