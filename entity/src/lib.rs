pub mod broadcast_job;
pub mod prelude;
