pub use super::broadcast_job::Entity as BroadcastJob;
