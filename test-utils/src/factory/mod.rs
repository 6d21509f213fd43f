//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests. Each entity has its own factory module with both a
//! `Factory` struct for customization and a `create_*` convenience function for quick
//! default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults (scheduled one hour from now)
//!     let job = factory::create_broadcast_job(&db).await?;
//!
//!     // Create a job that is already due
//!     let due = factory::create_due_broadcast_job(&db).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! Use the factory builder for custom values:
//!
//! ```rust,ignore
//! use entity::broadcast_job::JobStatus;
//! use test_utils::factory::broadcast_job::BroadcastJobFactory;
//!
//! let job = BroadcastJobFactory::new(&db)
//!     .title("Roam tonight")
//!     .status(JobStatus::Failed)
//!     .attempts(2)
//!     .build()
//!     .await?;
//! ```

pub mod broadcast_job;
pub mod helpers;

// Re-export commonly used factory functions for concise usage
pub use broadcast_job::{create_broadcast_job, create_due_broadcast_job};
