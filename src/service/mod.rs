//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! callers (scheduler, embedding application) and the data (repository) layer.
//! Services are responsible for:
//!
//! - **Business Logic**: Validation, retry policy, and lifecycle decisions
//! - **Orchestration**: Coordinating the repository, the delivery gateway, and the clock
//! - **Domain Models**: Working with domain models rather than entity models

pub mod broadcast;
pub mod dispatch;

#[cfg(test)]
mod test;
