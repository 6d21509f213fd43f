//! Database repository layer.
//!
//! This module contains repository structs that handle database operations for each
//! domain in the application. Repositories use SeaORM entity models internally and
//! return domain models to maintain separation between the data layer and business
//! logic layer. Every status change of a broadcast job goes through the conditional
//! updates defined here, which is what makes claims and transitions race-safe.

pub mod broadcast_job;
