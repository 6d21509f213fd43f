//! Shared infrastructure helpers.

pub mod clock;
