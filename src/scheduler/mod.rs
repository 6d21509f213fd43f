//! Background scheduling.
//!
//! Wires the dispatch engine to a cron-style scheduler so ticks fire on a
//! fixed interval without any caller involvement.

pub mod broadcast_dispatch;
