//! Delivery gateway boundary.
//!
//! The dispatch engine talks to the chat platform only through the
//! `DeliveryGateway` trait. Transport, message formatting, and error
//! classification live behind it, which keeps the engine testable with a
//! scripted gateway and keeps platform churn out of the dispatch logic.

pub mod discord;

use serenity::async_trait;

use crate::{error::delivery::DeliveryError, model::broadcast::Destination};

/// Chat platform client able to deliver one broadcast message.
///
/// Implementations classify every failure as transient or permanent via
/// `DeliveryError`; that classification is the only retry signal the
/// dispatch engine acts on.
#[async_trait]
pub trait DeliveryGateway: Send + Sync {
    /// Delivers one broadcast message to the destination channel.
    ///
    /// # Arguments
    /// - `destination` - Guild and channel to deliver to
    /// - `title` - Title line of the message, possibly empty
    /// - `body` - Body text of the message, possibly empty
    ///
    /// # Returns
    /// - `Ok(())` - The message was accepted by the platform
    /// - `Err(DeliveryError)` - Delivery failed, classified by retryability
    async fn send(
        &self,
        destination: &Destination,
        title: &str,
        body: &str,
    ) -> Result<(), DeliveryError>;
}
