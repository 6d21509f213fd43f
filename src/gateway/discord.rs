//! Discord implementation of the delivery gateway.
//!
//! Sends broadcasts as embeds through the Discord REST API and translates
//! Serenity errors into the transient/permanent classes the dispatch engine
//! retries on.

use std::{num::NonZeroU64, sync::Arc};

use serenity::{
    all::{ChannelId, CreateEmbed, CreateMessage, Timestamp},
    async_trait,
    http::{Http, HttpError},
};

use crate::{
    error::delivery::DeliveryError,
    gateway::DeliveryGateway,
    model::broadcast::Destination,
};

/// Gateway that delivers broadcasts through the Discord HTTP API.
pub struct DiscordGateway {
    /// Discord HTTP client for sending messages
    http: Arc<Http>,
}

impl DiscordGateway {
    /// Creates a new DiscordGateway.
    ///
    /// # Arguments
    /// - `http` - Arc-wrapped Discord HTTP client for API requests
    ///
    /// # Returns
    /// - `DiscordGateway` - New gateway instance
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DeliveryGateway for DiscordGateway {
    /// Sends the broadcast as an embed to the destination channel.
    ///
    /// A destination whose channel ID is not a valid nonzero snowflake can
    /// never be delivered to, so that is reported as a permanent failure
    /// without calling Discord at all. Uses Discord blurple (0x5865F2) for
    /// the embed.
    async fn send(
        &self,
        destination: &Destination,
        title: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        // Snowflakes are never zero, and ChannelId::new rejects zero values.
        let channel_id = destination.channel_id.parse::<NonZeroU64>().map_err(|e| {
            DeliveryError::Permanent(format!(
                "Invalid channel ID '{}': {}",
                destination.channel_id, e
            ))
        })?;

        let mut embed = CreateEmbed::new().color(0x5865F2).timestamp(Timestamp::now());
        if !title.is_empty() {
            embed = embed.title(title);
        }
        if !body.is_empty() {
            embed = embed.description(body);
        }

        let message = CreateMessage::new().embed(embed);

        ChannelId::new(channel_id.get())
            .send_message(&self.http, message)
            .await
            .map_err(classify_error)?;

        tracing::debug!(
            "Delivered broadcast to channel {} in guild {}",
            destination.channel_id,
            destination.guild_id
        );

        Ok(())
    }
}

/// Splits a Serenity error into the retryable and terminal classes.
///
/// Discord answering 403 (missing permissions), 404 (unknown channel), or
/// 410 (gone) means no retry can ever succeed. Everything else, including
/// rate limits, 5xx responses, and plain network failures, may clear up.
fn classify_error(err: serenity::Error) -> DeliveryError {
    match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            match response.status_code.as_u16() {
                403 | 404 | 410 => DeliveryError::Permanent(err.to_string()),
                _ => DeliveryError::Transient(err.to_string()),
            }
        }
        _ => DeliveryError::Transient(err.to_string()),
    }
}
