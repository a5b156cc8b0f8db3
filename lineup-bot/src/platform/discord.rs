//! Discord REST API client
//!
//! Implements [`ChatPlatform`] over the Discord HTTP API (v10) with bot token auth.
//! A 429 answer is retried once after the advertised `retry_after`.

use std::time::Duration;

use async_trait::async_trait;
use lineup_common::events::{InteractionRef, SlashCommand};
use lineup_common::{ApplicationId, ChannelId, EmojiRef, GuildId, MessageRef, ReactionEmoji, UserId};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{ChatPlatform, FetchedMessage, MessageReaction, PlatformError, PlatformResult};
use crate::wire;

const DISCORD_API_BASE_URL: &str = "https://discord.com/api/v10";
/// `DiscordBot (<name>, <version>)`, the form the API asks bots to send
const USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_NAME"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Longest rate-limit wait honored before giving up on a request
const MAX_RETRY_AFTER_SECS: f64 = 10.0;

/// Interaction callback types
const CALLBACK_CHANNEL_MESSAGE: u8 = 4;
const CALLBACK_DEFERRED_CHANNEL_MESSAGE: u8 = 5;
/// Message flag: only the invoking user sees the response
const FLAG_EPHEMERAL: u32 = 1 << 6;

#[derive(Debug, Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

/// Discord REST client
pub struct DiscordClient {
    http_client: reqwest::Client,
    token: String,
    base_url: String,
}

impl DiscordClient {
    pub fn new(token: impl Into<String>) -> PlatformResult<Self> {
        Self::with_base_url(token, DISCORD_API_BASE_URL)
    }

    /// Client against a different API root (e.g. a local proxy)
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> PlatformResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Send a request, retrying once on 429, and map failure statuses to errors
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> PlatformResult<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut retried = false;

        loop {
            let mut builder = self
                .http_client
                .request(method.clone(), &url)
                .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token));
            builder = match body {
                Some(body) => builder.json(body),
                None => builder.header(reqwest::header::CONTENT_LENGTH, 0),
            };

            debug!(method = %method, path = %path, "Discord API request");

            let response = builder
                .send()
                .await
                .map_err(|e| PlatformError::Network(e.to_string()))?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS && !retried {
                let wait = response
                    .json::<RateLimitBody>()
                    .await
                    .map(|b| b.retry_after)
                    .unwrap_or(1.0);
                if wait <= MAX_RETRY_AFTER_SECS {
                    warn!(path = %path, retry_after = wait, "Rate limited by Discord; retrying");
                    tokio::time::sleep(Duration::from_secs_f64(wait.max(0.0))).await;
                    retried = true;
                    continue;
                }
                return Err(PlatformError::Api {
                    status: status.as_u16(),
                    body: format!("rate limited for {}s", wait),
                });
            }

            let error_text = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND {
                return Err(PlatformError::NotFound(format!("{} {}", path, error_text)));
            }
            return Err(PlatformError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> PlatformResult<T> {
        self.request(method, path, body)
            .await?
            .json::<T>()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))
    }

    fn reaction_path(message: MessageRef, emoji_api_form: &str) -> String {
        format!(
            "/channels/{}/messages/{}/reactions/{}/@me",
            message.channel_id,
            message.message_id,
            urlencoding::encode(emoji_api_form)
        )
    }
}

#[async_trait]
impl ChatPlatform for DiscordClient {
    async fn send_message(&self, channel: ChannelId, content: &str) -> PlatformResult<MessageRef> {
        let body = json!({ "content": content });
        let message: wire::Message = self
            .request_json(Method::POST, &format!("/channels/{}/messages", channel), Some(&body))
            .await?;
        Ok(message.location())
    }

    async fn edit_message(&self, message: MessageRef, content: &str) -> PlatformResult<()> {
        let body = json!({ "content": content });
        self.request(
            Method::PATCH,
            &format!("/channels/{}/messages/{}", message.channel_id, message.message_id),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn fetch_message(&self, message: MessageRef) -> PlatformResult<FetchedMessage> {
        let fetched: wire::Message = self
            .request_json(
                Method::GET,
                &format!("/channels/{}/messages/{}", message.channel_id, message.message_id),
                None,
            )
            .await?;

        Ok(FetchedMessage {
            location: fetched.location(),
            reactions: fetched
                .reactions
                .into_iter()
                .map(|r| MessageReaction {
                    emoji: r.emoji.into(),
                    me: r.me,
                })
                .collect(),
        })
    }

    async fn add_reaction(&self, message: MessageRef, emoji: &ReactionEmoji) -> PlatformResult<()> {
        self.request(Method::PUT, &Self::reaction_path(message, &emoji.api_form()), None)
            .await?;
        Ok(())
    }

    async fn remove_own_reaction(&self, message: MessageRef, emoji: &EmojiRef) -> PlatformResult<()> {
        self.request(Method::DELETE, &Self::reaction_path(message, &emoji.api_form()), None)
            .await?;
        Ok(())
    }

    async fn member_display_name(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> PlatformResult<Option<String>> {
        let result: PlatformResult<wire::Member> = self
            .request_json(Method::GET, &format!("/guilds/{}/members/{}", guild, user), None)
            .await;

        match result {
            Ok(member) => Ok(member.display_name(None)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn defer_interaction(&self, interaction: &InteractionRef) -> PlatformResult<()> {
        let body = json!({
            "type": CALLBACK_DEFERRED_CHANNEL_MESSAGE,
            "data": { "flags": FLAG_EPHEMERAL },
        });
        self.request(
            Method::POST,
            &format!("/interactions/{}/{}/callback", interaction.id, interaction.token),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn finish_interaction(
        &self,
        interaction: &InteractionRef,
        content: &str,
    ) -> PlatformResult<()> {
        let body = json!({ "content": content });
        self.request(
            Method::PATCH,
            &format!(
                "/webhooks/{}/{}/messages/@original",
                interaction.application_id, interaction.token
            ),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn respond_interaction(
        &self,
        interaction: &InteractionRef,
        content: &str,
    ) -> PlatformResult<()> {
        let body = json!({
            "type": CALLBACK_CHANNEL_MESSAGE,
            "data": { "content": content },
        });
        self.request(
            Method::POST,
            &format!("/interactions/{}/{}/callback", interaction.id, interaction.token),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    async fn register_commands(
        &self,
        application: ApplicationId,
        commands: &[SlashCommand],
    ) -> PlatformResult<()> {
        let body = Value::Array(
            commands
                .iter()
                .map(|c| {
                    json!({
                        "name": c.name(),
                        "description": c.description(),
                        "type": 1,
                    })
                })
                .collect(),
        );
        self.request(
            Method::PUT,
            &format!("/applications/{}/commands", application),
            Some(&body),
        )
        .await?;
        Ok(())
    }
}
