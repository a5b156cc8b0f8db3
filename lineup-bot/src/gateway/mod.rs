//! Discord gateway connection
//!
//! Keeps a WebSocket session to the Discord gateway alive and publishes translated
//! dispatches on the [`EventBus`].
//!
//! Session lifecycle:
//! 1. Connect, wait for HELLO
//! 2. IDENTIFY (always a fresh session; lineup state is reset on every READY anyway)
//! 3. Heartbeat every `heartbeat_interval`; a missing ACK counts as a dead connection
//! 4. RECONNECT, INVALID_SESSION or a dropped socket → reconnect with backoff
//!
//! Close codes that can never succeed on retry (bad token, disallowed intents) stop the
//! gateway with an error.

pub mod payload;

use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use lineup_common::events::EventBus;
use serde_json::json;
use thiserror::Error;
use tokio::time::{interval_at, sleep, timeout, Instant};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use payload::{opcode, translate_dispatch, GatewayPayload, Hello};

/// Gateway endpoint (API v10, JSON encoding)
pub const GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

const HELLO_TIMEOUT: Duration = Duration::from_secs(20);
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Connect failed: {0}")]
    Connect(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Socket closed by the remote side
    #[error("Connection closed (code {code}): {reason}")]
    Closed { code: u16, reason: String },

    #[error("Session invalidated by gateway")]
    InvalidSession,

    #[error("Decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Errors that would repeat on every reconnect
    pub fn is_fatal(&self) -> bool {
        match self {
            // Authentication failed, invalid shard, sharding required,
            // invalid API version, invalid intents, disallowed intents
            GatewayError::Closed { code, .. } => {
                matches!(code, 4004 | 4010 | 4011 | 4012 | 4013 | 4014)
            }
            _ => false,
        }
    }
}

/// Why a healthy session ended
enum SessionEnd {
    /// Gateway asked us to reconnect
    Reconnect,
    /// Heartbeat went unacknowledged
    Zombie,
}

/// Discord gateway client
pub struct GatewayClient {
    token: String,
    intents: u64,
    url: String,
    bus: EventBus,
}

impl GatewayClient {
    pub fn new(token: impl Into<String>, bus: EventBus) -> Self {
        Self {
            token: token.into(),
            intents: payload::intents::LINEUP,
            url: GATEWAY_URL.to_string(),
            bus,
        }
    }

    /// Run sessions until a fatal error occurs
    pub async fn run(self) -> Result<(), GatewayError> {
        let mut backoff = INITIAL_BACKOFF;

        loop {
            let mut reached_ready = false;
            match self.run_session(&mut reached_ready).await {
                Ok(SessionEnd::Reconnect) => {
                    info!("Gateway requested reconnect");
                    backoff = INITIAL_BACKOFF;
                    continue;
                }
                Ok(SessionEnd::Zombie) => {
                    warn!("Gateway heartbeat not acknowledged; reconnecting");
                }
                Err(e) if e.is_fatal() => {
                    error!(error = %e, "Gateway session cannot be re-established");
                    return Err(e);
                }
                Err(e) => {
                    warn!(error = %e, "Gateway session ended");
                }
            }

            if reached_ready {
                backoff = INITIAL_BACKOFF;
            }
            info!("Reconnecting to gateway in {:?}", backoff);
            sleep(backoff).await;
            backoff = (backoff * 2).min(MAX_BACKOFF);
        }
    }

    async fn run_session(&self, reached_ready: &mut bool) -> Result<SessionEnd, GatewayError> {
        let (ws, _response) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| GatewayError::Connect(e.to_string()))?;
        let (mut sink, mut stream) = ws.split();
        debug!("Gateway socket connected");

        // HELLO
        let hello_message = timeout(HELLO_TIMEOUT, stream.next())
            .await
            .map_err(|_| GatewayError::Protocol("no HELLO received".to_string()))?
            .ok_or_else(|| GatewayError::Protocol("socket closed before HELLO".to_string()))?
            .map_err(|e| GatewayError::Connect(e.to_string()))?;
        let hello_payload = parse_message(hello_message)?
            .ok_or_else(|| GatewayError::Protocol("unexpected first frame".to_string()))?;
        if hello_payload.op != opcode::HELLO {
            return Err(GatewayError::Protocol(format!(
                "expected HELLO, got op {}",
                hello_payload.op
            )));
        }
        let hello: Hello = serde_json::from_value(hello_payload.d)
            .map_err(|e| GatewayError::Decode(format!("HELLO: {}", e)))?;
        let period = Duration::from_millis(hello.heartbeat_interval.max(1));

        // IDENTIFY
        let identify = GatewayPayload::new(
            opcode::IDENTIFY,
            json!({
                "token": self.token,
                "intents": self.intents,
                "properties": {
                    "os": std::env::consts::OS,
                    "browser": "lineup-bot",
                    "device": "lineup-bot",
                },
            }),
        );
        send_payload(&mut sink, &identify).await?;

        let mut heartbeat = interval_at(Instant::now() + period, period);
        let mut sequence: Option<u64> = None;
        let mut awaiting_ack = false;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if awaiting_ack {
                        return Ok(SessionEnd::Zombie);
                    }
                    send_payload(&mut sink, &GatewayPayload::new(opcode::HEARTBEAT, json!(sequence))).await?;
                    awaiting_ack = true;
                }
                frame = stream.next() => {
                    let message = match frame {
                        Some(Ok(message)) => message,
                        Some(Err(e)) => return Err(GatewayError::Connect(e.to_string())),
                        None => return Err(GatewayError::Closed { code: 1006, reason: "stream ended".to_string() }),
                    };
                    let Some(payload) = parse_message(message)? else {
                        continue;
                    };
                    if payload.s.is_some() {
                        sequence = payload.s;
                    }

                    match payload.op {
                        opcode::DISPATCH => {
                            let name = payload.t.unwrap_or_default();
                            if name == "READY" {
                                *reached_ready = true;
                            }
                            self.publish(&name, payload.d);
                        }
                        opcode::HEARTBEAT => {
                            send_payload(&mut sink, &GatewayPayload::new(opcode::HEARTBEAT, json!(sequence))).await?;
                        }
                        opcode::HEARTBEAT_ACK => awaiting_ack = false,
                        opcode::RECONNECT => return Ok(SessionEnd::Reconnect),
                        opcode::INVALID_SESSION => return Err(GatewayError::InvalidSession),
                        other => debug!(op = other, "Ignoring gateway opcode"),
                    }
                }
            }
        }
    }

    fn publish(&self, name: &str, data: serde_json::Value) {
        match translate_dispatch(name, data, chrono::Utc::now()) {
            Ok(Some(event)) => {
                debug!(dispatch = %name, kind = event.kind(), "Gateway event");
                if self.bus.emit(event) == 0 {
                    warn!(dispatch = %name, "No event subscribers; event dropped");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(dispatch = %name, error = %e, "Dropping undecodable dispatch"),
        }
    }
}

/// Parse a socket frame; `Ok(None)` for frames without a payload (ping/pong/binary)
fn parse_message(message: Message) -> Result<Option<GatewayPayload>, GatewayError> {
    match message {
        Message::Text(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| GatewayError::Decode(e.to_string())),
        Message::Close(frame) => {
            let (code, reason) = frame
                .map(|f| (u16::from(f.code), f.reason.into_owned()))
                .unwrap_or((u16::from(CloseCode::Status), String::new()));
            Err(GatewayError::Closed { code, reason })
        }
        _ => Ok(None),
    }
}

async fn send_payload<S>(sink: &mut S, payload: &GatewayPayload) -> Result<(), GatewayError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let text = serde_json::to_string(payload).map_err(|e| GatewayError::Decode(e.to_string()))?;
    sink.send(Message::Text(text))
        .await
        .map_err(|e| GatewayError::Connect(e.to_string()))
}
