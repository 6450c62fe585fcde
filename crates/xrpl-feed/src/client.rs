//! Reconnecting websocket client for the ledger stream.
//!
//! One call to [`run_feed`] owns the socket for the life of the process:
//! subscribe on connect, forward `ledgerClosed` announcements, fetch the
//! expanded transaction list for every close (and for explicit UI requests),
//! and reconnect after a fixed delay whenever the socket drops. Nothing in
//! here is fatal except the render thread hanging up its channel.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::types::{
    LedgerClosed, LedgerRequest, LedgerResponse, StreamMessage, SubscribeRequest, Transaction,
};

/// Endpoints and retry policy for the feed loop.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Websocket endpoint carrying the `ledger` stream.
    pub ws_endpoint: String,
    /// HTTP JSON-RPC endpoint for expanded ledger detail.
    pub http_endpoint: String,
    /// Pause between a socket close and the next connection attempt.
    pub reconnect_delay: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            ws_endpoint: "wss://xrplcluster.com".to_owned(),
            http_endpoint: "https://xrplcluster.com".to_owned(),
            reconnect_delay: Duration::from_secs(3),
        }
    }
}

/// Events pushed to the render thread.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Connected,
    Disconnected,
    LedgerClosed(LedgerClosed),
    /// Expanded transactions for a ledger. `requested` distinguishes an
    /// explicit UI fetch (opens the transaction panel) from the automatic
    /// per-close fetch that only feeds the globe.
    LedgerDetail {
        ledger_index: u64,
        transactions: Vec<Transaction>,
        requested: bool,
    },
    /// Detail fetch failed; surfaced as an inline message, never retried.
    DetailFailed { ledger_index: u64, requested: bool },
}

/// Commands sent from the render thread.
#[derive(Debug, Clone)]
pub enum FeedCommand {
    /// Fetch expanded detail for a specific ledger (a clicked block).
    FetchLedger { ledger_index: u64 },
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("websocket error: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed feed message: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Why a connected session ended.
enum SessionEnd {
    /// The socket closed or errored; reconnect.
    SocketClosed,
    /// The render thread dropped its end; shut down.
    ConsumerGone,
}

/// Runs the feed until the event receiver is dropped.
pub async fn run_feed(
    config: FeedConfig,
    events: crossbeam_channel::Sender<FeedEvent>,
    mut commands: tokio::sync::mpsc::UnboundedReceiver<FeedCommand>,
) {
    let http = reqwest::Client::new();

    loop {
        match session(&config, &http, &events, &mut commands).await {
            Ok(SessionEnd::ConsumerGone) => return,
            Ok(SessionEnd::SocketClosed) => {
                tracing::info!(endpoint = %config.ws_endpoint, "ledger feed closed")
            }
            Err(e) => tracing::warn!(error = %e, "ledger feed error"),
        }

        if events.send(FeedEvent::Disconnected).is_err() {
            return;
        }
        tokio::time::sleep(config.reconnect_delay).await;
    }
}

async fn session(
    config: &FeedConfig,
    http: &reqwest::Client,
    events: &crossbeam_channel::Sender<FeedEvent>,
    commands: &mut tokio::sync::mpsc::UnboundedReceiver<FeedCommand>,
) -> Result<SessionEnd, FeedError> {
    let (ws, _) = connect_async(config.ws_endpoint.as_str()).await?;
    let (mut write, mut read) = ws.split();

    tracing::info!(endpoint = %config.ws_endpoint, "connected to ledger feed");
    if events.send(FeedEvent::Connected).is_err() {
        return Ok(SessionEnd::ConsumerGone);
    }

    let subscribe = serde_json::to_string(&SubscribeRequest::ledger_stream())?;
    write.send(Message::Text(subscribe)).await?;

    loop {
        tokio::select! {
            msg = read.next() => {
                let msg = match msg {
                    Some(Ok(m)) => m,
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(SessionEnd::SocketClosed),
                };

                match msg {
                    Message::Text(text) => {
                        // Unknown message kinds decode to `Other`; a frame
                        // that fails to decode entirely is just skipped.
                        let parsed: StreamMessage = match serde_json::from_str(&text) {
                            Ok(p) => p,
                            Err(e) => {
                                tracing::debug!(error = %e, "undecodable stream frame");
                                continue;
                            }
                        };

                        if let StreamMessage::LedgerClosed(closed) = parsed {
                            if on_ledger_closed(config, http, events, closed).await {
                                return Ok(SessionEnd::ConsumerGone);
                            }
                        }
                    }
                    Message::Close(_) => return Ok(SessionEnd::SocketClosed),
                    // Pings are answered by the stream itself on flush.
                    _ => {}
                }
            }

            cmd = commands.recv() => {
                let Some(FeedCommand::FetchLedger { ledger_index }) = cmd else {
                    return Ok(SessionEnd::ConsumerGone);
                };
                if emit_detail(config, http, events, ledger_index, true).await {
                    return Ok(SessionEnd::ConsumerGone);
                }
            }
        }
    }
}

/// Forwards a close announcement and its transaction batch.
/// Returns true when the consumer is gone.
async fn on_ledger_closed(
    config: &FeedConfig,
    http: &reqwest::Client,
    events: &crossbeam_channel::Sender<FeedEvent>,
    closed: LedgerClosed,
) -> bool {
    let ledger_index = closed.ledger_index;
    tracing::debug!(ledger_index, txn_count = closed.txn_count, "ledger closed");

    if events.send(FeedEvent::LedgerClosed(closed)).is_err() {
        return true;
    }
    emit_detail(config, http, events, ledger_index, false).await
}

/// Fetches expanded detail and emits the matching event.
/// Returns true when the consumer is gone.
async fn emit_detail(
    config: &FeedConfig,
    http: &reqwest::Client,
    events: &crossbeam_channel::Sender<FeedEvent>,
    ledger_index: u64,
    requested: bool,
) -> bool {
    let event = match fetch_ledger_detail(http, &config.http_endpoint, ledger_index).await {
        Ok(transactions) => {
            tracing::debug!(ledger_index, count = transactions.len(), "fetched ledger detail");
            FeedEvent::LedgerDetail {
                ledger_index,
                transactions,
                requested,
            }
        }
        Err(e) => {
            tracing::warn!(ledger_index, error = %e, "ledger detail fetch failed");
            FeedEvent::DetailFailed {
                ledger_index,
                requested,
            }
        }
    };

    events.send(event).is_err()
}

async fn fetch_ledger_detail(
    http: &reqwest::Client,
    endpoint: &str,
    ledger_index: u64,
) -> Result<Vec<Transaction>, FeedError> {
    let response: LedgerResponse = http
        .post(endpoint)
        .json(&LedgerRequest::expanded(ledger_index))
        .send()
        .await?
        .json()
        .await?;

    Ok(response
        .result
        .and_then(|r| r.ledger)
        .map(|l| l.transactions)
        .unwrap_or_default())
}
