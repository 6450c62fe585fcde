//! XRP Ledger feed: wire types and a reconnecting websocket client.
//!
//! The public XRPL cluster pushes a `ledgerClosed` message on its `ledger`
//! stream every few seconds; the expanded transaction list for a ledger is
//! fetched separately over HTTP JSON-RPC. This crate owns both halves of
//! that protocol plus the payment-extraction rules the visualizer runs on
//! each transaction batch.
//!
//! The client is designed to be driven from a dedicated network thread:
//! events flow out through a `crossbeam_channel::Sender` consumed by the
//! render loop, commands (explicit detail fetches) flow in through a tokio
//! mpsc receiver. Connection loss is never fatal; the loop reconnects after
//! a fixed delay until the consumer goes away.

pub mod client;
pub mod types;

pub use client::{run_feed, FeedCommand, FeedConfig, FeedError, FeedEvent};
pub use types::{
    format_drops_as_xrp, Amount, LedgerClosed, LedgerRequest, LedgerResponse, PaymentTransfer,
    StreamMessage, SubscribeRequest, Transaction,
};
