//! Serde types for the XRPL websocket stream and the `ledger` JSON-RPC call.

use serde::{Deserialize, Serialize};

/// One XRP is a million drops; amounts on the wire are denominated in drops.
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// The one-shot subscription sent right after the socket opens.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    command: &'static str,
    streams: Vec<&'static str>,
}

impl SubscribeRequest {
    /// Subscribes to ledger-close notifications.
    pub fn ledger_stream() -> Self {
        Self {
            command: "subscribe",
            streams: vec!["ledger"],
        }
    }
}

/// Inbound stream messages, discriminated by their `type` field.
///
/// The cluster sends more message kinds than we act on (subscription acks,
/// path-finding updates); everything unrecognized lands in `Other` and is
/// dropped by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StreamMessage {
    #[serde(rename = "ledgerClosed")]
    LedgerClosed(LedgerClosed),

    #[serde(other)]
    Other,
}

/// A finalized ledger announcement.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerClosed {
    pub ledger_index: u64,
    pub ledger_hash: String,
    #[serde(default)]
    pub txn_count: u32,
}

/// JSON-RPC request for a single ledger with expanded transactions.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRequest {
    method: &'static str,
    params: [LedgerParams; 1],
}

#[derive(Debug, Clone, Serialize)]
struct LedgerParams {
    ledger_index: u64,
    transactions: bool,
    expand: bool,
}

impl LedgerRequest {
    /// Requests `ledger_index` with its transaction list expanded in place.
    pub fn expanded(ledger_index: u64) -> Self {
        Self {
            method: "ledger",
            params: [LedgerParams {
                ledger_index,
                transactions: true,
                expand: true,
            }],
        }
    }
}

/// JSON-RPC response envelope for [`LedgerRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerResponse {
    pub result: Option<LedgerResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerResult {
    pub ledger: Option<LedgerDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerDetail {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// A ledger transaction as returned by the expanded `ledger` call.
///
/// Every field is optional on the wire; display code substitutes "N/A"
/// rather than treating a missing field as an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transaction {
    #[serde(rename = "TransactionType")]
    pub transaction_type: Option<String>,
    #[serde(rename = "Account")]
    pub account: Option<String>,
    #[serde(rename = "Destination")]
    pub destination: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: Option<Amount>,
    /// Fee in drops, as a decimal string.
    #[serde(rename = "Fee")]
    pub fee: Option<String>,
    pub hash: Option<String>,
}

/// The two wire encodings of a transferred amount.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    /// Native XRP: a decimal string of integer drops.
    Drops(String),
    /// Issued currency: decimal value plus a currency code.
    Issued {
        value: String,
        currency: String,
        #[serde(default)]
        issuer: Option<String>,
    },
}

impl Amount {
    /// Transferred magnitude in drops, used for beam classification.
    ///
    /// Native transfers parse the drops string as an integer; issued-currency
    /// transfers parse the decimal value and scale by 10^6. Unparseable or
    /// negative values yield `None`.
    pub fn drops(&self) -> Option<u64> {
        match self {
            Amount::Drops(s) => s.parse::<u64>().ok(),
            Amount::Issued { value, .. } => {
                let v: f64 = value.parse().ok()?;
                if v.is_sign_negative() || !v.is_finite() {
                    return None;
                }
                Some((v * DROPS_PER_XRP as f64) as u64)
            }
        }
    }

    /// Human-readable form: `1.500000 XRP` or `12.5 USD`.
    pub fn display(&self) -> String {
        match self {
            Amount::Drops(s) => match s.parse::<u64>() {
                Ok(drops) => format!("{:.6} XRP", drops as f64 / DROPS_PER_XRP as f64),
                Err(_) => "N/A".to_owned(),
            },
            Amount::Issued { value, currency, .. } => format!("{value} {currency}"),
        }
    }
}

/// Formats a drops string (e.g. a `Fee` field) as XRP, or "N/A".
pub fn format_drops_as_xrp(drops: &str) -> String {
    match drops.parse::<u64>() {
        Ok(d) => format!("{:.6} XRP", d as f64 / DROPS_PER_XRP as f64),
        Err(_) => "N/A".to_owned(),
    }
}

/// A qualified payment: both endpoints present and a parseable magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentTransfer {
    pub from: String,
    pub to: String,
    pub drops: u64,
    pub hash: Option<String>,
}

impl Transaction {
    /// Extracts the visualizable payment from this transaction, if any.
    ///
    /// Only `Payment` transactions with an account, a destination and a
    /// parseable amount qualify; everything else is skipped silently.
    pub fn as_payment(&self) -> Option<PaymentTransfer> {
        if self.transaction_type.as_deref() != Some("Payment") {
            return None;
        }

        Some(PaymentTransfer {
            from: self.account.clone()?,
            to: self.destination.clone()?,
            drops: self.amount.as_ref()?.drops()?,
            hash: self.hash.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_closed_is_decoded_from_stream() {
        let raw = r#"{
            "type": "ledgerClosed",
            "ledger_index": 95000321,
            "ledger_hash": "F2C8A1...",
            "txn_count": 42,
            "fee_base": 10,
            "reserve_base": 1000000
        }"#;

        match serde_json::from_str::<StreamMessage>(raw).unwrap() {
            StreamMessage::LedgerClosed(closed) => {
                assert_eq!(closed.ledger_index, 95000321);
                assert_eq!(closed.txn_count, 42);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn unknown_stream_types_fall_through() {
        let raw = r#"{"type": "response", "status": "success"}"#;
        assert!(matches!(
            serde_json::from_str::<StreamMessage>(raw).unwrap(),
            StreamMessage::Other
        ));
    }

    #[test]
    fn native_amount_parses_as_integer_drops() {
        let amount: Amount = serde_json::from_str(r#""2500000""#).unwrap();
        assert_eq!(amount.drops(), Some(2_500_000));
        assert_eq!(amount.display(), "2.500000 XRP");
    }

    #[test]
    fn issued_amount_scales_decimal_value() {
        let amount: Amount =
            serde_json::from_str(r#"{"value": "2.5", "currency": "USD", "issuer": "rHb9..."}"#)
                .unwrap();
        assert_eq!(amount.drops(), Some(2_500_000));
        assert_eq!(amount.display(), "2.5 USD");
    }

    #[test]
    fn garbage_amounts_yield_none() {
        let amount: Amount = serde_json::from_str(r#""not-a-number""#).unwrap();
        assert_eq!(amount.drops(), None);

        let negative: Amount =
            serde_json::from_str(r#"{"value": "-4", "currency": "EUR"}"#).unwrap();
        assert_eq!(negative.drops(), None);
    }

    #[test]
    fn only_complete_payments_qualify() {
        let payment: Transaction = serde_json::from_str(
            r#"{
                "TransactionType": "Payment",
                "Account": "rSender",
                "Destination": "rReceiver",
                "Amount": "3000000",
                "Fee": "12",
                "hash": "ABCDEF"
            }"#,
        )
        .unwrap();
        let transfer = payment.as_payment().unwrap();
        assert_eq!(transfer.drops, 3_000_000);
        assert_eq!(transfer.from, "rSender");

        let offer: Transaction = serde_json::from_str(
            r#"{"TransactionType": "OfferCreate", "Account": "rA", "Amount": "5"}"#,
        )
        .unwrap();
        assert!(offer.as_payment().is_none());

        let no_destination: Transaction = serde_json::from_str(
            r#"{"TransactionType": "Payment", "Account": "rA", "Amount": "5000000"}"#,
        )
        .unwrap();
        assert!(no_destination.as_payment().is_none());
    }

    #[test]
    fn expanded_request_shape_matches_the_rpc() {
        let body = serde_json::to_value(LedgerRequest::expanded(7)).unwrap();
        assert_eq!(body["method"], "ledger");
        assert_eq!(body["params"][0]["ledger_index"], 7);
        assert_eq!(body["params"][0]["transactions"], true);
        assert_eq!(body["params"][0]["expand"], true);
    }
}
