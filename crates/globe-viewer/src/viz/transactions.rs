//! Turns transaction batches from the feed into globe visuals.

use xrpl_feed::Transaction;

use super::locations::location_for_address;
use super::registry::AnimationRegistry;

/// Default beam floor: 1 XRP in drops.
pub const DEFAULT_MIN_DROPS: u64 = 1_000_000;

/// Spawns a beam for every qualifying payment in `transactions`.
///
/// Qualifying means: a `Payment` with both endpoints and a parseable
/// magnitude at or above `min_drops`. Endpoint addresses resolve to sample
/// locations via the stable hash. Returns how many beams were spawned.
pub fn ingest_batch(
    registry: &mut AnimationRegistry,
    transactions: &[Transaction],
    min_drops: u64,
    now: f64,
) -> usize {
    let mut spawned = 0;

    for tx in transactions {
        let Some(payment) = tx.as_payment() else {
            continue;
        };
        if payment.drops < min_drops {
            continue;
        }

        let from = location_for_address(&payment.from);
        let to = location_for_address(&payment.to);

        if registry
            .spawn_beam(from, to, payment.drops, payment.hash, now)
            .is_some()
        {
            spawned += 1;
        }
    }

    spawned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(json: &str) -> Transaction {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn qualifying_payment_spawns_a_beam_ensemble() {
        let mut registry = AnimationRegistry::new();
        let batch = [tx(r#"{
            "TransactionType": "Payment",
            "Account": "rSender",
            "Destination": "rReceiver",
            "Amount": "2000000",
            "hash": "AB01"
        }"#)];

        assert_eq!(ingest_batch(&mut registry, &batch, DEFAULT_MIN_DROPS, 0.0), 1);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn transfers_below_the_floor_are_discarded() {
        let mut registry = AnimationRegistry::new();
        let batch = [tx(r#"{
            "TransactionType": "Payment",
            "Account": "rSender",
            "Destination": "rReceiver",
            "Amount": "999999"
        }"#)];

        assert_eq!(ingest_batch(&mut registry, &batch, DEFAULT_MIN_DROPS, 0.0), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn non_payments_and_partial_records_are_skipped() {
        let mut registry = AnimationRegistry::new();
        let batch = [
            tx(r#"{"TransactionType": "OfferCreate", "Account": "rA", "Destination": "rB", "Amount": "9000000"}"#),
            tx(r#"{"TransactionType": "Payment", "Account": "rA", "Amount": "9000000"}"#),
            tx(r#"{"TransactionType": "Payment"}"#),
        ];

        assert_eq!(ingest_batch(&mut registry, &batch, DEFAULT_MIN_DROPS, 0.0), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn issued_currency_payments_ride_the_same_path() {
        let mut registry = AnimationRegistry::new();
        let batch = [tx(r#"{
            "TransactionType": "Payment",
            "Account": "rA",
            "Destination": "rB",
            "Amount": {"value": "15", "currency": "USD"}
        }"#)];

        // 15 * 10^6 drops-equivalent: above the floor, High tier.
        assert_eq!(ingest_batch(&mut registry, &batch, DEFAULT_MIN_DROPS, 0.0), 1);
        assert_eq!(registry.beam_count(), 1);
    }
}
