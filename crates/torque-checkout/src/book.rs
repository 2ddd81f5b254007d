//! # Sale Book
//!
//! The register's local, last-known view of recorded sales, split into
//! the Paid and Credit lists the front-end shows.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  SaleBook (Arc<RwLock<..>>, cloned into whoever needs it)     │
//! │                                                               │
//! │   SaleId ──► BookEntry { sale, payments, classification,      │
//! │                          state }                              │
//! │                                                               │
//! │   record()    ◄── checkout refresh / settlement refresh       │
//! │   load_all()  ◄── list_sales at startup                       │
//! │   paid() / credit() ──► views                                 │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The backend stays the source of truth; entries are replaced wholesale
//! on every refresh and never edited in place. The one thing carried over
//! from the previous entry is its [`SaleState`], which only moves forward.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use torque_core::classify::{classify, outstanding_balance};
use torque_core::{Classification, Money, Payment, Sale, SaleId, SaleState};
use torque_remote::{RemoteResult, SalesBackend};
use tracing::{debug, warn};

/// A sale with the payments known for it and its classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookEntry {
    pub sale: Sale,
    pub payments: Vec<Payment>,
    pub classification: Classification,
    pub state: SaleState,
}

impl BookEntry {
    fn new(sale: Sale, payments: Vec<Payment>, previous: Option<SaleState>) -> Self {
        let classification = classify(&sale, &payments);
        let state = next_state(&sale.id, previous, classification);
        BookEntry {
            sale,
            payments,
            classification,
            state,
        }
    }

    /// Amount still owed according to the known payments.
    pub fn outstanding(&self) -> Money {
        outstanding_balance(&self.sale, &self.payments)
    }
}

/// Advances a sale's state to match a fresh classification.
///
/// Sales seen for the first time start from `Submitted`. A credit sale that
/// classifies as Paid becomes `CreditSettled`. A classification that would
/// move the state backwards is logged and the state kept.
fn next_state(
    sale_id: &SaleId,
    previous: Option<SaleState>,
    classification: Classification,
) -> SaleState {
    let current = previous.unwrap_or(SaleState::Submitted);
    let target = match (current, classification) {
        (SaleState::CreditOpen | SaleState::CreditSettled, Classification::Paid) => {
            SaleState::CreditSettled
        }
        (_, classification) => SaleState::from(classification),
    };

    if current == target {
        return current;
    }

    current.advance(target).unwrap_or_else(|err| {
        warn!(sale_id = %sale_id, error = %err, "Keeping previous sale state");
        current
    })
}

/// Explicitly owned cache of classified sales.
#[derive(Debug, Clone, Default)]
pub struct SaleBook {
    entries: Arc<RwLock<HashMap<SaleId, BookEntry>>>,
}

impl SaleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the latest copy of a sale and returns the new entry.
    pub async fn record(&self, sale: Sale, payments: Vec<Payment>) -> BookEntry {
        let mut entries = self.entries.write().await;
        let previous = entries.get(&sale.id).map(|old| old.state);
        let entry = BookEntry::new(sale, payments, previous);

        debug!(
            sale_id = %entry.sale.id,
            status = %entry.sale.payment_status,
            payments = entry.payments.len(),
            classification = %entry.classification,
            state = ?entry.state,
            "Recorded sale"
        );

        entries.insert(entry.sale.id.clone(), entry.clone());
        entry
    }

    pub async fn get(&self, sale_id: &SaleId) -> Option<BookEntry> {
        self.entries.read().await.get(sale_id).cloned()
    }

    /// Fully settled sales, newest first.
    pub async fn paid(&self) -> Vec<BookEntry> {
        self.view(Classification::Paid).await
    }

    /// Sales with money still owed, newest first.
    pub async fn credit(&self) -> Vec<BookEntry> {
        self.view(Classification::Credit).await
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Replaces the book with every sale the backend lists.
    ///
    /// The list endpoint carries no payments, so sales already in the book
    /// keep the payments fetched for them earlier. Everything else is
    /// classified on status alone until its payments are read.
    pub async fn load_all(&self, backend: &dyn SalesBackend) -> RemoteResult<usize> {
        let sales = backend.list_sales().await?;

        let mut entries = self.entries.write().await;
        let mut fresh = HashMap::with_capacity(sales.len());
        for sale in sales {
            let (payments, previous) = match entries.remove(&sale.id) {
                Some(old) => (old.payments, Some(old.state)),
                None => (Vec::new(), None),
            };
            fresh.insert(sale.id.clone(), BookEntry::new(sale, payments, previous));
        }
        *entries = fresh;

        debug!(count = entries.len(), "Loaded sale book");
        Ok(entries.len())
    }

    async fn view(&self, classification: Classification) -> Vec<BookEntry> {
        let mut entries: Vec<BookEntry> = self
            .entries
            .read()
            .await
            .values()
            .filter(|e| e.classification == classification)
            .cloned()
            .collect();

        entries.sort_by(|a, b| {
            b.sale
                .created_at
                .cmp(&a.sale.created_at)
                .then_with(|| a.sale.id.cmp(&b.sale.id))
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{payment, sale, FakeBackend};
    use torque_core::PaymentMethod;

    #[tokio::test]
    async fn test_record_splits_views() {
        let book = SaleBook::new();

        let entry = book.record(sale("1", "paid", 1_000), Vec::new()).await;
        assert_eq!(entry.classification, Classification::Paid);
        assert_eq!(entry.state, SaleState::Paid);
        book.record(sale("2", "pending", 2_000), Vec::new()).await;
        book.record(
            sale("3", "", 3_000),
            vec![payment("3", PaymentMethod::Cash, 3_000)],
        )
        .await;

        let paid: Vec<_> = book.paid().await.into_iter().map(|e| e.sale.id).collect();
        let credit: Vec<_> = book.credit().await.into_iter().map(|e| e.sale.id).collect();
        assert_eq!(paid, vec![SaleId::from("1"), SaleId::from("3")]);
        assert_eq!(credit, vec![SaleId::from("2")]);
    }

    #[tokio::test]
    async fn test_record_replaces_entry() {
        let book = SaleBook::new();
        book.record(sale("7", "", 5_000), Vec::new()).await;
        assert_eq!(book.get(&SaleId::from("7")).await.unwrap().outstanding(), Money::from_cents(5_000));

        book.record(
            sale("7", "", 5_000),
            vec![payment("7", PaymentMethod::Cash, 5_000)],
        )
        .await;

        let entry = book.get(&SaleId::from("7")).await.unwrap();
        assert_eq!(entry.classification, Classification::Paid);
        assert_eq!(entry.state, SaleState::Paid);
        assert_eq!(book.len().await, 1);
    }

    #[tokio::test]
    async fn test_state_only_moves_forward() {
        let book = SaleBook::new();
        let id = SaleId::from("9");

        let entry = book.record(sale("9", "credit", 4_000), Vec::new()).await;
        assert_eq!(entry.state, SaleState::CreditOpen);

        let entry = book
            .record(
                sale("9", "", 4_000),
                vec![payment("9", PaymentMethod::Cash, 4_000)],
            )
            .await;
        assert_eq!(entry.classification, Classification::Paid);
        assert_eq!(entry.state, SaleState::CreditSettled);

        // a later credit reading cannot reopen a settled sale
        let entry = book.record(sale("9", "credit", 4_000), Vec::new()).await;
        assert_eq!(entry.classification, Classification::Credit);
        assert_eq!(entry.state, SaleState::CreditSettled);

        let backend = FakeBackend::new().with_sale(sale("9", "credit", 4_000));
        book.load_all(&backend).await.unwrap();
        assert_eq!(book.get(&id).await.unwrap().state, SaleState::CreditSettled);
    }

    #[test]
    fn test_next_state() {
        let id = SaleId::from("1");
        assert_eq!(next_state(&id, None, Classification::Paid), SaleState::Paid);
        assert_eq!(next_state(&id, None, Classification::Credit), SaleState::CreditOpen);
        assert_eq!(
            next_state(&id, Some(SaleState::Paid), Classification::Credit),
            SaleState::Paid
        );
        assert_eq!(
            next_state(&id, Some(SaleState::Submitted), Classification::Paid),
            SaleState::Paid
        );
    }

    #[tokio::test]
    async fn test_load_all_keeps_known_payments() {
        let backend = FakeBackend::new()
            .with_sale(sale("1", "", 1_000))
            .with_sale(sale("2", "credit", 2_000));

        let book = SaleBook::new();
        book.record(
            sale("1", "", 1_000),
            vec![payment("1", PaymentMethod::Cash, 1_000)],
        )
        .await;
        book.record(sale("gone", "paid", 10), Vec::new()).await;

        let count = book.load_all(&backend).await.unwrap();
        assert_eq!(count, 2);
        assert!(book.get(&SaleId::from("gone")).await.is_none());
        assert_eq!(
            book.get(&SaleId::from("1")).await.unwrap().classification,
            Classification::Paid
        );
        assert_eq!(
            book.get(&SaleId::from("2")).await.unwrap().classification,
            Classification::Credit
        );
    }

    #[tokio::test]
    async fn test_load_all_failure_leaves_book_alone() {
        let backend = FakeBackend::new().failing_sale_reads();
        let book = SaleBook::new();
        book.record(sale("1", "paid", 1_000), Vec::new()).await;

        assert!(book.load_all(&backend).await.is_err());
        assert_eq!(book.len().await, 1);
    }
}
