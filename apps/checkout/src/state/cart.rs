//! # Cart Store
//!
//! Owns the cart of one checkout session and orchestrates coupon validation.
//!
//! ## Concurrency Model
//! The store is a cheap clonable handle (`Arc<Mutex<Session>>`). Mutations
//! lock, change the cart and publish a fresh snapshot before unlocking, so
//! each one is atomic with respect to the others. `apply_coupon` is the only
//! suspending operation; the lock is never held across its `.await`, so the
//! caller may keep mutating the cart while a validation is in flight.
//!
//! ## Coupon Request Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  t=0    apply_coupon("VFARMA10")  ──► request #1  (Pending VFARMA10)    │
//! │  t=0.5  apply_coupon("XYZ")       ──► request #2  (Pending XYZ)         │
//! │  t=1.5  #1 resolves: #1 != latest ──► discarded, CouponSuperseded       │
//! │  t=2.0  #2 rejects:  #2 == latest ──► slot cleared, CouponRejected      │
//! │                                                                         │
//! │  clear_cart / last item removed / checkout                              │
//! │         ──► latest request id bumped, Pending dropped (Inactive)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Only the most recent request's outcome touches the coupon slot. While a
//! request is pending, the previously active coupon keeps pricing the cart.
//!
//! `apply_coupon` enters `Pending` as soon as it is called, before the
//! returned future is first polled. Dropping that future (a timeout, a
//! `select!`, an abandoned task) withdraws the request: `Pending` goes away
//! and the slot keeps whatever it held.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use vfarma_core::validation::normalize_coupon_code;
use vfarma_core::{
    Cart, CartTotals, CheckoutReceipt, CoreError, CoreResult, CouponApproval, CouponStatus,
    LineItem, Money, Product,
};

use crate::validator::CouponValidator;

/// Everything an observer needs to render the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub session_id: Uuid,
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
    pub coupon: CouponStatus,
}

#[derive(Debug, Clone)]
struct PendingCoupon {
    request_id: u64,
    code: String,
}

#[derive(Debug)]
struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    cart: Cart,
    latest_request: u64,
    pending: Option<PendingCoupon>,
}

impl Session {
    fn new() -> Self {
        Session {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            cart: Cart::new(),
            latest_request: 0,
            pending: None,
        }
    }

    fn coupon_status(&self) -> CouponStatus {
        if let Some(pending) = &self.pending {
            return CouponStatus::Pending {
                code: pending.code.clone(),
            };
        }

        match self.cart.coupon() {
            Some(coupon) => CouponStatus::Active {
                coupon: coupon.clone(),
            },
            None => CouponStatus::Inactive,
        }
    }

    fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            session_id: self.id,
            items: self.cart.items().to_vec(),
            totals: CartTotals::from(&self.cart),
            coupon: self.coupon_status(),
        }
    }

    fn begin_request(&mut self, code: String) -> u64 {
        self.latest_request += 1;
        self.pending = Some(PendingCoupon {
            request_id: self.latest_request,
            code,
        });
        self.latest_request
    }

    /// Makes any outstanding request stale.
    fn invalidate_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(request_id = pending.request_id, code = %pending.code, "Pending coupon request invalidated");
            self.latest_request += 1;
        }
    }

    /// Drops the pending marker of a request nobody is waiting for.
    fn abandon_request(&mut self, request_id: u64) {
        if self.pending.as_ref().map(|p| p.request_id) == Some(request_id) {
            if let Some(pending) = self.pending.take() {
                warn!(request_id, code = %pending.code, "Coupon request abandoned before it resolved");
            }
        }
    }

    fn finish_request(
        &mut self,
        request_id: u64,
        code: String,
        outcome: CoreResult<CouponApproval>,
    ) -> CoreResult<CouponApproval> {
        if request_id != self.latest_request {
            warn!(request_id, latest = self.latest_request, code = %code, "Discarding stale coupon outcome");
            return Err(CoreError::CouponSuperseded { code });
        }

        self.pending = None;

        match outcome {
            Ok(approval) => {
                info!(code = %approval.coupon.code, rate = %approval.coupon.rate, "Coupon applied");
                self.cart.apply_coupon(approval.coupon.clone());
                Ok(approval)
            }
            Err(err) => {
                if let Some(previous) = self.cart.clear_coupon() {
                    info!(previous = %previous.code, "Active coupon cleared after rejection");
                }
                Err(err)
            }
        }
    }

    /// Empties the cart and opens a new checkout session.
    fn reset(&mut self) {
        self.cart.clear();
        self.invalidate_pending();
        self.id = Uuid::new_v4();
        self.started_at = Utc::now();
    }
}

/// An issued coupon request. Withdraws itself if dropped unresolved.
struct CouponRequest {
    store: CartStore,
    request_id: u64,
    settled: bool,
}

impl CouponRequest {
    fn settle(
        mut self,
        code: String,
        outcome: CoreResult<CouponApproval>,
    ) -> CoreResult<CouponApproval> {
        self.settled = true;
        let request_id = self.request_id;
        self.store
            .mutate(|s| s.finish_request(request_id, code, outcome))
    }
}

impl Drop for CouponRequest {
    fn drop(&mut self) {
        if !self.settled {
            let request_id = self.request_id;
            self.store.mutate(|s| s.abandon_request(request_id));
        }
    }
}

/// Handle to the single cart of a running checkout.
///
/// ## Usage
/// ```rust,ignore
/// let store = CartStore::new(CouponValidator::default());
/// store.add_to_cart(&product)?;
/// let approval = store.apply_coupon(" vfarma10 ").await?;
/// println!("{} → total {}", approval.message, store.total());
/// ```
#[derive(Debug, Clone)]
pub struct CartStore {
    session: Arc<Mutex<Session>>,
    validator: CouponValidator,
    snapshot_tx: Arc<watch::Sender<CartSnapshot>>,
}

impl CartStore {
    /// Creates a store with an empty cart and a fresh session.
    pub fn new(validator: CouponValidator) -> Self {
        let session = Session::new();
        let (snapshot_tx, _) = watch::channel(session.snapshot());

        CartStore {
            session: Arc::new(Mutex::new(session)),
            validator,
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a read against the current session.
    fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> R {
        f(&*self.lock())
    }

    /// Runs a mutation and publishes the resulting snapshot.
    fn mutate<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut session = self.lock();
        let result = f(&mut *session);
        self.snapshot_tx.send_replace(session.snapshot());
        result
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// Lines in insertion order.
    pub fn items(&self) -> Vec<LineItem> {
        self.read(|s| s.cart.items().to_vec())
    }

    pub fn subtotal(&self) -> Money {
        self.read(|s| s.cart.subtotal())
    }

    pub fn total(&self) -> Money {
        self.read(|s| s.cart.total())
    }

    pub fn discount(&self) -> Money {
        self.read(|s| s.cart.discount())
    }

    pub fn needs_prescription(&self) -> bool {
        self.read(|s| s.cart.needs_prescription())
    }

    /// Inactive, pending or active coupon.
    pub fn coupon_status(&self) -> CouponStatus {
        self.read(Session::coupon_status)
    }

    pub fn totals(&self) -> CartTotals {
        self.read(|s| CartTotals::from(&s.cart))
    }

    pub fn snapshot(&self) -> CartSnapshot {
        self.read(Session::snapshot)
    }

    /// Current checkout session id.
    pub fn session_id(&self) -> Uuid {
        self.read(|s| s.id)
    }

    /// Receives a new snapshot after every mutation and coupon resolution.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshot_tx.subscribe()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `product`.
    ///
    /// ## Errors
    /// `ValidationError::OutOfRange` when the line is already at
    /// `MAX_ITEM_QUANTITY`.
    pub fn add_to_cart(&self, product: &Product) -> CoreResult<()> {
        debug!(product_id = %product.id, "add_to_cart");
        self.mutate(|s| s.cart.add_item(product))
    }

    /// Sets a line's quantity; zero or less removes the line.
    ///
    /// ## Errors
    /// `ValidationError::OutOfRange` above `MAX_ITEM_QUANTITY`; the cart is
    /// left unchanged.
    pub fn update_cart_item(&self, product_id: &str, quantity: i64) -> CoreResult<()> {
        debug!(product_id = %product_id, quantity, "update_cart_item");
        self.mutate(|s| {
            s.cart.update_quantity(product_id, quantity)?;
            if s.cart.is_empty() {
                s.invalidate_pending();
            }
            Ok(())
        })
    }

    /// Removes the whole line for `product_id`; no-op when absent.
    pub fn remove_from_cart(&self, product_id: &str) {
        debug!(product_id = %product_id, "remove_from_cart");
        self.mutate(|s| {
            s.cart.remove_item(product_id);
            if s.cart.is_empty() {
                s.invalidate_pending();
            }
        });
    }

    /// Empties the cart, drops the coupon and starts a new session.
    pub fn clear_cart(&self) {
        debug!("clear_cart");
        self.mutate(Session::reset);
    }

    /// Issues a coupon request for `code` and returns its outcome as a
    /// future. The status is `Pending` from this call on; if this is still
    /// the latest request when it resolves, the coupon slot is updated.
    ///
    /// ## Errors
    /// - `CouponRejected`: no such code; the active coupon is cleared
    /// - `CouponSuperseded`: a newer request or a cart reset came first;
    ///   the coupon slot is left untouched
    pub fn apply_coupon(
        &self,
        code: &str,
    ) -> impl Future<Output = CoreResult<CouponApproval>> + Send + 'static {
        let code = normalize_coupon_code(code);
        let request_id = self.mutate(|s| s.begin_request(code.clone()));
        debug!(request_id, code = %code, "apply_coupon");

        let request = CouponRequest {
            store: self.clone(),
            request_id,
            settled: false,
        };

        async move {
            let outcome = request.store.validator.validate(&code).await;
            request.settle(code, outcome)
        }
    }

    /// Closes the session: returns the priced receipt, then empties the cart
    /// and starts a new session.
    ///
    /// ## Errors
    /// `CoreError::EmptyCart` when there is nothing to check out.
    pub fn complete_checkout(&self) -> CoreResult<CheckoutReceipt> {
        self.mutate(|s| {
            if s.cart.is_empty() {
                return Err(CoreError::EmptyCart);
            }

            let receipt = CheckoutReceipt {
                session_id: s.id.to_string(),
                lines: s.cart.receipt_lines(),
                subtotal: s.cart.subtotal(),
                discount: s.cart.discount(),
                total: s.cart.total(),
                coupon_code: s.cart.coupon().map(|c| c.code.clone()),
                needs_prescription: s.cart.needs_prescription(),
                started_at: s.started_at,
                completed_at: Utc::now(),
            };

            info!(
                session_id = %receipt.session_id,
                total = %receipt.total,
                coupon = ?receipt.coupon_code,
                "Checkout completed"
            );

            s.reset();
            Ok(receipt)
        })
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(CouponValidator::default())
    }
}
