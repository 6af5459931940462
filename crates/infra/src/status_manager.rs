//! Status change pipeline for product lines.
//!
//! ```text
//! load order -> handle command -> apply event -> save whole document
//! ```
//!
//! Business-rule failures come back as [`TransitionOutcome::Rejected`]; only
//! storage problems surface as `Err`.

use chrono::Utc;

use orderdesk_core::Aggregate;
use orderdesk_orders::{
    LineId, LineStatusChanged, OrderCommand, OrderEvent, OrderId, Rejection, StatusAction,
    StatusCommand, TransitionPolicy,
};

use crate::store::{OrderStore, StoreError};

/// Result of one admin status action that reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(LineStatusChanged),
    Rejected(Rejection),
}

impl TransitionOutcome {
    /// Message shown to the admin for this outcome.
    pub fn message(&self) -> &'static str {
        match self {
            TransitionOutcome::Applied(change) => change.action.success_message(),
            TransitionOutcome::Rejected(rejection) => rejection.message(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }
}

#[derive(Debug, Clone)]
pub struct OrderStatusManager<S> {
    store: S,
    policy: TransitionPolicy,
}

impl<S: OrderStore> OrderStatusManager<S> {
    pub fn new(store: S, policy: TransitionPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Run `action` against one line of one order.
    ///
    /// `line_id` is `None` when the caller could not parse the submitted line
    /// reference; that is reported as a missing line once the order is found.
    /// A rejected action leaves the stored document untouched.
    #[tracing::instrument(
        skip_all,
        fields(order_id = %order_id, action = %action, line_id = ?line_id),
        err
    )]
    pub async fn execute(
        &self,
        order_id: OrderId,
        line_id: Option<LineId>,
        action: StatusAction,
    ) -> Result<TransitionOutcome, StoreError> {
        let Some(mut order) = self.store.find_order(order_id).await? else {
            tracing::debug!("order not found");
            return Ok(TransitionOutcome::Rejected(Rejection::order_not_found(action)));
        };

        let command = OrderCommand::ChangeLineStatus(StatusCommand {
            order_id,
            line_id,
            action,
            policy: self.policy,
            occurred_at: Utc::now(),
        });

        let events = match order.handle(&command) {
            Ok(events) => events,
            Err(rejection) => {
                tracing::debug!(reason = ?rejection.reason, "status change rejected");
                return Ok(TransitionOutcome::Rejected(rejection));
            }
        };

        for event in &events {
            order.apply(event);
        }
        self.store.save_order(&order).await?;

        let Some(OrderEvent::LineStatusChanged(change)) = events.into_iter().next() else {
            return Err(StoreError::Corrupt {
                id: order_id.to_string(),
                message: "status change produced no event".to_string(),
            });
        };

        tracing::info!(
            line_id = %change.line_id,
            from = %change.from,
            to = %change.to,
            "line status changed"
        );
        Ok(TransitionOutcome::Applied(change))
    }

    pub async fn ship(
        &self,
        order_id: OrderId,
        line_id: Option<LineId>,
    ) -> Result<TransitionOutcome, StoreError> {
        self.execute(order_id, line_id, StatusAction::Ship).await
    }

    pub async fn deliver(
        &self,
        order_id: OrderId,
        line_id: Option<LineId>,
    ) -> Result<TransitionOutcome, StoreError> {
        self.execute(order_id, line_id, StatusAction::Deliver).await
    }

    pub async fn cancel(
        &self,
        order_id: OrderId,
        line_id: Option<LineId>,
    ) -> Result<TransitionOutcome, StoreError> {
        self.execute(order_id, line_id, StatusAction::Cancel).await
    }

    pub async fn approve_return(
        &self,
        order_id: OrderId,
        line_id: Option<LineId>,
    ) -> Result<TransitionOutcome, StoreError> {
        self.execute(order_id, line_id, StatusAction::ApproveReturn).await
    }
}
