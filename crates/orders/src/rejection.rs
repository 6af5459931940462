//! Domain rejections of status changes and their user-facing messages.

use crate::status::{LineStatus, StatusAction};

/// Why a status change was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    OrderNotFound,
    LineNotFound,
    AlreadyInState(LineStatus),
    NotShippedYet,
    NotDeliveredYet,
}

/// An expected business-rule failure for one admin action.
///
/// `Display` yields the message shown to the admin. Messages differ per action
/// (e.g. the cancel and approve-return flows word their lookup failures
/// differently) and are kept stable for existing front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub action: StatusAction,
    pub reason: RejectionReason,
}

impl core::fmt::Display for Rejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Rejection {}

impl Rejection {
    pub fn new(action: StatusAction, reason: RejectionReason) -> Self {
        Self { action, reason }
    }

    pub fn order_not_found(action: StatusAction) -> Self {
        Self::new(action, RejectionReason::OrderNotFound)
    }

    pub fn line_not_found(action: StatusAction) -> Self {
        Self::new(action, RejectionReason::LineNotFound)
    }

    pub fn message(&self) -> &'static str {
        use LineStatus::*;
        use RejectionReason::*;
        use StatusAction::*;

        match (self.action, self.reason) {
            (ApproveReturn, OrderNotFound) => "Order not found.",
            (_, OrderNotFound) => "Order not found",

            (Cancel, LineNotFound) => "Product not found",
            (ApproveReturn, LineNotFound) => "Product not found in the order.",
            (_, LineNotFound) => "Product not found in the order",

            (Cancel | ApproveReturn, AlreadyInState(CancelledByPlatform)) => {
                "Product is already cancelled"
            }
            (_, AlreadyInState(CancelledByPlatform)) => "Product is already Cancelled by Platform",
            (_, AlreadyInState(Shipped)) => "Product is already Shipped",
            (_, AlreadyInState(Delivered)) => "Product is already Delivered",
            (_, AlreadyInState(ReturnApproved)) => "Product return is already approved",
            (_, AlreadyInState(Placed)) => "Product is already Placed",

            (_, NotShippedYet) => "Product is not Shipped yet",
            (_, NotDeliveredYet) => "Product is not Delivered yet",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use StatusAction::*;

    #[test]
    fn lookup_messages_are_specific_per_action() {
        assert_eq!(Rejection::order_not_found(Ship).to_string(), "Order not found");
        assert_eq!(Rejection::order_not_found(Deliver).to_string(), "Order not found");
        assert_eq!(Rejection::order_not_found(Cancel).to_string(), "Order not found");
        assert_eq!(
            Rejection::order_not_found(ApproveReturn).to_string(),
            "Order not found."
        );

        assert_eq!(
            Rejection::line_not_found(Ship).to_string(),
            "Product not found in the order"
        );
        assert_eq!(
            Rejection::line_not_found(Deliver).to_string(),
            "Product not found in the order"
        );
        assert_eq!(Rejection::line_not_found(Cancel).to_string(), "Product not found");
        assert_eq!(
            Rejection::line_not_found(ApproveReturn).to_string(),
            "Product not found in the order."
        );
    }

    #[test]
    fn already_cancelled_wording_depends_on_action() {
        let reason = RejectionReason::AlreadyInState(LineStatus::CancelledByPlatform);
        assert_eq!(
            Rejection::new(Ship, reason).to_string(),
            "Product is already Cancelled by Platform"
        );
        assert_eq!(
            Rejection::new(Deliver, reason).to_string(),
            "Product is already Cancelled by Platform"
        );
        assert_eq!(
            Rejection::new(Cancel, reason).to_string(),
            "Product is already cancelled"
        );
    }

    #[test]
    fn guard_messages() {
        assert_eq!(
            Rejection::new(Deliver, RejectionReason::NotShippedYet).to_string(),
            "Product is not Shipped yet"
        );
        assert_eq!(
            Rejection::new(Ship, RejectionReason::AlreadyInState(LineStatus::Shipped)).to_string(),
            "Product is already Shipped"
        );
        assert_eq!(
            Rejection::new(Deliver, RejectionReason::AlreadyInState(LineStatus::Delivered))
                .to_string(),
            "Product is already Delivered"
        );
    }
}
