//! Product line status lifecycle and the transition table.

use serde::{Deserialize, Serialize};

use crate::rejection::RejectionReason;

/// Fulfillment status of one product line.
///
/// `Placed -> Shipped -> Delivered`, with `CancelledByPlatform` and
/// `ReturnApproved` as absorbing states. The serde names are the strings stored
/// in order documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineStatus {
    #[serde(rename = "Order Placed")]
    Placed,
    #[serde(rename = "Order Shipped")]
    Shipped,
    #[serde(rename = "Order Delivered")]
    Delivered,
    #[serde(rename = "Cancelled by Platform")]
    CancelledByPlatform,
    #[serde(rename = "Return Approved")]
    ReturnApproved,
}

impl LineStatus {
    pub const ALL: [LineStatus; 5] = [
        LineStatus::Placed,
        LineStatus::Shipped,
        LineStatus::Delivered,
        LineStatus::CancelledByPlatform,
        LineStatus::ReturnApproved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LineStatus::Placed => "Order Placed",
            LineStatus::Shipped => "Order Shipped",
            LineStatus::Delivered => "Order Delivered",
            LineStatus::CancelledByPlatform => "Cancelled by Platform",
            LineStatus::ReturnApproved => "Return Approved",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LineStatus::CancelledByPlatform | LineStatus::ReturnApproved
        )
    }
}

impl core::fmt::Display for LineStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin-initiated status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusAction {
    Ship,
    Deliver,
    Cancel,
    ApproveReturn,
}

impl StatusAction {
    pub const ALL: [StatusAction; 4] = [
        StatusAction::Ship,
        StatusAction::Deliver,
        StatusAction::Cancel,
        StatusAction::ApproveReturn,
    ];

    /// Acknowledgement returned when the change is applied.
    pub fn success_message(self) -> &'static str {
        match self {
            StatusAction::Ship => "Order status updated to Shipped successfully",
            StatusAction::Deliver => "Order status updated to Delivered successfully",
            StatusAction::Cancel => "Order status updated to Cancelled successfully",
            StatusAction::ApproveReturn => "Product approved successfully.",
        }
    }
}

impl core::fmt::Display for StatusAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            StatusAction::Ship => "ship",
            StatusAction::Deliver => "deliver",
            StatusAction::Cancel => "cancel",
            StatusAction::ApproveReturn => "approve_return",
        })
    }
}

/// Which guard set the transition table enforces.
///
/// `Baseline` keeps the historical rules, including three known gaps:
/// a `ReturnApproved` line can be shipped or delivered again, cancellation does
/// not block `Delivered`/`ReturnApproved` lines, and return approval has no
/// prior-state guard. `Strict` closes all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    #[default]
    Baseline,
    Strict,
}

/// The transition table: `(current, action) -> next | rejected`.
pub fn transition(
    policy: TransitionPolicy,
    current: LineStatus,
    action: StatusAction,
) -> Result<LineStatus, RejectionReason> {
    use LineStatus::*;
    use RejectionReason::{AlreadyInState, NotDeliveredYet, NotShippedYet};
    use StatusAction::*;
    use TransitionPolicy::*;

    match (action, current) {
        (Ship, Placed) => Ok(Shipped),
        (Ship, Shipped) => Err(AlreadyInState(Shipped)),
        (Ship, Delivered) => Err(AlreadyInState(Delivered)),
        (Ship, CancelledByPlatform) => Err(AlreadyInState(CancelledByPlatform)),
        (Ship, ReturnApproved) => match policy {
            Baseline => Ok(Shipped),
            Strict => Err(AlreadyInState(ReturnApproved)),
        },

        (Deliver, Placed) => Err(NotShippedYet),
        (Deliver, Shipped) => Ok(Delivered),
        (Deliver, Delivered) => Err(AlreadyInState(Delivered)),
        (Deliver, CancelledByPlatform) => Err(AlreadyInState(CancelledByPlatform)),
        (Deliver, ReturnApproved) => match policy {
            Baseline => Ok(Delivered),
            Strict => Err(AlreadyInState(ReturnApproved)),
        },

        (Cancel, Placed) | (Cancel, Shipped) => Ok(CancelledByPlatform),
        (Cancel, CancelledByPlatform) => Err(AlreadyInState(CancelledByPlatform)),
        (Cancel, Delivered) | (Cancel, ReturnApproved) => match policy {
            Baseline => Ok(CancelledByPlatform),
            Strict => Err(AlreadyInState(current)),
        },

        (ApproveReturn, Delivered) => Ok(ReturnApproved),
        (ApproveReturn, _) if policy == Baseline => Ok(ReturnApproved),
        (ApproveReturn, Placed) | (ApproveReturn, Shipped) => Err(NotDeliveredYet),
        (ApproveReturn, CancelledByPlatform) | (ApproveReturn, ReturnApproved) => {
            Err(AlreadyInState(current))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use LineStatus::*;
    use RejectionReason::*;
    use StatusAction::*;

    fn baseline(current: LineStatus, action: StatusAction) -> Result<LineStatus, RejectionReason> {
        transition(TransitionPolicy::Baseline, current, action)
    }

    fn strict(current: LineStatus, action: StatusAction) -> Result<LineStatus, RejectionReason> {
        transition(TransitionPolicy::Strict, current, action)
    }

    #[test]
    fn baseline_table_matches_documented_rules() {
        let expected: [(StatusAction, LineStatus, Result<LineStatus, RejectionReason>); 20] = [
            (Ship, Placed, Ok(Shipped)),
            (Ship, Shipped, Err(AlreadyInState(Shipped))),
            (Ship, Delivered, Err(AlreadyInState(Delivered))),
            (Ship, CancelledByPlatform, Err(AlreadyInState(CancelledByPlatform))),
            (Ship, ReturnApproved, Ok(Shipped)),
            (Deliver, Placed, Err(NotShippedYet)),
            (Deliver, Shipped, Ok(Delivered)),
            (Deliver, Delivered, Err(AlreadyInState(Delivered))),
            (Deliver, CancelledByPlatform, Err(AlreadyInState(CancelledByPlatform))),
            (Deliver, ReturnApproved, Ok(Delivered)),
            (Cancel, Placed, Ok(CancelledByPlatform)),
            (Cancel, Shipped, Ok(CancelledByPlatform)),
            (Cancel, Delivered, Ok(CancelledByPlatform)),
            (Cancel, CancelledByPlatform, Err(AlreadyInState(CancelledByPlatform))),
            (Cancel, ReturnApproved, Ok(CancelledByPlatform)),
            (ApproveReturn, Placed, Ok(ReturnApproved)),
            (ApproveReturn, Shipped, Ok(ReturnApproved)),
            (ApproveReturn, Delivered, Ok(ReturnApproved)),
            (ApproveReturn, CancelledByPlatform, Ok(ReturnApproved)),
            (ApproveReturn, ReturnApproved, Ok(ReturnApproved)),
        ];

        for (action, current, outcome) in expected {
            assert_eq!(baseline(current, action), outcome, "{action} from {current}");
        }
    }

    #[test]
    fn strict_table_closes_known_gaps() {
        let expected: [(StatusAction, LineStatus, Result<LineStatus, RejectionReason>); 20] = [
            (Ship, Placed, Ok(Shipped)),
            (Ship, Shipped, Err(AlreadyInState(Shipped))),
            (Ship, Delivered, Err(AlreadyInState(Delivered))),
            (Ship, CancelledByPlatform, Err(AlreadyInState(CancelledByPlatform))),
            (Ship, ReturnApproved, Err(AlreadyInState(ReturnApproved))),
            (Deliver, Placed, Err(NotShippedYet)),
            (Deliver, Shipped, Ok(Delivered)),
            (Deliver, Delivered, Err(AlreadyInState(Delivered))),
            (Deliver, CancelledByPlatform, Err(AlreadyInState(CancelledByPlatform))),
            (Deliver, ReturnApproved, Err(AlreadyInState(ReturnApproved))),
            (Cancel, Placed, Ok(CancelledByPlatform)),
            (Cancel, Shipped, Ok(CancelledByPlatform)),
            (Cancel, Delivered, Err(AlreadyInState(Delivered))),
            (Cancel, CancelledByPlatform, Err(AlreadyInState(CancelledByPlatform))),
            (Cancel, ReturnApproved, Err(AlreadyInState(ReturnApproved))),
            (ApproveReturn, Placed, Err(NotDeliveredYet)),
            (ApproveReturn, Shipped, Err(NotDeliveredYet)),
            (ApproveReturn, Delivered, Ok(ReturnApproved)),
            (ApproveReturn, CancelledByPlatform, Err(AlreadyInState(CancelledByPlatform))),
            (ApproveReturn, ReturnApproved, Err(AlreadyInState(ReturnApproved))),
        ];

        for (action, current, outcome) in expected {
            assert_eq!(strict(current, action), outcome, "{action} from {current}");
        }
    }

    // Known gap: a line whose return was approved can re-enter shipping.
    #[test]
    fn baseline_lets_returned_lines_move_again() {
        assert_eq!(baseline(ReturnApproved, Ship), Ok(Shipped));
        assert_eq!(baseline(ReturnApproved, Deliver), Ok(Delivered));
        assert_eq!(baseline(ReturnApproved, Cancel), Ok(CancelledByPlatform));
    }

    #[test]
    fn status_strings_round_trip_through_serde() {
        for status in LineStatus::ALL {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.as_str().to_string()));
        }
    }

    fn any_status() -> impl Strategy<Value = LineStatus> {
        prop::sample::select(LineStatus::ALL.to_vec())
    }

    fn any_action() -> impl Strategy<Value = StatusAction> {
        prop::sample::select(StatusAction::ALL.to_vec())
    }

    fn any_policy() -> impl Strategy<Value = TransitionPolicy> {
        prop::sample::select(vec![TransitionPolicy::Baseline, TransitionPolicy::Strict])
    }

    proptest! {
        #[test]
        fn cancelled_lines_only_leave_through_return_approval(
            policy in any_policy(),
            action in any_action(),
        ) {
            let outcome = transition(policy, CancelledByPlatform, action);
            if outcome.is_ok() {
                prop_assert_eq!(policy, TransitionPolicy::Baseline);
                prop_assert_eq!(action, ApproveReturn);
            }
        }

        #[test]
        fn accepted_transitions_land_on_the_action_target(
            policy in any_policy(),
            current in any_status(),
            action in any_action(),
        ) {
            if let Ok(next) = transition(policy, current, action) {
                let target = match action {
                    Ship => Shipped,
                    Deliver => Delivered,
                    Cancel => CancelledByPlatform,
                    ApproveReturn => ReturnApproved,
                };
                prop_assert_eq!(next, target);
            }
        }

        #[test]
        fn strict_never_leaves_a_terminal_state(
            current in any_status(),
            action in any_action(),
        ) {
            if current.is_terminal() {
                prop_assert!(strict(current, action).is_err());
            }
        }

        #[test]
        fn strict_accepts_a_subset_of_baseline(
            current in any_status(),
            action in any_action(),
        ) {
            if strict(current, action).is_ok() {
                prop_assert_eq!(strict(current, action), baseline(current, action));
            }
        }
    }
}
