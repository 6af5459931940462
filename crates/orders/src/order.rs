use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderdesk_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Entity, UserId};

use crate::ids::{LineId, OrderId, ProductId};
use crate::rejection::{Rejection, RejectionReason};
use crate::status::{LineStatus, StatusAction, TransitionPolicy, transition};

/// One purchased item inside an order, with its own fulfillment status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    pub id: LineId,
    pub product_id: ProductId,
    pub status: LineStatus,
    pub quantity: u32,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
}

impl ProductLine {
    /// A freshly placed line.
    pub fn placed(product_id: ProductId, quantity: u32, price: u64) -> Self {
        Self {
            id: LineId::generate(),
            product_id,
            status: LineStatus::Placed,
            quantity,
            price,
        }
    }
}

impl Entity for ProductLine {
    type Id = LineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Aggregate root: Order.
///
/// Loaded and persisted as one document together with its product lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    date: DateTime<Utc>,
    lines: Vec<ProductLine>,
    #[serde(default)]
    version: u64,
}

impl Order {
    /// Build an order document. Line ids must be unique within the order.
    pub fn new(
        id: OrderId,
        user_id: UserId,
        date: DateTime<Utc>,
        lines: Vec<ProductLine>,
    ) -> DomainResult<Self> {
        for (i, line) in lines.iter().enumerate() {
            if lines[..i].iter().any(|other| other.id == line.id) {
                return Err(DomainError::validation(format!(
                    "duplicate product line id {} in order {id}",
                    line.id
                )));
            }
        }

        Ok(Self {
            id,
            user_id,
            date,
            lines,
            version: 0,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn lines(&self) -> &[ProductLine] {
        &self.lines
    }

    pub fn line(&self, line_id: LineId) -> Option<&ProductLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    /// Sum of `price * quantity` over all lines.
    pub fn total_amount(&self) -> u64 {
        self.lines
            .iter()
            .map(|l| l.price.saturating_mul(u64::from(l.quantity)))
            .sum()
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: change the status of one product line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCommand {
    pub order_id: OrderId,
    /// `None` when the submitted line reference was not a valid identifier.
    pub line_id: Option<LineId>,
    pub action: StatusAction,
    pub policy: TransitionPolicy,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    ChangeLineStatus(StatusCommand),
}

/// Event: LineStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStatusChanged {
    pub order_id: OrderId,
    pub line_id: LineId,
    pub action: StatusAction,
    pub from: LineStatus,
    pub to: LineStatus,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    LineStatusChanged(LineStatusChanged),
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = Rejection;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::LineStatusChanged(e) => {
                if let Some(line) = self.lines.iter_mut().find(|l| l.id == e.line_id) {
                    line.status = e.to;
                }
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::ChangeLineStatus(cmd) => self.handle_change_status(cmd),
        }
    }
}

impl Order {
    fn handle_change_status(&self, cmd: &StatusCommand) -> Result<Vec<OrderEvent>, Rejection> {
        if cmd.order_id != self.id {
            return Err(Rejection::order_not_found(cmd.action));
        }

        // Return approval reports an order without lines as a missing order.
        if cmd.action == StatusAction::ApproveReturn && self.lines.is_empty() {
            return Err(Rejection::order_not_found(cmd.action));
        }

        let line = cmd
            .line_id
            .and_then(|id| self.line(id))
            .ok_or_else(|| Rejection::line_not_found(cmd.action))?;

        let next = transition(cmd.policy, line.status, cmd.action)
            .map_err(|reason: RejectionReason| Rejection::new(cmd.action, reason))?;

        Ok(vec![OrderEvent::LineStatusChanged(LineStatusChanged {
            order_id: self.id,
            line_id: line.id,
            action: cmd.action,
            from: line.status,
            to: next,
            occurred_at: cmd.occurred_at,
        })])
    }
}
