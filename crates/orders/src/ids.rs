//! Order-domain identifiers (newtypes over `AggregateId`).

use serde::{Deserialize, Serialize};

use orderdesk_core::AggregateId;

macro_rules! aggregate_newtype {
    ($(#[$meta:meta])* $t:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(pub AggregateId);

        impl $t {
            pub fn new(id: AggregateId) -> Self {
                Self(id)
            }

            /// Fresh identifier, for seeding and tests.
            pub fn generate() -> Self {
                Self(AggregateId::new())
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl core::str::FromStr for $t {
            type Err = orderdesk_core::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<AggregateId>().map(Self)
            }
        }
    };
}

aggregate_newtype!(
    /// Order identifier.
    OrderId
);
aggregate_newtype!(
    /// Identifier of a product line embedded in an order.
    LineId
);
aggregate_newtype!(
    /// Catalog product identifier.
    ProductId
);
aggregate_newtype!(
    /// Promotional offer identifier.
    OfferId
);
