use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Type-safe identifier for Customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CustomerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "customer_{}", self.0)
    }
}

/// A postal address.
///
/// The fulfillment provider only accepts a single line of text, so the
/// `Display` impl is the wire form: `street1, [street2, ]city, state postal_code`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street_line_1: String,
    pub street_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Address {
    pub fn new(
        street_line_1: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            street_line_1: street_line_1.into(),
            street_line_2: None,
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
        }
    }

    pub fn with_street_line_2(mut self, line: impl Into<String>) -> Self {
        self.street_line_2 = Some(line.into());
        self
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.street_line_1)?;
        if let Some(line) = self.street_line_2.as_deref().filter(|l| !l.trim().is_empty()) {
            write!(f, ", {}", line)?;
        }
        write!(f, ", {}, {} {}", self.city, self.state, self.postal_code)
    }
}

/// A customer as returned by the customer directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub shipping_address: Address,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        shipping_address: Address,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            shipping_address,
        }
    }
}
