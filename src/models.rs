use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Direction of the money movement, stored under the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sending,
    Receiving,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Sending, Direction::Receiving];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sending => "sending",
            Direction::Receiving => "receiving",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction '{0}'")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sending" => Ok(Direction::Sending),
            "receiving" => Ok(Direction::Receiving),
            other => Err(UnknownDirection(other.to_string())),
        }
    }
}

/// An accepted ledger record. This is both the document written to the vault
/// and the element of `/api/get` responses.
///
/// Deserialization ignores unknown fields so that vault metadata such as `_id`
/// does not break decoding of stored documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub number: String,
    pub name: String,
    pub iban: String,
    pub address: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub direction: Direction,
}

/// Raw `/api/add` payload, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountDraft {
    pub number: String,
    pub name: String,
    pub iban: String,
    pub address: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub direction: String,
}

/// Raw `/api/get` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AccountQuery {
    pub number: String,
    #[serde(rename = "type")]
    pub direction: String,
}

/// The single lookup mode a read request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Number(String),
    Direction(Direction),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("query has neither number nor type")]
    Empty,
    #[error(transparent)]
    Direction(#[from] UnknownDirection),
}

impl AccountQuery {
    /// A non-empty `number` takes priority over `type`.
    pub fn selector(&self) -> Result<Selector, SelectorError> {
        if !self.number.is_empty() {
            return Ok(Selector::Number(self.number.clone()));
        }
        if !self.direction.is_empty() {
            return Ok(Selector::Direction(self.direction.parse()?));
        }
        Err(SelectorError::Empty)
    }
}
