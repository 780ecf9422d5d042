use thiserror::Error;

use crate::models::{Account, AccountDraft, Direction};

const IBAN_MIN_LEN: usize = 15;
const IBAN_MAX_LEN: usize = 34;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid account number")]
    Number,
    #[error("invalid account name")]
    Name,
    #[error("invalid address")]
    Address,
    #[error("amount {0} is out of bounds")]
    Amount(f64),
    #[error("invalid iban '{0}'")]
    Iban(String),
    #[error("invalid type '{0}'")]
    Direction(String),
}

/// Optional inclusive limits applied to `amount`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmountBounds {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// Checks the IBAN length, country code and mod-97 checksum.
///
/// Spaces are ignored and ASCII letters are case-insensitive. Anything outside
/// ASCII fails.
pub fn validate_iban(iban: &str) -> bool {
    if !iban.is_ascii() || iban.len() < IBAN_MIN_LEN || iban.len() > IBAN_MAX_LEN {
        return false;
    }

    let normalized: Vec<u8> = iban
        .bytes()
        .filter(|b| *b != b' ')
        .map(|b| b.to_ascii_uppercase())
        .collect();

    if normalized.len() <= 4 {
        return false;
    }
    if !normalized[..2].iter().all(u8::is_ascii_uppercase) {
        return false;
    }

    let rearranged = normalized[4..].iter().chain(&normalized[..4]);
    let mut remainder = 0u32;
    for &b in rearranged {
        let value = match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            b'A'..=b'Z' => u32::from(b - b'A') + 10,
            _ => return false,
        };
        // letters expand to two decimal digits
        if value >= 10 {
            remainder = (remainder * 10 + value / 10) % 97;
            remainder = (remainder * 10 + value % 10) % 97;
        } else {
            remainder = (remainder * 10 + value) % 97;
        }
    }
    remainder == 1
}

// The number, name and address checks are intentionally permissive for now.
pub fn validate_number(_number: &str) -> bool {
    true
}

pub fn validate_name(_name: &str) -> bool {
    true
}

pub fn validate_address(_address: &str) -> bool {
    true
}

pub fn validate_amount(amount: f64, bounds: &AmountBounds) -> bool {
    if bounds.lower.is_none() && bounds.upper.is_none() {
        return true;
    }
    if amount.is_nan() {
        return false;
    }
    bounds.lower.map_or(true, |lower| amount >= lower)
        && bounds.upper.map_or(true, |upper| amount <= upper)
}

pub fn validate_direction(direction: &str) -> Option<Direction> {
    direction.parse().ok()
}

/// Runs every field check and turns the draft into an [`Account`].
pub fn validate_account(
    draft: AccountDraft,
    bounds: &AmountBounds,
) -> Result<Account, ValidationError> {
    if !validate_iban(&draft.iban) {
        return Err(ValidationError::Iban(draft.iban));
    }
    if !validate_number(&draft.number) {
        return Err(ValidationError::Number);
    }
    if !validate_name(&draft.name) {
        return Err(ValidationError::Name);
    }
    if !validate_address(&draft.address) {
        return Err(ValidationError::Address);
    }
    if !validate_amount(draft.amount, bounds) {
        return Err(ValidationError::Amount(draft.amount));
    }
    let direction = validate_direction(&draft.direction)
        .ok_or_else(|| ValidationError::Direction(draft.direction.clone()))?;

    Ok(Account {
        number: draft.number,
        name: draft.name,
        iban: draft.iban,
        address: draft.address,
        amount: draft.amount,
        direction,
    })
}
