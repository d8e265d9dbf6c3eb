use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

// Long enough for listed tickers with class suffixes ("BRK.B") while
// rejecting obviously pasted garbage.
const MAX_TICKER_LEN: usize = 10;

/// Watchlist key: an uppercase exchange ticker.
///
/// Input is trimmed and uppercased before validation, so `" aapl "` and
/// `"AAPL"` name the same watchlist entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let candidate = input.trim().to_ascii_uppercase();
        if candidate.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let mut len = 0usize;
        for (index, ch) in candidate.chars().enumerate() {
            len += 1;
            if index == 0 && !ch.is_ascii_uppercase() {
                return Err(ValidationError::SymbolInvalidStart { ch });
            }
            let tail_ok = ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '.' || ch == '-';
            if index > 0 && !tail_ok {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        if len > MAX_TICKER_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_TICKER_LEN,
            });
        }

        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
