// In crates/market-data/src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The numeric column extracted into the `PriceMatrix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PriceField {
    #[default]
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl PriceField {
    /// The header this field is stored under in the price CSV.
    pub fn header(self) -> &'static str {
        match self {
            PriceField::Open => "Open",
            PriceField::High => "High",
            PriceField::Low => "Low",
            PriceField::Close => "Close",
            PriceField::AdjClose => "Adj Close",
            PriceField::Volume => "Volume",
        }
    }
}

/// Lowercases and drops separators so "Adj Close", "adj_close" and "AdjClose" compare equal.
pub(crate) fn normalize_header(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for PriceField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_header(s).as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            "adjclose" => Ok(PriceField::AdjClose),
            "volume" => Ok(PriceField::Volume),
            _ => Err(Error::UnknownField(s.to_string())),
        }
    }
}

impl TryFrom<String> for PriceField {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PriceField> for String {
    fn from(value: PriceField) -> Self {
        value.header().to_string()
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_names_loosely() {
        assert_eq!("open".parse::<PriceField>().unwrap(), PriceField::Open);
        assert_eq!("Adj Close".parse::<PriceField>().unwrap(), PriceField::AdjClose);
        assert_eq!("adj_close".parse::<PriceField>().unwrap(), PriceField::AdjClose);
        assert!("vwap".parse::<PriceField>().is_err());
    }
}
