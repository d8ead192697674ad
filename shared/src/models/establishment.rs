//! Establishment Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a retail location in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EstablishmentId(pub i64);

impl EstablishmentId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EstablishmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EstablishmentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for EstablishmentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Establishment entry as listed by the enterprise endpoint (`fields=name,id`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Establishment {
    pub name: String,
    pub id: EstablishmentId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_from_cli_text() {
        assert_eq!("42".parse::<EstablishmentId>().unwrap(), EstablishmentId(42));
        assert_eq!(" 7 ".parse::<EstablishmentId>().unwrap(), EstablishmentId(7));
        assert!("seven".parse::<EstablishmentId>().is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&EstablishmentId(12)).unwrap();
        assert_eq!(json, "12");
    }
}
