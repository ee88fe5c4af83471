use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// Primary key returned by the store.
pub type RecordId = i64;

/// Monetary amount in the currency's smallest unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn minor(self) -> i64 {
        self.0
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

/// Value bound to one column of an insert.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    /// Foreign key; `None` binds SQL `NULL`.
    Ref(Option<RecordId>),
    Money(Money),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Json(serde_json::Value),
}

impl FieldValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            FieldValue::Ref(value) => *value,
            _ => None,
        }
    }

    pub fn as_ref_id(&self) -> Option<RecordId> {
        match self {
            FieldValue::Ref(value) => *value,
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<Money> {
        match self {
            FieldValue::Money(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Timestamp(value) => Some(*value),
            _ => None,
        }
    }
}

/// One creation request: the columns and values of a single row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entity: EntityKind,
    pub values: Vec<(&'static str, FieldValue)>,
}

impl Record {
    pub fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            values: Vec::new(),
        }
    }

    pub fn with(mut self, column: &'static str, value: FieldValue) -> Self {
        self.values.push((column, value));
        self
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.iter().map(|(name, _)| *name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_formats_minor_units() {
        assert_eq!(Money(12345).to_string(), "123.45");
        assert_eq!(Money(7).to_string(), "0.07");
        assert_eq!(Money(-250).to_string(), "-2.50");
    }

    #[test]
    fn record_lookup_by_column() {
        let record = Record::new(EntityKind::Payment)
            .with("order_id", FieldValue::Ref(Some(3)))
            .with("amount", FieldValue::Money(Money(990)));
        assert_eq!(record.get("order_id").and_then(FieldValue::as_ref_id), Some(3));
        assert_eq!(record.get("amount").and_then(FieldValue::as_money), Some(Money(990)));
        assert!(record.get("currency").is_none());
    }
}
