use std::collections::{BTreeMap, HashMap};

use crate::entity::EntityKind;
use crate::value::{FieldValue, Record, RecordId};

/// Column values of inserted rows, keyed by entity and primary key.
///
/// Lets a later phase read a parent's column (an order's total, a coupon's
/// minimum purchase) without a round trip to the store. Append-only.
#[derive(Debug, Default)]
pub struct RecordLedger {
    rows_by_id: BTreeMap<EntityKind, HashMap<RecordId, Record>>,
}

impl RecordLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, id: RecordId, record: Record) {
        self.rows_by_id
            .entry(record.entity)
            .or_default()
            .entry(id)
            .or_insert(record);
    }

    pub fn row(&self, entity: EntityKind, id: RecordId) -> Option<&Record> {
        self.rows_by_id.get(&entity)?.get(&id)
    }

    pub fn lookup_parent(
        &self,
        entity: EntityKind,
        id: RecordId,
        column: &str,
    ) -> Option<&FieldValue> {
        self.row(entity, id)?.get(column)
    }

    pub fn len(&self, entity: EntityKind) -> usize {
        self.rows_by_id.get(&entity).map(HashMap::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Money;

    #[test]
    fn looks_up_parent_column() {
        let mut ledger = RecordLedger::new();
        ledger.ingest(
            42,
            Record::new(EntityKind::Order).with("total_amount", FieldValue::Money(Money(1234))),
        );

        let total = ledger
            .lookup_parent(EntityKind::Order, 42, "total_amount")
            .and_then(FieldValue::as_money);
        assert_eq!(total, Some(Money(1234)));
        assert!(ledger.lookup_parent(EntityKind::Order, 43, "total_amount").is_none());
        assert!(ledger.lookup_parent(EntityKind::Coupon, 42, "total_amount").is_none());
    }

    #[test]
    fn first_ingest_wins() {
        let mut ledger = RecordLedger::new();
        ledger.ingest(1, Record::new(EntityKind::Brand).with("name", FieldValue::Text("a".into())));
        ledger.ingest(1, Record::new(EntityKind::Brand).with("name", FieldValue::Text("b".into())));
        assert_eq!(
            ledger
                .lookup_parent(EntityKind::Brand, 1, "name")
                .and_then(FieldValue::as_str),
            Some("a")
        );
        assert_eq!(ledger.len(EntityKind::Brand), 1);
    }
}
