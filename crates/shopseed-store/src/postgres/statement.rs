use rust_decimal::Decimal;
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;

use shopseed_core::{FieldValue, Record};

/// Quote an identifier for Postgres (`order` is reserved).
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Build the parameterized insert for a record.
///
/// Keyed tables return the generated key cast to `int8` so it decodes as
/// `i64` whatever the serial width.
pub fn insert_sql(record: &Record) -> String {
    let table = quote_ident(record.entity.table());
    let columns = record
        .columns()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=record.values.len())
        .map(|idx| format!("${idx}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})");
    if let Some(key) = record.entity.key_column() {
        sql.push_str(&format!(" RETURNING {}::int8", quote_ident(key)));
    }
    sql
}

/// Bind every value of `record` to `query`, in column order.
pub fn bind_values<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    record: &Record,
) -> Query<'q, Postgres, PgArguments> {
    for (_, value) in &record.values {
        query = match value {
            FieldValue::Int(value) => query.bind(*value),
            FieldValue::Ref(value) => query.bind(*value),
            FieldValue::Money(value) => query.bind(Decimal::new(value.minor(), 2)),
            FieldValue::Text(value) => query.bind(value.clone()),
            FieldValue::Bool(value) => query.bind(*value),
            FieldValue::Date(value) => query.bind(*value),
            FieldValue::Timestamp(value) => query.bind(*value),
            FieldValue::Json(value) => query.bind(sqlx::types::Json(value.clone())),
        };
    }
    query
}
