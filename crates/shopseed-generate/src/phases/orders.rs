use chrono::NaiveDateTime;
use rand::seq::IndexedRandom;
use serde_json::json;

use shopseed_core::{
    EntityKind, FieldValue, LineAmounts, Money, OrderAmounts, Record, RecordId, Result, SeedError,
};

use super::{PhaseContext, id, text};
use crate::provider::TextKind;

const ORDER_STATUSES: &[&str] = &[
    "pending",
    "confirmed",
    "processing",
    "shipped",
    "delivered",
    "cancelled",
    "returned",
];
const PAYMENT_METHODS: &[&str] = &["credit_card", "paypal", "bank_transfer", "invoice"];
const PAYMENT_STATUSES: &[&str] = &["completed", "pending", "failed", "refunded"];

pub(super) fn orders(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let config = ctx.config;
    let pricing = &config.pricing;
    let nulls = &config.nulls;
    let mut records = Vec::new();

    for &customer_id in pool.ids(EntityKind::Customer) {
        let count = ctx.draw(config.counts.orders_per_customer);
        for _ in 0..count {
            let subtotal = ctx.draw_money(pricing.order_subtotal);
            let shipping = ctx.draw_money(pricing.shipping_cost);
            let discount = Money(ctx.draw(pricing.order_discount).min(subtotal.minor()));
            let amounts = OrderAmounts::compute(subtotal, shipping, discount, pricing.tax_rate_bps);

            let shipping_address = customer_address(ctx, customer_id, nulls.shipping_address)?;
            let billing_address = customer_address(ctx, customer_id, nulls.billing_address)?;

            records.push(
                Record::new(EntityKind::Order)
                    .with("customer_id", id(customer_id))
                    .with("order_number", text(ctx.fake.token(8)))
                    .with("order_date", FieldValue::Timestamp(ctx.fake.past(30)))
                    .with("status", text(ctx.fake.one_of(ORDER_STATUSES).to_string()))
                    .with("shipping_address_id", FieldValue::Ref(shipping_address))
                    .with("billing_address_id", FieldValue::Ref(billing_address))
                    .with("subtotal", FieldValue::Money(amounts.subtotal))
                    .with("tax_amount", FieldValue::Money(amounts.tax))
                    .with("shipping_cost", FieldValue::Money(amounts.shipping))
                    .with("discount_amount", FieldValue::Money(amounts.discount))
                    .with("total_amount", FieldValue::Money(amounts.total))
                    .with("currency", text(pricing.currency.clone()))
                    .with("notes", text(ctx.fake.text(TextKind::Sentence))),
            );
        }
    }
    Ok(records)
}

/// One of the customer's own addresses, or `None` with `null_probability`.
///
/// Falls back to any address when the customer has none of their own.
fn customer_address(
    ctx: &mut PhaseContext<'_>,
    customer_id: RecordId,
    null_probability: f64,
) -> Result<Option<RecordId>> {
    let pool = ctx.pool;
    let ledger = ctx.ledger;
    let owned: Vec<RecordId> = pool
        .ids(EntityKind::Address)
        .iter()
        .copied()
        .filter(|&address_id| {
            ledger
                .lookup_parent(EntityKind::Address, address_id, "customer_id")
                .and_then(FieldValue::as_ref_id)
                == Some(customer_id)
        })
        .collect();

    if owned.is_empty() {
        return Ok(ctx.pick_or_null(EntityKind::Address, null_probability));
    }
    if ctx.fake.boolean(null_probability) {
        return Ok(None);
    }
    Ok(owned.choose(&mut *ctx.rng).copied())
}

pub(super) fn order_items(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let config = ctx.config;
    let pricing = &config.pricing;
    let mut records = Vec::new();

    for &order_id in pool.ids(EntityKind::Order) {
        let count = ctx.draw(config.counts.items_per_order);
        for _ in 0..count {
            let variant_id = ctx.pick(EntityKind::ProductVariant)?;
            let warranty_id = ctx.pick_or_null(EntityKind::Warranty, config.nulls.warranty);
            let quantity = ctx.draw(pricing.quantity);
            let unit_price = ctx.draw_money(pricing.unit_price);
            let line_subtotal = unit_price.minor() * quantity;
            let discount = Money(ctx.draw(pricing.line_discount).min(line_subtotal));
            let amounts = LineAmounts::compute(unit_price, quantity, discount, pricing.tax_rate_bps);

            records.push(
                Record::new(EntityKind::OrderItem)
                    .with("order_id", id(order_id))
                    .with("product_variant_id", id(variant_id))
                    .with("quantity", FieldValue::Int(amounts.quantity))
                    .with("unit_price", FieldValue::Money(amounts.unit_price))
                    .with("discount_amount", FieldValue::Money(amounts.discount))
                    .with("tax_amount", FieldValue::Money(amounts.tax))
                    .with("total_price", FieldValue::Money(amounts.total))
                    .with("warranty_id", FieldValue::Ref(warranty_id)),
            );
        }
    }
    Ok(records)
}

/// One payment per order, for exactly the order total.
pub(super) fn payments(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();

    for &order_id in pool.ids(EntityKind::Order) {
        let amount = order_money(ctx, order_id, "total_amount")?;
        let paid_at = order_date(ctx, order_id)?;
        let status = ctx.fake.one_of(PAYMENT_STATUSES);

        records.push(
            Record::new(EntityKind::Payment)
                .with("order_id", id(order_id))
                .with("payment_method", text(ctx.fake.one_of(PAYMENT_METHODS).to_string()))
                .with("transaction_id", text(ctx.fake.token(10)))
                .with("amount", FieldValue::Money(amount))
                .with("currency", text(ctx.config.pricing.currency.clone()))
                .with("status", text(status.to_string()))
                .with("payment_date", FieldValue::Timestamp(paid_at))
                .with(
                    "gateway_response",
                    FieldValue::Json(json!({
                        "status": status,
                        "authorization_code": ctx.fake.token(6),
                    })),
                ),
        );
    }
    Ok(records)
}

/// Applies coupons to orders; the discount is derived from the coupon terms.
///
/// Coupons whose minimum purchase exceeds the order subtotal are still
/// offered to the store, which rejects them as a business rule.
pub(super) fn order_coupons(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();

    for &order_id in pool.ids(EntityKind::Order) {
        let count = ctx.draw(ctx.config.counts.coupons_per_order);
        for _ in 0..count {
            let coupon_id = ctx.pick(EntityKind::Coupon)?;
            let subtotal = order_money(ctx, order_id, "subtotal")?;
            let applied = coupon_discount(ctx, coupon_id, subtotal)?;
            let applied_at = order_date(ctx, order_id)?;

            records.push(
                Record::new(EntityKind::OrderCoupon)
                    .with("order_id", id(order_id))
                    .with("coupon_id", id(coupon_id))
                    .with("discount_applied", FieldValue::Money(applied))
                    .with("applied_at", FieldValue::Timestamp(applied_at)),
            );
        }
    }
    Ok(records)
}

fn coupon_discount(ctx: &PhaseContext<'_>, coupon_id: RecordId, subtotal: Money) -> Result<Money> {
    let missing = |column| SeedError::MissingParentField {
        entity: EntityKind::Coupon,
        id: coupon_id,
        column,
    };
    let kind = ctx
        .parent(EntityKind::Coupon, coupon_id, "discount_type")?
        .as_str()
        .ok_or_else(|| missing("discount_type"))?;
    let value = ctx
        .parent(EntityKind::Coupon, coupon_id, "discount_value")?
        .as_i64()
        .ok_or_else(|| missing("discount_value"))?;

    let discount = match kind {
        "percentage" => subtotal.minor() * value / 100,
        _ => value * 100,
    };
    Ok(Money(discount.min(subtotal.minor())))
}

fn order_money(ctx: &PhaseContext<'_>, order_id: RecordId, column: &'static str) -> Result<Money> {
    ctx.parent(EntityKind::Order, order_id, column)?
        .as_money()
        .ok_or(SeedError::MissingParentField {
            entity: EntityKind::Order,
            id: order_id,
            column,
        })
}

fn order_date(ctx: &PhaseContext<'_>, order_id: RecordId) -> Result<NaiveDateTime> {
    ctx.parent(EntityKind::Order, order_id, "order_date")?
        .as_timestamp()
        .ok_or(SeedError::MissingParentField {
            entity: EntityKind::Order,
            id: order_id,
            column: "order_date",
        })
}
