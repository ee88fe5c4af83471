use shopseed_core::{EntityKind, FieldValue, Money, Record, Result};

use super::{PhaseContext, id, text};
use crate::provider::TextKind;

const ADDRESS_TYPES: &[&str] = &["shipping", "billing", "both"];
const DISCOUNT_TYPES: &[&str] = &["percentage", "fixed_amount"];
const WISHLIST_NAMES: &[&str] = &["Favorites", "Birthday", "Holiday", "Someday", "Gift Ideas"];

pub(super) fn coupons(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for _ in 0..ctx.config.counts.coupons {
        let discount_type = ctx.fake.one_of(DISCOUNT_TYPES);
        let discount_value = ctx.fake.int(5, 50);
        records.push(
            Record::new(EntityKind::Coupon)
                .with("code", text(ctx.fake.token(6)))
                .with("description", text(ctx.fake.text(TextKind::Sentence)))
                .with("discount_type", text(discount_type.to_string()))
                .with("discount_value", FieldValue::Int(discount_value))
                .with(
                    "minimum_purchase",
                    FieldValue::Money(ctx.fake.money(Money(2_000), Money(20_000))),
                )
                .with("valid_from", FieldValue::Timestamp(ctx.fake.past(365)))
                .with("valid_until", FieldValue::Timestamp(ctx.fake.future(365)))
                .with("usage_limit", FieldValue::Int(ctx.fake.int(10, 100)))
                .with("times_used", FieldValue::Int(0))
                .with("is_active", FieldValue::Bool(true)),
        );
    }
    Ok(records)
}

pub(super) fn customers(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for _ in 0..ctx.config.counts.customers {
        records.push(
            Record::new(EntityKind::Customer)
                .with("email", text(ctx.fake.text(TextKind::Email)))
                .with("password", text(ctx.fake.text(TextKind::Password)))
                .with("first_name", text(ctx.fake.text(TextKind::FirstName)))
                .with("last_name", text(ctx.fake.text(TextKind::LastName)))
                .with("phone_number", text(ctx.fake.text(TextKind::Phone)))
                .with("date_of_birth", FieldValue::Date(ctx.fake.birthdate(18, 70)))
                .with("created_at", FieldValue::Timestamp(ctx.fake.past(730))),
        );
    }
    Ok(records)
}

/// The first address of each customer is their default.
pub(super) fn addresses(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &customer_id in pool.ids(EntityKind::Customer) {
        let count = ctx.draw(ctx.config.counts.addresses_per_customer);
        for position in 0..count {
            records.push(
                Record::new(EntityKind::Address)
                    .with("customer_id", id(customer_id))
                    .with("address_type", text(ctx.fake.one_of(ADDRESS_TYPES).to_string()))
                    .with("recipient_name", text(ctx.fake.text(TextKind::FullName)))
                    .with("street_address", text(ctx.fake.text(TextKind::StreetAddress)))
                    .with("city", text(ctx.fake.text(TextKind::City)))
                    .with("state_province", text(ctx.fake.text(TextKind::State)))
                    .with("postal_code", text(ctx.fake.text(TextKind::PostalCode)))
                    .with("country", text(ctx.fake.text(TextKind::Country)))
                    .with("phone", text(ctx.fake.text(TextKind::Phone)))
                    .with("is_default", FieldValue::Bool(position == 0)),
            );
        }
    }
    Ok(records)
}

pub(super) fn reviews(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for _ in 0..ctx.config.counts.reviews {
        let product_id = ctx.pick(EntityKind::Product)?;
        let customer_id = ctx.pick(EntityKind::Customer)?;
        let created_at = ctx.fake.past(180);
        records.push(
            Record::new(EntityKind::Review)
                .with("product_id", id(product_id))
                .with("customer_id", id(customer_id))
                .with("order_item_id", FieldValue::Ref(None))
                .with("rating", FieldValue::Int(ctx.fake.int(1, 5)))
                .with("title", text(ctx.fake.text(TextKind::Sentence)))
                .with("comment", text(ctx.fake.text(TextKind::Paragraph)))
                .with("is_verified_purchase", FieldValue::Bool(ctx.fake.boolean(0.5)))
                .with("helpful_count", FieldValue::Int(ctx.fake.int(0, 50)))
                .with("created_at", FieldValue::Timestamp(created_at))
                .with("updated_at", FieldValue::Timestamp(created_at)),
        );
    }
    Ok(records)
}

pub(super) fn cart_items(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &customer_id in pool.ids(EntityKind::Customer) {
        let count = ctx.draw(ctx.config.counts.cart_items_per_customer);
        for _ in 0..count {
            let variant_id = ctx.pick(EntityKind::ProductVariant)?;
            records.push(
                Record::new(EntityKind::CartItem)
                    .with("customer_id", id(customer_id))
                    .with("product_variant_id", id(variant_id))
                    .with("quantity", FieldValue::Int(ctx.draw(ctx.config.pricing.quantity)))
                    .with("added_date", FieldValue::Timestamp(ctx.fake.past(30))),
            );
        }
    }
    Ok(records)
}

pub(super) fn wishlists(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &customer_id in pool.ids(EntityKind::Customer) {
        let count = ctx.draw(ctx.config.counts.wishlists_per_customer);
        for _ in 0..count {
            records.push(
                Record::new(EntityKind::Wishlist)
                    .with("customer_id", id(customer_id))
                    .with("name", text(ctx.fake.one_of(WISHLIST_NAMES).to_string()))
                    .with("is_public", FieldValue::Bool(ctx.fake.boolean(0.3)))
                    .with("created_at", FieldValue::Timestamp(ctx.fake.past(365))),
            );
        }
    }
    Ok(records)
}

pub(super) fn customer_coupons(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &customer_id in pool.ids(EntityKind::Customer) {
        let count = ctx.draw(ctx.config.counts.coupons_per_customer);
        for _ in 0..count {
            let coupon_id = ctx.pick(EntityKind::Coupon)?;
            records.push(
                Record::new(EntityKind::CustomerCoupon)
                    .with("customer_id", id(customer_id))
                    .with("coupon_id", id(coupon_id))
                    .with("used_date", FieldValue::Timestamp(ctx.fake.past(90)))
                    .with("order_id", FieldValue::Ref(None)),
            );
        }
    }
    Ok(records)
}

pub(super) fn wishlist_products(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &wishlist_id in pool.ids(EntityKind::Wishlist) {
        let count = ctx.draw(ctx.config.counts.products_per_wishlist);
        for _ in 0..count {
            let product_id = ctx.pick(EntityKind::Product)?;
            records.push(
                Record::new(EntityKind::WishlistProduct)
                    .with("wishlist_id", id(wishlist_id))
                    .with("product_id", id(product_id))
                    .with("added_date", FieldValue::Timestamp(ctx.fake.past(180))),
            );
        }
    }
    Ok(records)
}
