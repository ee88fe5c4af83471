use serde_json::json;

use shopseed_core::{EntityKind, FieldValue, Money, Record, Result};

use super::{PhaseContext, id, text};
use crate::provider::TextKind;

const PAYMENT_TERMS: &[&str] = &["Net 30"];
const WARRANTY_TYPES: &[&str] = &["Standard", "Extended", "Premium", "Accidental Damage"];
const SIZES: &[&str] = &["S", "M", "L", "XL"];
const RELATION_TYPES: &[&str] = &["accessory", "alternative", "bundle"];
const BIN_AISLES: &[&str] = &["A", "B", "C", "D", "E", "F"];

pub(super) fn brands(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for _ in 0..ctx.config.counts.brands {
        records.push(
            Record::new(EntityKind::Brand)
                .with("name", text(ctx.fake.text(TextKind::CompanyName)))
                .with("description", text(ctx.fake.text(TextKind::Sentence)))
                .with("logo_url", text(ctx.fake.text(TextKind::ImageUrl)))
                .with("website", text(ctx.fake.text(TextKind::Url)))
                .with("is_active", FieldValue::Bool(ctx.fake.boolean(0.9))),
        );
    }
    Ok(records)
}

pub(super) fn categories(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for position in 0..ctx.config.counts.categories {
        records.push(
            Record::new(EntityKind::Category)
                .with("name", text(ctx.fake.text(TextKind::Department)))
                .with("description", text(ctx.fake.text(TextKind::Sentence)))
                .with("display_order", FieldValue::Int(i64::from(position) + 1))
                .with("is_active", FieldValue::Bool(true)),
        );
    }
    Ok(records)
}

pub(super) fn suppliers(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for _ in 0..ctx.config.counts.suppliers {
        records.push(
            Record::new(EntityKind::Supplier)
                .with("company_name", text(ctx.fake.text(TextKind::CompanyName)))
                .with("contact_name", text(ctx.fake.text(TextKind::FullName)))
                .with("email", text(ctx.fake.text(TextKind::Email)))
                .with("phone", text(ctx.fake.text(TextKind::Phone)))
                .with("address", text(ctx.fake.text(TextKind::StreetAddress)))
                .with("city", text(ctx.fake.text(TextKind::City)))
                .with("postal_code", text(ctx.fake.text(TextKind::PostalCode)))
                .with("country", text(ctx.fake.text(TextKind::Country)))
                .with("payment_terms", text(ctx.fake.one_of(PAYMENT_TERMS).to_string()))
                .with("is_active", FieldValue::Bool(true)),
        );
    }
    Ok(records)
}

pub(super) fn warehouses(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for _ in 0..ctx.config.counts.warehouses {
        let city = ctx.fake.text(TextKind::City);
        records.push(
            Record::new(EntityKind::Warehouse)
                .with("name", text(format!("{city} Distribution Center")))
                .with("code", text(ctx.fake.token(5)))
                .with("address", text(ctx.fake.text(TextKind::StreetAddress)))
                .with("city", text(city))
                .with("postal_code", text(ctx.fake.text(TextKind::PostalCode)))
                .with("country", text(ctx.fake.text(TextKind::Country)))
                .with("manager_name", text(ctx.fake.text(TextKind::FullName)))
                .with("phone", text(ctx.fake.text(TextKind::Phone)))
                .with("is_active", FieldValue::Bool(true)),
        );
    }
    Ok(records)
}

pub(super) fn warranties(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for _ in 0..ctx.config.counts.warranties {
        let months = ctx.fake.int(6, 36);
        records.push(
            Record::new(EntityKind::Warranty)
                .with("warranty_type", text(ctx.fake.one_of(WARRANTY_TYPES).to_string()))
                .with("duration_months", FieldValue::Int(months))
                .with("terms_conditions", text(ctx.fake.text(TextKind::Paragraph)))
                .with("price", FieldValue::Money(ctx.fake.money(Money(1_000), Money(10_000)))),
        );
    }
    Ok(records)
}

pub(super) fn products(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for _ in 0..ctx.config.counts.products {
        let brand_id = ctx.pick(EntityKind::Brand)?;
        let category_id = ctx.pick(EntityKind::Category)?;
        let created_at = ctx.fake.past(365);
        records.push(
            Record::new(EntityKind::Product)
                .with("sku", text(ctx.fake.token(8)))
                .with("name", text(ctx.fake.text(TextKind::ProductName)))
                .with("description", text(ctx.fake.text(TextKind::ProductDescription)))
                .with("brand_id", id(brand_id))
                .with("category_id", id(category_id))
                .with("base_price", FieldValue::Money(ctx.fake.money(Money(1_000), Money(50_000))))
                .with("weight", FieldValue::Int(ctx.fake.int(1, 20)))
                .with("dimensions_length", FieldValue::Int(ctx.fake.int(10, 100)))
                .with("dimensions_width", FieldValue::Int(ctx.fake.int(10, 100)))
                .with("dimensions_height", FieldValue::Int(ctx.fake.int(10, 100)))
                .with("is_active", FieldValue::Bool(true))
                .with("created_at", FieldValue::Timestamp(created_at))
                .with("updated_at", FieldValue::Timestamp(ctx.now)),
        );
    }
    Ok(records)
}

pub(super) fn variants(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &product_id in pool.ids(EntityKind::Product) {
        let count = ctx.draw(ctx.config.counts.variants_per_product);
        for _ in 0..count {
            let color = ctx.fake.text(TextKind::Color);
            let size = ctx.fake.one_of(SIZES);
            let warranty_months = ctx.fake.int(6, 24);
            records.push(
                Record::new(EntityKind::ProductVariant)
                    .with("product_id", id(product_id))
                    .with("sku_variant", text(format!("VAR-{}", ctx.fake.token(5))))
                    .with("variant_name", text(format!("{color} / {size}")))
                    .with(
                        "additional_price",
                        FieldValue::Money(ctx.fake.money(Money(500), Money(5_000))),
                    )
                    .with("stock_quantity", FieldValue::Int(ctx.fake.int(0, 100)))
                    .with("reserved_quantity", FieldValue::Int(ctx.fake.int(0, 20)))
                    .with("color", text(color))
                    .with("size", text(size.to_string()))
                    .with(
                        "other_attributes",
                        FieldValue::Json(json!({
                            "material": ctx.fake.text(TextKind::Material),
                            "warranty_months": warranty_months,
                        })),
                    ),
            );
        }
    }
    Ok(records)
}

/// One stock row per (variant, warehouse).
pub(super) fn inventory(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &variant_id in pool.ids(EntityKind::ProductVariant) {
        for &warehouse_id in pool.ids(EntityKind::Warehouse) {
            records.push(
                Record::new(EntityKind::Inventory)
                    .with("product_variant_id", id(variant_id))
                    .with("warehouse_id", id(warehouse_id))
                    .with("quantity_available", FieldValue::Int(ctx.fake.int(0, 100)))
                    .with("quantity_reserved", FieldValue::Int(ctx.fake.int(0, 20)))
                    .with("reorder_level", FieldValue::Int(ctx.fake.int(5, 20)))
                    .with("reorder_quantity", FieldValue::Int(ctx.fake.int(10, 50)))
                    .with("last_restock_date", FieldValue::Timestamp(ctx.fake.past(90))),
            );
        }
    }
    Ok(records)
}

pub(super) fn product_suppliers(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &product_id in pool.ids(EntityKind::Product) {
        let count = ctx.draw(ctx.config.counts.suppliers_per_product);
        for supplier_id in ctx.pick_distinct(EntityKind::Supplier, count as usize)? {
            records.push(
                Record::new(EntityKind::ProductSupplier)
                    .with("product_id", id(product_id))
                    .with("supplier_id", id(supplier_id))
                    .with("supplier_sku", text(ctx.fake.token(6)))
                    .with(
                        "cost_price",
                        FieldValue::Money(ctx.fake.money(Money(1_000), Money(10_000))),
                    )
                    .with("lead_time_days", FieldValue::Int(ctx.fake.int(3, 20)))
                    .with("minimum_order_quantity", FieldValue::Int(ctx.fake.int(1, 50))),
            );
        }
    }
    Ok(records)
}

/// Relates each product to other products; never to itself.
pub(super) fn related_products(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &product_id in pool.ids(EntityKind::Product) {
        let count = ctx.draw(ctx.config.counts.related_per_product);
        for _ in 0..count {
            let candidates = ctx.pick_distinct(EntityKind::Product, 2)?;
            let Some(&related_id) = candidates.iter().find(|&&other| other != product_id) else {
                continue;
            };
            records.push(
                Record::new(EntityKind::ProductRelated)
                    .with("product_id", id(product_id))
                    .with("related_product_id", id(related_id))
                    .with("relation_type", text(ctx.fake.one_of(RELATION_TYPES).to_string())),
            );
        }
    }
    Ok(records)
}

pub(super) fn warehouse_products(ctx: &mut PhaseContext<'_>) -> Result<Vec<Record>> {
    let pool = ctx.pool;
    let mut records = Vec::new();
    for &warehouse_id in pool.ids(EntityKind::Warehouse) {
        let count = ctx.draw(ctx.config.counts.products_per_warehouse);
        for _ in 0..count {
            let product_id = ctx.pick(EntityKind::Product)?;
            let bin = format!(
                "{}-{:02}-{}",
                ctx.fake.one_of(BIN_AISLES),
                ctx.fake.int(1, 40),
                ctx.fake.int(1, 6)
            );
            records.push(
                Record::new(EntityKind::WarehouseProduct)
                    .with("warehouse_id", id(warehouse_id))
                    .with("product_id", id(product_id))
                    .with("bin_location", text(bin))
                    .with("stocked_since", FieldValue::Timestamp(ctx.fake.past(365))),
            );
        }
    }
    Ok(records)
}
