use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, NaiveDateTime};

use shopseed_core::{
    EntityKind, FieldValue, IntRange, LineAmounts, Money, OrderAmounts, Record, SeedConfig,
    SeedError, StoreErrorKind, tax,
};
use shopseed_generate::{FakeRsProvider, RunState, SeedOutcome, Seeder};
use shopseed_store::MemoryStore;

fn config(seed: u64) -> SeedConfig {
    let mut config = SeedConfig {
        seed: Some(seed),
        ..SeedConfig::default()
    };
    config.readiness.max_attempts = 3;
    config.readiness.delay_ms = 0;
    config
}

fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}

async fn seed(store: &MemoryStore, config: SeedConfig) -> SeedOutcome {
    let seeder = Seeder::new(config).expect("valid config");
    let mut fake = FakeRsProvider::new(seeder.seed(), fixed_now());
    seeder
        .run_with(store, &mut fake, fixed_now())
        .await
        .expect("seeding succeeds")
}

fn int(record: &Record, column: &str) -> i64 {
    record
        .get(column)
        .and_then(FieldValue::as_i64)
        .unwrap_or_else(|| panic!("{column} missing on {}", record.entity))
}

fn money(record: &Record, column: &str) -> Money {
    record
        .get(column)
        .and_then(FieldValue::as_money)
        .unwrap_or_else(|| panic!("{column} missing on {}", record.entity))
}

fn text<'a>(record: &'a Record, column: &str) -> &'a str {
    record
        .get(column)
        .and_then(FieldValue::as_str)
        .unwrap_or_else(|| panic!("{column} missing on {}", record.entity))
}

fn within(record: &Record, column: &str, low: i64, high: i64) {
    let value = int(record, column);
    assert!(
        (low..=high).contains(&value),
        "{}.{column} = {value} outside {low}..={high}",
        record.entity
    );
}

fn one_of(record: &Record, column: &str, allowed: &[&str]) {
    let value = text(record, column);
    assert!(
        allowed.contains(&value),
        "{}.{column} = {value:?} not in {allowed:?}",
        record.entity
    );
}

fn token_of(record: &Record, column: &str, prefix: &str, len: usize) {
    let value = text(record, column);
    let token = value
        .strip_prefix(prefix)
        .unwrap_or_else(|| panic!("{}.{column} = {value:?} lacks {prefix:?}", record.entity));
    assert_eq!(token.len(), len, "{}.{column} = {value:?}", record.entity);
    assert!(
        token.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()),
        "{}.{column} = {value:?}",
        record.entity
    );
}

/// Memory store ids are serial from 1 in insertion order.
fn by_id(store: &MemoryStore, entity: EntityKind, id: i64) -> Record {
    store.rows(entity)[(id - 1) as usize].clone()
}

fn pairs(store: &MemoryStore, entity: EntityKind) -> Vec<(i64, i64)> {
    let (left, right) = entity.pair_key().expect("pair entity");
    store
        .rows(entity)
        .iter()
        .map(|row| (int(row, left), int(row, right)))
        .collect()
}

#[tokio::test]
async fn default_run_populates_every_pool() {
    let store = MemoryStore::new();
    let outcome = seed(&store, config(42)).await;
    let sizes = &outcome.report.pool_sizes;

    assert_eq!(outcome.report.state, RunState::Completed);
    assert_eq!(outcome.report.probe_attempts, Some(1));
    assert_eq!(sizes[&EntityKind::Brand], 5);
    assert_eq!(sizes[&EntityKind::Category], 5);
    assert_eq!(sizes[&EntityKind::Supplier], 5);
    assert_eq!(sizes[&EntityKind::Warehouse], 3);
    assert_eq!(sizes[&EntityKind::Warranty], 5);
    assert_eq!(sizes[&EntityKind::Coupon], 5);
    assert_eq!(sizes[&EntityKind::Customer], 10);
    assert_eq!(sizes[&EntityKind::Product], 10);
    assert_eq!(sizes[&EntityKind::Review], 20);

    let addresses = sizes[&EntityKind::Address];
    assert!((10..=20).contains(&addresses), "addresses {addresses}");
    let orders = sizes[&EntityKind::Order];
    assert!((10..=30).contains(&orders), "orders {orders}");
    let variants = sizes[&EntityKind::ProductVariant];
    assert!((10..=30).contains(&variants), "variants {variants}");

    assert_eq!(sizes[&EntityKind::Payment], orders);
    assert_eq!(sizes[&EntityKind::Inventory], variants * 3);
    assert_eq!(outcome.report.phases.len(), EntityKind::ALL.len());
    assert_eq!(store.close_count(), 1);
}

#[tokio::test]
async fn order_amounts_follow_the_tax_identity() {
    let store = MemoryStore::new();
    let config = config(7);
    let rate = config.pricing.tax_rate_bps;
    seed(&store, config).await;

    for order in store.rows(EntityKind::Order) {
        let amounts = OrderAmounts {
            subtotal: money(&order, "subtotal"),
            tax: money(&order, "tax_amount"),
            shipping: money(&order, "shipping_cost"),
            discount: money(&order, "discount_amount"),
            total: money(&order, "total_amount"),
        };
        assert!(amounts.satisfies_identity(rate), "{amounts:?}");
        assert!(amounts.discount <= amounts.subtotal);
        assert!(amounts.total >= Money::ZERO);
    }

    for item in store.rows(EntityKind::OrderItem) {
        let amounts = LineAmounts {
            unit_price: money(&item, "unit_price"),
            quantity: int(&item, "quantity"),
            tax: money(&item, "tax_amount"),
            discount: money(&item, "discount_amount"),
            total: money(&item, "total_price"),
        };
        assert!(amounts.satisfies_identity(rate), "{amounts:?}");
        assert!(amounts.discount <= amounts.line_subtotal());
    }
}

#[tokio::test]
async fn line_tax_is_charged_on_the_unit_price() {
    let mut config = config(13);
    config.pricing.quantity = IntRange::new(2, 5);
    let rate = config.pricing.tax_rate_bps;
    let store = MemoryStore::new();
    seed(&store, config).await;

    let items = store.rows(EntityKind::OrderItem);
    assert!(!items.is_empty());
    for item in items {
        let unit_price = money(&item, "unit_price");
        let quantity = int(&item, "quantity");
        assert!(quantity >= 2);
        assert_eq!(money(&item, "tax_amount"), tax(unit_price, rate));
        assert_eq!(
            money(&item, "total_price"),
            Money(unit_price.minor() * quantity) + tax(unit_price, rate)
                - money(&item, "discount_amount")
        );
    }
}

#[tokio::test]
async fn generated_fields_stay_within_declared_bounds() {
    let store = MemoryStore::new();
    seed(&store, config(41)).await;
    let today = fixed_now().date();

    for supplier in store.rows(EntityKind::Supplier) {
        assert_eq!(text(&supplier, "payment_terms"), "Net 30");
    }
    for warehouse in store.rows(EntityKind::Warehouse) {
        token_of(&warehouse, "code", "", 5);
    }
    for warranty in store.rows(EntityKind::Warranty) {
        within(&warranty, "duration_months", 6, 36);
    }
    for coupon in store.rows(EntityKind::Coupon) {
        token_of(&coupon, "code", "", 6);
        one_of(&coupon, "discount_type", &["percentage", "fixed_amount"]);
        within(&coupon, "discount_value", 5, 50);
        within(&coupon, "usage_limit", 10, 100);
    }
    for customer in store.rows(EntityKind::Customer) {
        let Some(FieldValue::Date(born)) = customer.get("date_of_birth") else {
            panic!("customer without a birthdate");
        };
        let age = today.years_since(*born).expect("born in the past");
        assert!((18..=70).contains(&age), "age {age}");
    }
    for product in store.rows(EntityKind::Product) {
        token_of(&product, "sku", "", 8);
        let price = money(&product, "base_price");
        assert!((Money(1_000)..=Money(50_000)).contains(&price), "base price {price}");
        within(&product, "weight", 1, 20);
    }
    for variant in store.rows(EntityKind::ProductVariant) {
        token_of(&variant, "sku_variant", "VAR-", 5);
        one_of(&variant, "size", &["S", "M", "L", "XL"]);
        within(&variant, "stock_quantity", 0, 100);
        within(&variant, "reserved_quantity", 0, 20);
        let extra = money(&variant, "additional_price");
        assert!((Money(500)..=Money(5_000)).contains(&extra), "additional price {extra}");
    }
    for inventory in store.rows(EntityKind::Inventory) {
        within(&inventory, "quantity_available", 0, 100);
        within(&inventory, "quantity_reserved", 0, 20);
        within(&inventory, "reorder_level", 5, 20);
        within(&inventory, "reorder_quantity", 10, 50);
    }
    for link in store.rows(EntityKind::ProductSupplier) {
        token_of(&link, "supplier_sku", "", 6);
        within(&link, "lead_time_days", 3, 20);
        within(&link, "minimum_order_quantity", 1, 50);
    }
    for related in store.rows(EntityKind::ProductRelated) {
        one_of(&related, "relation_type", &["accessory", "alternative", "bundle"]);
    }
    for review in store.rows(EntityKind::Review) {
        within(&review, "rating", 1, 5);
        within(&review, "helpful_count", 0, 50);
    }
    for order in store.rows(EntityKind::Order) {
        token_of(&order, "order_number", "", 8);
        one_of(
            &order,
            "status",
            &[
                "pending",
                "confirmed",
                "processing",
                "shipped",
                "delivered",
                "cancelled",
                "returned",
            ],
        );
    }
    for payment in store.rows(EntityKind::Payment) {
        token_of(&payment, "transaction_id", "", 10);
        one_of(
            &payment,
            "payment_method",
            &["credit_card", "paypal", "bank_transfer", "invoice"],
        );
        one_of(&payment, "status", &["pending", "completed", "failed", "refunded"]);
    }
}

#[tokio::test]
async fn payments_match_their_order_total() {
    let store = MemoryStore::new();
    seed(&store, config(11)).await;

    let payments = store.rows(EntityKind::Payment);
    assert_eq!(payments.len(), store.count(EntityKind::Order));
    for payment in payments {
        let order = by_id(&store, EntityKind::Order, int(&payment, "order_id"));
        assert_eq!(money(&payment, "amount"), money(&order, "total_amount"));
    }
}

#[tokio::test]
async fn references_point_into_populated_pools() {
    let store = MemoryStore::new();
    let outcome = seed(&store, config(3)).await;
    let pool = &outcome.pool;

    for variant in store.rows(EntityKind::ProductVariant) {
        assert!(pool.contains(EntityKind::Product, int(&variant, "product_id")));
    }
    for product in store.rows(EntityKind::Product) {
        assert!(pool.contains(EntityKind::Brand, int(&product, "brand_id")));
        assert!(pool.contains(EntityKind::Category, int(&product, "category_id")));
    }
    for item in store.rows(EntityKind::OrderItem) {
        assert!(pool.contains(EntityKind::Order, int(&item, "order_id")));
        match item.get("warranty_id") {
            Some(FieldValue::Ref(Some(id))) => {
                assert!(pool.contains(EntityKind::Warranty, *id));
            }
            Some(FieldValue::Ref(None)) => {}
            other => panic!("unexpected warranty reference {other:?}"),
        }
    }
}

#[tokio::test]
async fn orders_ship_to_their_customer() {
    let store = MemoryStore::new();
    seed(&store, config(5)).await;

    for order in store.rows(EntityKind::Order) {
        let customer = int(&order, "customer_id");
        for column in ["shipping_address_id", "billing_address_id"] {
            let address = by_id(&store, EntityKind::Address, int(&order, column));
            assert_eq!(int(&address, "customer_id"), customer);
        }
    }
}

#[tokio::test]
async fn inventory_covers_each_variant_warehouse_pair_once() {
    let store = MemoryStore::new();
    let outcome = seed(&store, config(19)).await;

    let inventory = pairs(&store, EntityKind::Inventory);
    for &(variant, warehouse) in &inventory {
        assert!(outcome.pool.contains(EntityKind::ProductVariant, variant));
        assert!(outcome.pool.contains(EntityKind::Warehouse, warehouse));
    }
    let distinct: BTreeSet<_> = inventory.iter().copied().collect();
    assert_eq!(distinct.len(), inventory.len());
    assert_eq!(
        inventory.len(),
        store.count(EntityKind::ProductVariant) * store.count(EntityKind::Warehouse)
    );
}

#[tokio::test]
async fn junction_duplicates_are_skipped_not_fatal() {
    let mut config = config(23);
    config.counts.products = 2;
    config.counts.products_per_wishlist = IntRange::new(6, 6);
    config.counts.products_per_warehouse = IntRange::new(6, 6);
    config.counts.coupons = 1;
    config.counts.coupons_per_order = IntRange::new(3, 3);

    let store = MemoryStore::new();
    let outcome = seed(&store, config).await;
    assert_eq!(outcome.report.state, RunState::Completed);

    for entity in [
        EntityKind::WishlistProduct,
        EntityKind::WarehouseProduct,
        EntityKind::OrderCoupon,
    ] {
        let rows = pairs(&store, entity);
        let distinct: BTreeSet<_> = rows.iter().copied().collect();
        assert_eq!(distinct.len(), rows.len(), "{entity} has duplicate pairs");

        let phase = outcome.report.phase(entity).expect("phase reported");
        assert_eq!(phase.rows_attempted, phase.rows_inserted + phase.rows_skipped);
        assert!(phase.rows_skipped > 0, "{entity} never collided");
    }
    assert!(outcome.report.skipped_by_kind[&StoreErrorKind::UniqueViolation] > 0);
}

#[tokio::test]
async fn related_products_never_point_to_themselves() {
    let mut config = config(29);
    config.counts.related_per_product = IntRange::new(3, 3);
    let store = MemoryStore::new();
    seed(&store, config).await;

    for (product, related) in pairs(&store, EntityKind::ProductRelated) {
        assert_ne!(product, related);
    }
}

#[tokio::test]
async fn coupon_business_rule_rejections_are_skipped() {
    let mut config = config(31);
    config.counts.coupons_per_order = IntRange::new(1, 1);

    let store = MemoryStore::new().with_storefront_rules();
    let outcome = seed(&store, config).await;

    let phase = outcome
        .report
        .phase(EntityKind::OrderCoupon)
        .expect("phase reported");
    assert_eq!(phase.rows_attempted, store.count(EntityKind::Order) as u64);
    assert_eq!(phase.rows_attempted, phase.rows_inserted + phase.rows_skipped);

    for row in store.rows(EntityKind::OrderCoupon) {
        let order = by_id(&store, EntityKind::Order, int(&row, "order_id"));
        let coupon = by_id(&store, EntityKind::Coupon, int(&row, "coupon_id"));
        assert!(money(&order, "subtotal") >= money(&coupon, "minimum_purchase"));
        assert!(money(&row, "discount_applied") <= money(&order, "subtotal"));
    }
}

#[tokio::test]
async fn every_coupon_rejected_still_completes() {
    let mut config = config(37);
    config.counts.coupons_per_order = IntRange::new(1, 1);
    let store = MemoryStore::new()
        .with_rule(EntityKind::OrderCoupon, |_, _| Some("coupon expired".to_string()));

    let outcome = seed(&store, config).await;
    let phase = outcome
        .report
        .phase(EntityKind::OrderCoupon)
        .expect("phase reported");
    assert_eq!(phase.rows_inserted, 0);
    assert_eq!(phase.rows_skipped, phase.rows_attempted);
    assert_eq!(
        outcome.report.skipped_by_kind[&StoreErrorKind::BusinessRule],
        phase.rows_skipped
    );
    assert_eq!(outcome.report.state, RunState::Completed);
}

#[tokio::test]
async fn fatal_write_names_the_phase_and_stops() {
    let store = MemoryStore::new().with_failure(EntityKind::Product, StoreErrorKind::ForeignKeyViolation);
    let seeder = Seeder::new(config(41)).expect("valid config");

    let failure = seeder.run(&store).await.expect_err("product writes fail");
    assert_eq!(failure.error.phase(), Some(EntityKind::Product));
    assert!(failure.error.to_string().contains("Product"));
    assert_eq!(failure.report.state, RunState::Failed);
    assert_eq!(failure.report.failed_phase, Some(EntityKind::Product));

    let done: Vec<_> = failure.report.phases.iter().map(|phase| phase.entity).collect();
    assert!(done.contains(&EntityKind::Brand));
    assert!(done.contains(&EntityKind::Category));
    assert!(!done.contains(&EntityKind::Product));
    assert_eq!(store.count(EntityKind::ProductVariant), 0);
    assert_eq!(store.count(EntityKind::Order), 0);
    assert_eq!(store.close_count(), 1);
}

#[tokio::test]
async fn business_rule_outside_coupons_is_fatal() {
    let store = MemoryStore::new()
        .with_rule(EntityKind::Payment, |_, _| Some("payment gateway offline".to_string()));
    let seeder = Seeder::new(config(43)).expect("valid config");

    let failure = seeder.run(&store).await.expect_err("payments rejected");
    assert_eq!(failure.error.phase(), Some(EntityKind::Payment));
    match failure.error {
        SeedError::Phase { source, .. } => match *source {
            SeedError::StoreWrite(err) => assert_eq!(err.kind, StoreErrorKind::BusinessRule),
            other => panic!("unexpected source {other}"),
        },
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(store.close_count(), 1);
}

#[tokio::test]
async fn unreachable_store_fails_before_any_phase() {
    let store = MemoryStore::new().with_failing_pings(u32::MAX);
    let seeder = Seeder::new(config(47)).expect("valid config");

    let failure = seeder.run(&store).await.expect_err("store never ready");
    assert!(matches!(
        failure.error,
        SeedError::StoreUnreachable { attempts: 3, .. }
    ));
    assert_eq!(failure.error.phase(), None);
    assert!(failure.report.phases.is_empty());
    assert_eq!(store.ping_count(), 3);
    assert_eq!(store.count(EntityKind::Brand), 0);
    assert_eq!(store.close_count(), 1);
}

#[tokio::test]
async fn store_that_wakes_up_is_seeded() {
    let store = MemoryStore::new().with_failing_pings(2);
    let outcome = seed(&store, config(53)).await;
    assert_eq!(outcome.report.probe_attempts, Some(3));
    assert_eq!(store.count(EntityKind::Customer), 10);
}

#[tokio::test]
async fn too_few_suppliers_is_insufficient_population() {
    let mut config = config(59);
    config.counts.suppliers = 2;
    config.counts.suppliers_per_product = IntRange::new(3, 3);
    let store = MemoryStore::new();
    let seeder = Seeder::new(config).expect("valid config");

    let failure = seeder.run(&store).await.expect_err("not enough suppliers");
    assert_eq!(failure.error.phase(), Some(EntityKind::ProductSupplier));
    match failure.error {
        SeedError::Phase { source, .. } => assert!(matches!(
            *source,
            SeedError::InsufficientPopulation {
                entity: EntityKind::Supplier,
                requested: 3,
                available: 2,
            }
        )),
        other => panic!("unexpected error {other}"),
    }
}

#[tokio::test]
async fn same_seed_reproduces_the_dataset() {
    let first = MemoryStore::new();
    let second = MemoryStore::new();
    seed(&first, config(61)).await;
    seed(&second, config(61)).await;

    for entity in EntityKind::ALL {
        assert_eq!(first.rows(entity), second.rows(entity), "{entity} differs");
    }
}

#[tokio::test]
async fn zero_customers_leaves_dependent_pools_empty() {
    let mut config = config(67);
    config.counts.customers = 0;
    config.counts.reviews = 0;
    let store = MemoryStore::new();
    let outcome = seed(&store, config).await;

    let sizes: BTreeMap<_, _> = outcome.report.pool_sizes.clone();
    for entity in [EntityKind::Address, EntityKind::Order, EntityKind::Payment] {
        assert_eq!(sizes.get(&entity).copied().unwrap_or(0), 0, "{entity}");
    }
    assert_eq!(store.count(EntityKind::CartItem), 0);
    assert_eq!(store.count(EntityKind::Product), 10);
}
