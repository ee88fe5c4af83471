//! Phase table: one record builder per entity, with its prerequisites.
//!
//! Builders are pure with respect to the store. They read the identifier
//! pool and the record ledger, draw values, and return the records to insert;
//! the engine performs the writes.

mod catalog;
mod customers;
mod orders;

use chrono::NaiveDateTime;
use rand_chacha::ChaCha8Rng;

use shopseed_core::{
    EntityKind, FieldValue, IdentifierPool, IntRange, Money, PhaseNode, Record, RecordId,
    RecordLedger, Result, SeedConfig, SeedError,
};

use crate::provider::FakeValueProvider;

/// Builds the records of one phase.
pub type PhaseFn = fn(&mut PhaseContext<'_>) -> Result<Vec<Record>>;

/// A phase: the entity it populates and the phases it reads from.
#[derive(Clone, Copy)]
pub struct PhaseDef {
    pub entity: EntityKind,
    /// Phases whose pools must be populated first.
    pub requires: &'static [EntityKind],
    /// Phases read through nullable references; ordered first when present.
    pub optional: &'static [EntityKind],
    pub build: PhaseFn,
}

impl PhaseDef {
    pub fn node(&self) -> PhaseNode {
        PhaseNode::new(self.entity, self.requires, self.optional)
    }
}

impl std::fmt::Debug for PhaseDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseDef")
            .field("entity", &self.entity)
            .field("requires", &self.requires)
            .field("optional", &self.optional)
            .finish()
    }
}

/// Every phase of a storefront seed, in declaration order.
pub fn phase_table() -> Vec<PhaseDef> {
    use EntityKind::*;

    vec![
        def(Brand, &[], &[], catalog::brands),
        def(Category, &[], &[], catalog::categories),
        def(Supplier, &[], &[], catalog::suppliers),
        def(Warehouse, &[], &[], catalog::warehouses),
        def(Warranty, &[], &[], catalog::warranties),
        def(Coupon, &[], &[], customers::coupons),
        def(Customer, &[], &[], customers::customers),
        def(Address, &[Customer], &[], customers::addresses),
        def(Product, &[Brand, Category], &[], catalog::products),
        def(ProductVariant, &[Product], &[], catalog::variants),
        def(Inventory, &[ProductVariant, Warehouse], &[], catalog::inventory),
        def(ProductSupplier, &[Product, Supplier], &[], catalog::product_suppliers),
        def(Order, &[Customer], &[Address], orders::orders),
        def(OrderItem, &[Order, ProductVariant], &[Warranty], orders::order_items),
        def(Payment, &[Order], &[], orders::payments),
        def(Review, &[Product, Customer], &[], customers::reviews),
        def(CartItem, &[Customer, ProductVariant], &[], customers::cart_items),
        def(Wishlist, &[Customer], &[], customers::wishlists),
        def(CustomerCoupon, &[Customer, Coupon], &[], customers::customer_coupons),
        def(OrderCoupon, &[Order, Coupon], &[], orders::order_coupons),
        def(ProductRelated, &[Product], &[], catalog::related_products),
        def(WishlistProduct, &[Wishlist, Product], &[], customers::wishlist_products),
        def(WarehouseProduct, &[Warehouse, Product], &[], catalog::warehouse_products),
    ]
}

fn def(
    entity: EntityKind,
    requires: &'static [EntityKind],
    optional: &'static [EntityKind],
    build: PhaseFn,
) -> PhaseDef {
    PhaseDef {
        entity,
        requires,
        optional,
        build,
    }
}

/// Everything a phase builder may read or draw from.
pub struct PhaseContext<'a> {
    pub config: &'a SeedConfig,
    pub pool: &'a IdentifierPool,
    pub ledger: &'a RecordLedger,
    pub fake: &'a mut dyn FakeValueProvider,
    /// Phase-local RNG used for pool draws.
    pub rng: &'a mut ChaCha8Rng,
    pub now: NaiveDateTime,
}

impl PhaseContext<'_> {
    pub fn draw(&mut self, range: IntRange) -> i64 {
        self.fake.int(range.min, range.max)
    }

    pub fn draw_money(&mut self, range: IntRange) -> Money {
        self.fake.money(Money(range.min), Money(range.max))
    }

    pub fn pick(&mut self, entity: EntityKind) -> Result<RecordId> {
        self.pool.pick_one(entity, &mut *self.rng)
    }

    pub fn pick_or_null(&mut self, entity: EntityKind, null_probability: f64) -> Option<RecordId> {
        self.pool
            .pick_one_or_null(entity, null_probability, &mut *self.rng)
    }

    pub fn pick_distinct(&mut self, entity: EntityKind, k: usize) -> Result<Vec<RecordId>> {
        self.pool.pick_distinct(entity, k, &mut *self.rng)
    }

    /// Column of an already inserted parent row.
    pub fn parent(
        &self,
        entity: EntityKind,
        id: RecordId,
        column: &'static str,
    ) -> Result<&FieldValue> {
        self.ledger
            .lookup_parent(entity, id, column)
            .ok_or(SeedError::MissingParentField { entity, id, column })
    }
}

fn text(value: String) -> FieldValue {
    FieldValue::Text(value)
}

fn id(value: RecordId) -> FieldValue {
    FieldValue::Ref(Some(value))
}
