use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedError};

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IntRange {
    pub min: i64,
    pub max: i64,
}

impl IntRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.min > self.max {
            return Err(SeedError::InvalidConfig(format!(
                "{name}: min {} must be <= max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    fn validate_non_negative(&self, name: &str) -> Result<()> {
        self.validate(name)?;
        if self.min < 0 {
            return Err(SeedError::InvalidConfig(format!(
                "{name}: min must not be negative"
            )));
        }
        Ok(())
    }
}

/// Readiness probe retry budget.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReadinessConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl ReadinessConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay_ms: 1000,
        }
    }
}

/// Per-phase record counts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CountsConfig {
    pub brands: u32,
    pub categories: u32,
    pub suppliers: u32,
    pub warehouses: u32,
    pub warranties: u32,
    pub coupons: u32,
    pub customers: u32,
    pub products: u32,
    pub reviews: u32,
    pub addresses_per_customer: IntRange,
    pub variants_per_product: IntRange,
    pub suppliers_per_product: IntRange,
    pub orders_per_customer: IntRange,
    pub items_per_order: IntRange,
    pub cart_items_per_customer: IntRange,
    pub wishlists_per_customer: IntRange,
    pub products_per_wishlist: IntRange,
    pub coupons_per_customer: IntRange,
    pub coupons_per_order: IntRange,
    pub related_per_product: IntRange,
    pub products_per_warehouse: IntRange,
}

impl Default for CountsConfig {
    fn default() -> Self {
        Self {
            brands: 5,
            categories: 5,
            suppliers: 5,
            warehouses: 3,
            warranties: 5,
            coupons: 5,
            customers: 10,
            products: 10,
            reviews: 20,
            addresses_per_customer: IntRange::new(1, 2),
            variants_per_product: IntRange::new(1, 3),
            suppliers_per_product: IntRange::new(1, 1),
            orders_per_customer: IntRange::new(1, 3),
            items_per_order: IntRange::new(1, 3),
            cart_items_per_customer: IntRange::new(1, 1),
            wishlists_per_customer: IntRange::new(1, 1),
            products_per_wishlist: IntRange::new(1, 4),
            coupons_per_customer: IntRange::new(1, 1),
            coupons_per_order: IntRange::new(0, 1),
            related_per_product: IntRange::new(1, 1),
            products_per_warehouse: IntRange::new(2, 5),
        }
    }
}

impl CountsConfig {
    fn ranges(&self) -> [(&'static str, IntRange); 12] {
        [
            ("counts.addresses_per_customer", self.addresses_per_customer),
            ("counts.variants_per_product", self.variants_per_product),
            ("counts.suppliers_per_product", self.suppliers_per_product),
            ("counts.orders_per_customer", self.orders_per_customer),
            ("counts.items_per_order", self.items_per_order),
            ("counts.cart_items_per_customer", self.cart_items_per_customer),
            ("counts.wishlists_per_customer", self.wishlists_per_customer),
            ("counts.products_per_wishlist", self.products_per_wishlist),
            ("counts.coupons_per_customer", self.coupons_per_customer),
            ("counts.coupons_per_order", self.coupons_per_order),
            ("counts.related_per_product", self.related_per_product),
            ("counts.products_per_warehouse", self.products_per_warehouse),
        ]
    }
}

/// Monetary draw bounds, in minor units, and the tax rule.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PricingConfig {
    pub currency: String,
    /// Tax rate in basis points (1000 = 10%).
    pub tax_rate_bps: u32,
    pub order_subtotal: IntRange,
    pub shipping_cost: IntRange,
    /// Upper bound is further capped at the order subtotal.
    pub order_discount: IntRange,
    pub unit_price: IntRange,
    /// Upper bound is further capped at the line subtotal.
    pub line_discount: IntRange,
    pub quantity: IntRange,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            tax_rate_bps: 1000,
            order_subtotal: IntRange::new(5_000, 50_000),
            shipping_cost: IntRange::new(500, 2_000),
            order_discount: IntRange::new(0, 5_000),
            unit_price: IntRange::new(1_000, 20_000),
            line_discount: IntRange::new(0, 2_000),
            quantity: IntRange::new(1, 5),
        }
    }
}

/// Probabilities of leaving optional references empty.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NullsConfig {
    pub warranty: f64,
    pub shipping_address: f64,
    pub billing_address: f64,
}

impl Default for NullsConfig {
    fn default() -> Self {
        Self {
            warranty: 0.2,
            shipping_address: 0.0,
            billing_address: 0.0,
        }
    }
}

/// Full run configuration, usually loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed for value generation; a random one is chosen when absent.
    pub seed: Option<u64>,
    pub readiness: ReadinessConfig,
    pub counts: CountsConfig,
    pub pricing: PricingConfig,
    pub nulls: NullsConfig,
}

impl SeedConfig {
    pub fn validate(&self) -> Result<()> {
        if self.readiness.max_attempts == 0 {
            return Err(SeedError::InvalidConfig(
                "readiness.max_attempts must be at least 1".to_string(),
            ));
        }

        for (name, range) in self.counts.ranges() {
            range.validate_non_negative(name)?;
        }

        let pricing = &self.pricing;
        if pricing.currency.trim().is_empty() {
            return Err(SeedError::InvalidConfig(
                "pricing.currency must not be empty".to_string(),
            ));
        }
        for (name, range) in [
            ("pricing.order_subtotal", pricing.order_subtotal),
            ("pricing.shipping_cost", pricing.shipping_cost),
            ("pricing.order_discount", pricing.order_discount),
            ("pricing.unit_price", pricing.unit_price),
            ("pricing.line_discount", pricing.line_discount),
        ] {
            range.validate_non_negative(name)?;
        }
        pricing.quantity.validate("pricing.quantity")?;
        if pricing.quantity.min < 1 {
            return Err(SeedError::InvalidConfig(
                "pricing.quantity: min must be at least 1".to_string(),
            ));
        }

        for (name, value) in [
            ("nulls.warranty", self.nulls.warranty),
            ("nulls.shipping_address", self.nulls.shipping_address),
            ("nulls.billing_address", self.nulls.billing_address),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SeedError::InvalidConfig(format!(
                    "{name} must be within [0, 1]"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SeedConfig::default().validate().expect("defaults validate");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: SeedConfig = toml::from_str(
            r#"
            seed = 7

            [counts]
            customers = 3
            addresses_per_customer = { min = 0, max = 4 }

            [readiness]
            max_attempts = 2
            "#,
        )
        .expect("parse config");

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.counts.customers, 3);
        assert_eq!(config.counts.brands, 5);
        assert_eq!(config.counts.addresses_per_customer, IntRange::new(0, 4));
        assert_eq!(config.readiness.max_attempts, 2);
        assert_eq!(config.readiness.delay_ms, 1000);
        assert_eq!(config.pricing.tax_rate_bps, 1000);
    }

    #[test]
    fn rejects_inverted_range() {
        let mut config = SeedConfig::default();
        config.counts.variants_per_product = IntRange::new(3, 1);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("counts.variants_per_product"));
    }

    #[test]
    fn rejects_zero_attempts_and_bad_probability() {
        let mut config = SeedConfig::default();
        config.readiness.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = SeedConfig::default();
        config.nulls.warranty = 1.5;
        assert!(config.validate().is_err());
    }
}
