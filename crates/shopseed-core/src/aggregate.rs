//! Derived monetary fields.
//!
//! Tax is `floor(base * rate)` in minor units, with the rate expressed in
//! basis points so the rule is exact integer arithmetic. Derived fields are
//! never drawn at random; they are always computed from chosen inputs.

use serde::Serialize;

use crate::value::Money;

/// Basis points in 100%.
pub const BPS_SCALE: i64 = 10_000;

/// Tax on a non-negative base, floored to the smallest currency unit.
pub fn tax(base: Money, rate_bps: u32) -> Money {
    Money((base.minor() * i64::from(rate_bps)).div_euclid(BPS_SCALE))
}

/// Order-level amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderAmounts {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub discount: Money,
    pub total: Money,
}

impl OrderAmounts {
    pub fn compute(subtotal: Money, shipping: Money, discount: Money, rate_bps: u32) -> Self {
        let tax = tax(subtotal, rate_bps);
        Self {
            subtotal,
            tax,
            shipping,
            discount,
            total: subtotal + tax + shipping - discount,
        }
    }

    pub fn satisfies_identity(&self, rate_bps: u32) -> bool {
        self.tax == tax(self.subtotal, rate_bps)
            && self.total == self.subtotal + self.tax + self.shipping - self.discount
    }
}

/// Line-item amounts. Tax is charged once on the unit price, while the
/// total covers the whole quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineAmounts {
    pub unit_price: Money,
    pub quantity: i64,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

impl LineAmounts {
    pub fn compute(unit_price: Money, quantity: i64, discount: Money, rate_bps: u32) -> Self {
        let tax = tax(unit_price, rate_bps);
        Self {
            unit_price,
            quantity,
            tax,
            discount,
            total: Money(unit_price.minor() * quantity) + tax - discount,
        }
    }

    pub fn line_subtotal(&self) -> Money {
        Money(self.unit_price.minor() * self.quantity)
    }

    pub fn satisfies_identity(&self, rate_bps: u32) -> bool {
        self.tax == tax(self.unit_price, rate_bps)
            && self.total == self.line_subtotal() + self.tax - self.discount
    }
}
