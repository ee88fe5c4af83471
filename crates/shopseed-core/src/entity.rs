use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity types the seeder knows how to create, one per target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Brand,
    Category,
    Supplier,
    Warehouse,
    Warranty,
    Coupon,
    Customer,
    Address,
    Product,
    ProductVariant,
    Inventory,
    ProductSupplier,
    Order,
    OrderItem,
    Payment,
    Review,
    CartItem,
    Wishlist,
    CustomerCoupon,
    OrderCoupon,
    ProductRelated,
    WishlistProduct,
    WarehouseProduct,
}

impl EntityKind {
    pub const ALL: [EntityKind; 23] = [
        EntityKind::Brand,
        EntityKind::Category,
        EntityKind::Supplier,
        EntityKind::Warehouse,
        EntityKind::Warranty,
        EntityKind::Coupon,
        EntityKind::Customer,
        EntityKind::Address,
        EntityKind::Product,
        EntityKind::ProductVariant,
        EntityKind::Inventory,
        EntityKind::ProductSupplier,
        EntityKind::Order,
        EntityKind::OrderItem,
        EntityKind::Payment,
        EntityKind::Review,
        EntityKind::CartItem,
        EntityKind::Wishlist,
        EntityKind::CustomerCoupon,
        EntityKind::OrderCoupon,
        EntityKind::ProductRelated,
        EntityKind::WishlistProduct,
        EntityKind::WarehouseProduct,
    ];

    /// Target table name (unquoted).
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Brand => "brand",
            EntityKind::Category => "category",
            EntityKind::Supplier => "supplier",
            EntityKind::Warehouse => "warehouse",
            EntityKind::Warranty => "warranty",
            EntityKind::Coupon => "coupon",
            EntityKind::Customer => "customer",
            EntityKind::Address => "address",
            EntityKind::Product => "product",
            EntityKind::ProductVariant => "productvariant",
            EntityKind::Inventory => "inventory",
            EntityKind::ProductSupplier => "productsupplier",
            EntityKind::Order => "order",
            EntityKind::OrderItem => "orderitem",
            EntityKind::Payment => "payment",
            EntityKind::Review => "review",
            EntityKind::CartItem => "cartitem",
            EntityKind::Wishlist => "wishlist",
            EntityKind::CustomerCoupon => "customercoupon",
            EntityKind::OrderCoupon => "ordercoupon",
            EntityKind::ProductRelated => "productrelated",
            EntityKind::WishlistProduct => "wishlistproduct",
            EntityKind::WarehouseProduct => "warehouseproduct",
        }
    }

    /// Generated primary key column, if the table has a surrogate key.
    ///
    /// Keyless junction tables return `None`; inserts into them produce no
    /// identifier and never populate a pool.
    pub fn key_column(self) -> Option<&'static str> {
        match self {
            EntityKind::Brand => Some("brand_id"),
            EntityKind::Category => Some("category_id"),
            EntityKind::Supplier => Some("supplier_id"),
            EntityKind::Warehouse => Some("warehouse_id"),
            EntityKind::Warranty => Some("warranty_id"),
            EntityKind::Coupon => Some("coupon_id"),
            EntityKind::Customer => Some("customer_id"),
            EntityKind::Address => Some("address_id"),
            EntityKind::Product => Some("product_id"),
            EntityKind::ProductVariant => Some("variant_id"),
            EntityKind::Inventory => Some("inventory_id"),
            EntityKind::Order => Some("order_id"),
            EntityKind::OrderItem => Some("order_item_id"),
            EntityKind::Payment => Some("payment_id"),
            EntityKind::Review => Some("review_id"),
            EntityKind::CartItem => Some("cart_item_id"),
            EntityKind::Wishlist => Some("wishlist_id"),
            EntityKind::ProductSupplier
            | EntityKind::CustomerCoupon
            | EntityKind::OrderCoupon
            | EntityKind::ProductRelated
            | EntityKind::WishlistProduct
            | EntityKind::WarehouseProduct => None,
        }
    }

    /// Column pair that must be unique for pairing tables.
    pub fn pair_key(self) -> Option<(&'static str, &'static str)> {
        match self {
            EntityKind::Inventory => Some(("product_variant_id", "warehouse_id")),
            EntityKind::ProductSupplier => Some(("product_id", "supplier_id")),
            EntityKind::CartItem => Some(("customer_id", "product_variant_id")),
            EntityKind::CustomerCoupon => Some(("customer_id", "coupon_id")),
            EntityKind::OrderCoupon => Some(("order_id", "coupon_id")),
            EntityKind::ProductRelated => Some(("product_id", "related_product_id")),
            EntityKind::WishlistProduct => Some(("wishlist_id", "product_id")),
            EntityKind::WarehouseProduct => Some(("warehouse_id", "product_id")),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Brand => "Brand",
            EntityKind::Category => "Category",
            EntityKind::Supplier => "Supplier",
            EntityKind::Warehouse => "Warehouse",
            EntityKind::Warranty => "Warranty",
            EntityKind::Coupon => "Coupon",
            EntityKind::Customer => "Customer",
            EntityKind::Address => "Address",
            EntityKind::Product => "Product",
            EntityKind::ProductVariant => "ProductVariant",
            EntityKind::Inventory => "Inventory",
            EntityKind::ProductSupplier => "ProductSupplier",
            EntityKind::Order => "Order",
            EntityKind::OrderItem => "OrderItem",
            EntityKind::Payment => "Payment",
            EntityKind::Review => "Review",
            EntityKind::CartItem => "CartItem",
            EntityKind::Wishlist => "Wishlist",
            EntityKind::CustomerCoupon => "CustomerCoupon",
            EntityKind::OrderCoupon => "OrderCoupon",
            EntityKind::ProductRelated => "ProductRelated",
            EntityKind::WishlistProduct => "WishlistProduct",
            EntityKind::WarehouseProduct => "WarehouseProduct",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
