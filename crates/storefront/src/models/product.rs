//! Product (perfume) domain types and the default catalog.

use oliv_core::{Price, PriceError, ProductId};

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Scent family, e.g. "Sweet" or "Neutral".
    pub category: String,
    /// Unit price.
    pub price: Price,
    /// Free-text description.
    pub description: String,
    /// Filename of the product image inside the upload directory.
    pub image: String,
}

/// Fields required to create a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Price,
    pub description: String,
    pub image: String,
}

/// A catalog entry inserted when the products table is empty.
#[derive(Debug, Clone, Copy)]
pub struct SeedProduct {
    pub name: &'static str,
    pub category: &'static str,
    pub price_cents: i64,
    pub description: &'static str,
    pub image: &'static str,
}

/// The default catalog, in insertion order.
pub const SEED_CATALOG: [SeedProduct; 4] = [
    SeedProduct {
        name: "Oliv Sweet",
        category: "Sweet",
        price_cents: 49_900,
        description: "Soft and romantic scent.",
        image: "sweet.jpg",
    },
    SeedProduct {
        name: "Oliv Men",
        category: "Masculine",
        price_cents: 54_900,
        description: "Bold and confident.",
        image: "men.jpg",
    },
    SeedProduct {
        name: "Oliv Unisex",
        category: "Neutral",
        price_cents: 57_900,
        description: "Balanced and versatile.",
        image: "unisex.jpg",
    },
    SeedProduct {
        name: "Oliv Women",
        category: "Feminine",
        price_cents: 52_900,
        description: "Elegant and graceful.",
        image: "women.jpg",
    },
];

impl TryFrom<SeedProduct> for NewProduct {
    type Error = PriceError;

    fn try_from(seed: SeedProduct) -> Result<Self, Self::Error> {
        Ok(Self {
            name: seed.name.to_owned(),
            category: seed.category.to_owned(),
            price: Price::from_cents(seed.price_cents)?,
            description: seed.description.to_owned(),
            image: seed.image.to_owned(),
        })
    }
}
