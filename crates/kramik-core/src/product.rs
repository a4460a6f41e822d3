use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// A catalog row. Field order is the on-disk column order of the
/// products table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub description: String,
    pub category: String,
}

/// Insert payload; the store assigns the id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub description: String,
    pub category: String,
}

impl Product {
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            price: new.price,
            quantity: new.quantity,
            description: new.description,
            category: new.category,
        }
    }
}
