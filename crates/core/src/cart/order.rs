//! Order submission payload built from the cart.

use serde::{Deserialize, Serialize};

use super::LineItem;
use crate::types::{Price, ProductId, Quantity};

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub items: Vec<OrderLine>,
    pub total: Price,
}

/// One line of an [`OrderRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub price: Price,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        Self {
            product_id: item.id,
            quantity: item.quantity,
            price: item.unit_price,
        }
    }
}
