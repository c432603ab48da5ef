//! Cart line items.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, Quantity};

/// One product entry in the cart.
///
/// This is also the persisted record shape: `{id, name, price, image_url?,
/// quantity}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: Quantity,
}

impl LineItem {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A product being added to the cart; a [`LineItem`] without a quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_url: Option<String>,
}

impl NewLineItem {
    /// Build a new line item without an image.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            image_url: None,
        }
    }

    /// Attach an image URL.
    #[must_use]
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub(crate) fn into_line_item(self, quantity: Quantity) -> LineItem {
        LineItem {
            id: self.id,
            name: self.name,
            unit_price: self.unit_price,
            image_url: self.image_url,
            quantity,
        }
    }
}
