use serde_json::Value;

use crate::RawItem;

mod inventory;
pub use inventory::Inventory;

/// The shapes of already-fetched item data we know how to read.
#[derive(Debug)]
pub enum ItemSource {
    /// A community inventory page with separate assets and descriptions.
    Inventory(Inventory),
    /// A plain list of item records.
    Items(Vec<RawItem>),
    /// A single item record.
    Item(RawItem),
}

impl ItemSource {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if value.get("assets").is_some() {
            return serde_json::from_value(value).map(Self::Inventory);
        }

        match value {
            Value::Array(_) => serde_json::from_value(value).map(Self::Items),
            other => Ok(Self::Item(RawItem::from(other))),
        }
    }

    pub fn into_items(self) -> Vec<RawItem> {
        match self {
            Self::Inventory(inventory) => inventory.items(),
            Self::Items(items) => items,
            Self::Item(item) => vec![item],
        }
    }
}
