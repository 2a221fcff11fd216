use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{item::scalar_string, RawItem};

/// A page of the community inventory endpoint
/// (`/inventory/{steamid}/{appid}/{contextid}`), as already fetched by the caller.
///
/// Steam splits every item into an asset (the instance) and a description
/// (the shared class data); [`Inventory::items`] stitches them back together.
#[derive(Debug, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    assets: Vec<InventoryAsset>,
    #[serde(default)]
    descriptions: Vec<Map<String, Value>>,
    #[serde(default)]
    total_inventory_count: usize,
}

#[derive(Debug, Deserialize)]
struct InventoryAsset {
    #[serde(default)]
    amount: Value,
    #[serde(default)]
    appid: Value,
    #[serde(default)]
    assetid: Value,
    #[serde(default)]
    classid: Value,
    #[serde(default)]
    contextid: Value,
    #[serde(default)]
    instanceid: Value,
}

type ClassKey = (String, String);

fn class_key(classid: Option<&Value>, instanceid: Option<&Value>) -> Option<ClassKey> {
    let classid = classid.and_then(scalar_string)?;
    let instanceid = instanceid
        .and_then(scalar_string)
        .unwrap_or_else(|| "0".to_string());

    Some((classid, instanceid))
}

impl Inventory {
    pub fn total_inventory_count(&self) -> usize {
        self.total_inventory_count
    }

    /// One [`RawItem`] per asset, with the asset's own fields layered over
    /// its class description. Assets without a classid or a matching
    /// description are skipped.
    pub fn items(&self) -> Vec<RawItem> {
        let descriptions: HashMap<ClassKey, &Map<String, Value>> = self
            .descriptions
            .iter()
            .filter_map(|d| Some((class_key(d.get("classid"), d.get("instanceid"))?, d)))
            .collect();

        self.assets
            .iter()
            .filter_map(|asset| {
                let Some(key) = class_key(Some(&asset.classid), Some(&asset.instanceid)) else {
                    tracing::warn!(assetid = ?asset.assetid, "Asset without classid");
                    return None;
                };
                let Some(description) = descriptions.get(&key) else {
                    tracing::warn!(assetid = ?asset.assetid, classid = %key.0, instanceid = %key.1, "Missing description for asset");
                    return None;
                };

                let mut merged = (*description).clone();
                for (field, value) in [
                    ("id", &asset.assetid),
                    ("assetid", &asset.assetid),
                    ("amount", &asset.amount),
                    ("appid", &asset.appid),
                    ("contextid", &asset.contextid),
                    ("classid", &asset.classid),
                    ("instanceid", &asset.instanceid),
                ] {
                    if !value.is_null() {
                        merged.insert(field.to_string(), value.clone());
                    }
                }

                Some(RawItem::from(Value::Object(merged)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn joins_assets_with_descriptions() {
        let inventory: Inventory = serde_json::from_value(json!({
            "assets": [
                { "appid": 730, "contextid": "2", "assetid": "8795563285", "classid": "1690096482", "instanceid": "0", "amount": "1" },
                { "appid": 730, "contextid": "2", "assetid": "8795563286", "classid": "1690096482", "instanceid": "0", "amount": "1" },
                { "appid": 730, "contextid": "2", "assetid": "1", "classid": "404", "instanceid": "0", "amount": "1" },
            ],
            "descriptions": [
                { "appid": 730, "classid": "1690096482", "instanceid": "0", "name": "Chroma 3 Case", "market_hash_name": "Chroma 3 Case", "tradable": 1 },
            ],
            "total_inventory_count": 3,
            "success": 1,
            "rwgrsn": -2,
        }))
        .unwrap();

        let items = inventory.items();

        assert_eq!(inventory.total_inventory_count(), 3);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].str("id"), Some("8795563285"));
        assert_eq!(items[1].str("id"), Some("8795563286"));
        assert_eq!(items[0].str("name"), Some("Chroma 3 Case"));
        assert_eq!(items[0].scalar("contextid").as_deref(), Some("2"));
        assert!(items[0].is_tradable());
    }

    #[test]
    fn missing_instanceid_defaults_to_zero() {
        let inventory: Inventory = serde_json::from_value(json!({
            "assets": [{ "assetid": "7", "classid": 11 }],
            "descriptions": [{ "classid": "11", "instanceid": "0", "name": "Sticker | Crown (Foil)" }],
        }))
        .unwrap();

        let items = inventory.items();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].str("name"), Some("Sticker | Crown (Foil)"));
    }

    #[test]
    fn assets_without_classid_are_skipped() {
        let inventory: Inventory = serde_json::from_value(json!({
            "assets": [
                { "assetid": "1" },
                { "assetid": "2", "classid": "5", "instanceid": "0" },
                { "classid": "5", "instanceid": "0" },
            ],
            "descriptions": [{ "classid": "5", "instanceid": "0", "name": "Operation Pass" }],
        }))
        .unwrap();

        let items = inventory.items();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].str("id"), Some("2"));
        assert_eq!(items[1].str("id"), None);
        assert_eq!(items[1].str("name"), Some("Operation Pass"));
    }
}
