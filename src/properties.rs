use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{fingerprint, item::scalar_string, trade_hold, Clock, ParseError, RawItem};

/// Fields copied straight from the item.
const ITEM_PROPS: &[&str] = &[
    "id",
    "appid",
    "contextid",
    "amount",
    "name",
    "type",
    "tradable",
    "classid",
    "icon_url",
    "market_hash_name",
    "original_id",
    "estimated_value",
    "market_tradable_restriction",
    "new_assetid",
    "new_contextid",
];

/// Copied fields that keep their JSON type instead of being stringified.
const NATIVE_PROPS: &[&str] = &["amount", "tradable"];

/// Wear telemetry and restriction counters, only present on some items.
const OPTIONAL_PROPS: &[&str] = &[
    "wear",
    "float_value",
    "paint_seed",
    "market_marketable_restriction",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "ScalarInput")]
pub enum PropertyValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

/// Whatever scalar a config file or item hands us; numbers that do not fit an
/// `i64` end up as strings, same as [`PropertyValue::native`].
#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarInput {
    Bool(bool),
    Integer(i64),
    Unsigned(u64),
    Float(f64),
    String(String),
}

impl From<ScalarInput> for PropertyValue {
    fn from(value: ScalarInput) -> Self {
        match value {
            ScalarInput::Bool(b) => Self::Bool(b),
            ScalarInput::Integer(i) => Self::Integer(i),
            ScalarInput::Unsigned(u) => Self::String(u.to_string()),
            ScalarInput::Float(f) => Self::String(f.to_string()),
            ScalarInput::String(s) => Self::String(s),
        }
    }
}

impl PropertyValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Keeps booleans and integers as they are, anything else scalar becomes a string.
    fn native(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::String(n.to_string()),
            }),
            Value::String(s) => Some(Self::String(s.clone())),
            _ => None,
        }
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Scalar properties attached to a listing.
///
/// Empty strings are dropped on insert, so the map never holds an empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, PropertyValue>")]
pub struct NormalizedProperties(BTreeMap<String, PropertyValue>);

impl NormalizedProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` unless it is empty. Returns whether it was stored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.0.insert(key.into(), value);
        true
    }

    /// Layers `other` on top, its values win on conflicting keys.
    pub fn merge(&mut self, other: &NormalizedProperties) {
        for (key, value) in other.iter() {
            self.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropertyValue::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropertyValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, PropertyValue>> for NormalizedProperties {
    fn from(map: BTreeMap<String, PropertyValue>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for NormalizedProperties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut props = Self::new();
        for (key, value) in iter {
            props.insert(key, value);
        }
        props
    }
}

/// The inspect link, either given directly or taken from the first "Inspect…" action.
pub fn inspect_url(item: &RawItem) -> Option<&str> {
    if let Some(url) = item.str("inspect_url") {
        return Some(url);
    }

    item.array("actions")
        .iter()
        .find(|action| {
            action
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.starts_with("Inspect"))
        })
        .and_then(|action| action.get("link"))
        .and_then(Value::as_str)
        .filter(|link| !link.is_empty())
}

/// Pulls the listing properties out of a raw item.
///
/// `fallback_owner` is used when the item itself does not say who owns it.
/// Fails only if the item carries a trade hold we cannot read.
pub fn extract(
    item: &RawItem,
    fallback_owner: Option<&str>,
    clock: &dyn Clock,
) -> Result<NormalizedProperties, ParseError> {
    let mut props = NormalizedProperties::new();

    for key in ITEM_PROPS {
        let value = if NATIVE_PROPS.contains(key) {
            item.get(key).and_then(PropertyValue::native)
        } else {
            item.get(key).and_then(scalar_string).map(PropertyValue::String)
        };

        if let Some(value) = value {
            props.insert(*key, value);
        }
    }

    let owner = item
        .scalar("owner")
        .or_else(|| item.scalar("owner_steamid"))
        .or_else(|| fallback_owner.map(str::to_string));
    if let Some(owner) = owner {
        props.insert("owner_steamid", owner);
    }

    match item.str("hash") {
        Some(hash) => props.insert("hash", hash),
        None => props.insert("hash", fingerprint::fingerprint(item)),
    };

    if let Some(icon) = item.str("icon_url_large") {
        props.insert("icon_url", icon);
    }

    if let Some(url) = inspect_url(item) {
        props.insert("inspect_url", url);
    }

    if let Some(ts) = trade_hold::trade_hold(item, clock)? {
        props.insert("tradable_after", trade_hold::format_timestamp(&ts));
    }

    for key in OPTIONAL_PROPS {
        if let Some(value) = item.scalar(key) {
            props.insert(*key, value);
        }
    }

    Ok(props)
}
