use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An item record as handed to us by the inventory service.
///
/// Every field is optional and may carry an unexpected type, so all access goes
/// through accessors that treat "missing", "null", "wrong type" and "empty" the
/// same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawItem(Value);

impl From<Value> for RawItem {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl RawItem {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// The field as a non-empty string. Numbers and booleans are not converted.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The field as a non-empty string, stringifying numbers and booleans.
    pub fn scalar(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_string)
    }

    /// The field as an array, or an empty slice for anything else.
    pub fn array(&self, key: &str) -> &[Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn tags(&self) -> impl Iterator<Item = TagRef<'_>> {
        self.array("tags").iter().filter_map(TagRef::new)
    }

    /// First non-empty of `market_hash_name`, `market_name` and `name`.
    pub fn display_name(&self) -> Option<&str> {
        self.str("market_hash_name")
            .or_else(|| self.str("market_name"))
            .or_else(|| self.str("name"))
    }

    pub fn appid(&self) -> Option<String> {
        self.scalar("appid")
    }

    /// Missing or falsy `tradable` flags count as not tradable.
    pub fn is_tradable(&self) -> bool {
        match self.get("tradable") {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
            Some(Value::String(s)) => !matches!(s.trim(), "" | "0" | "false"),
            _ => false,
        }
    }

    /// Items whose name is their market name are interchangeable with any
    /// other copy. Renamed items are not.
    pub fn is_fungible(&self) -> bool {
        let market = self.str("market_hash_name").or_else(|| self.str("market_name"));
        match (self.str("name"), market) {
            (Some(name), Some(market)) => name == market,
            _ => false,
        }
    }
}

/// Borrowed view over one entry of an item's `tags` array.
#[derive(Debug, Clone, Copy)]
pub struct TagRef<'a>(&'a Map<String, Value>);

impl<'a> TagRef<'a> {
    pub fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self)
    }

    fn field(&self, key: &str) -> Option<&'a str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn localized_category(&self) -> Option<&'a str> {
        self.field("localized_category_name")
    }

    /// Category used for identity: localized name, then `category_name`, then the raw category.
    pub fn category(&self) -> Option<&'a str> {
        self.localized_category()
            .or_else(|| self.field("category_name"))
            .or_else(|| self.field("category"))
    }

    /// Name used for identity: the internal name is stable across locales.
    pub fn internal_name(&self) -> Option<&'a str> {
        self.field("internal_name")
            .or_else(|| self.field("localized_tag_name"))
            .or_else(|| self.field("name"))
    }

    /// Name shown to people.
    pub fn display_name(&self) -> Option<&'a str> {
        self.field("localized_tag_name").or_else(|| self.field("name"))
    }
}

pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };

    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
