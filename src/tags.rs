use serde_json::Value;

use crate::{
    item::TagRef,
    text::{collapse_whitespace, truncate_chars},
};

pub const MAX_TAGS: usize = 32;
pub const MAX_TAG_CHARS: usize = 128;

/// Whitespace-collapsed, trimmed and capped at [`MAX_TAG_CHARS`] characters.
pub fn canonicalize(tag: &str) -> String {
    truncate_chars(&collapse_whitespace(tag), MAX_TAG_CHARS).trim_end().to_string()
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Builds the searchable tag list for a listing.
///
/// Order is `market_hash_name: ...`, `name: ...`, then one
/// `Category: Tag` entry per raw tag that has a localized category. Blank
/// names and categories produce no tag.
pub fn canonical_tags(
    raw_tags: &[Value],
    name: Option<&str>,
    market_hash_name: Option<&str>,
) -> Vec<String> {
    let mut tags: Vec<String> = raw_tags
        .iter()
        .filter_map(TagRef::new)
        .filter_map(|tag| {
            let category = tag.localized_category().filter(|c| !is_blank(c))?;
            Some(format!("{}: {}", category, tag.display_name().unwrap_or_default()))
        })
        .collect();

    if let Some(name) = name.filter(|n| !is_blank(n)) {
        tags.insert(0, format!("name: {name}"));
    }
    if let Some(market_hash_name) = market_hash_name.filter(|n| !is_blank(n)) {
        tags.insert(0, format!("market_hash_name: {market_hash_name}"));
    }

    tags.iter()
        .map(|tag| canonicalize(tag))
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .collect()
}
