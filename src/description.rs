use serde_json::Value;

use crate::{
    text::{strip_html, truncate_chars},
    RawItem,
};

pub const FRAGMENT_MAX_CHARS: usize = 1023;
pub const DESCRIPTION_MAX_CHARS: usize = 4095;

const EMPTY_DESCRIPTION: &str = ".";
const FRAGMENT_SEPARATOR: &str = "\n\n";

const STICKER_MARKER: &str = r#"id="sticker_info""#;

// Dota 2 renders its inscription/gem blocks as inline styled divs with white
// text, which is unreadable on a light background.
const DOTA2_APPID: &str = "570";
const DOTA2_STICKER_MARKER: &str = "<div style=";
const DOTA2_LIGHT_TEXT: &str = "color: rgb(255, 255, 255)";
const DOTA2_DARK_TEXT: &str = "color: rgb(55, 55, 55)";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescriptionOptions {
    /// Append a `Category: Name, ...` line summarizing the item's tags.
    pub tag_summary: bool,
}

/// Values pulled out of the description that belong in the listing properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionSidecar {
    /// Raw sticker HTML block.
    pub sticker: Option<String>,
}

enum Fragment {
    Text(String),
    Sticker(String),
    Skip,
}

fn classify(value: &str, appid: Option<&str>) -> Fragment {
    if value.contains(STICKER_MARKER) {
        return Fragment::Sticker(value.to_string());
    }

    if appid == Some(DOTA2_APPID) && value.contains(DOTA2_STICKER_MARKER) {
        return Fragment::Sticker(value.replace(DOTA2_LIGHT_TEXT, DOTA2_DARK_TEXT));
    }

    let text = strip_html(value);
    let text = text.trim();
    if text.is_empty() {
        Fragment::Skip
    } else {
        Fragment::Text(text.to_string())
    }
}

fn tag_summary(item: &RawItem) -> String {
    item.tags()
        .filter_map(|tag| {
            let name = tag.display_name()?;
            Some(match tag.category() {
                Some(category) => format!("{category}: {name}"),
                None => name.to_string(),
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the listing description from fraud warnings and the item's
/// description blocks.
///
/// Sticker blocks are not part of the text; they come back in the sidecar.
/// Each fragment is capped at [`FRAGMENT_MAX_CHARS`], the whole text at
/// [`DESCRIPTION_MAX_CHARS`], and an item with nothing to say gets `"."`.
pub fn assemble(item: &RawItem, options: DescriptionOptions) -> (String, DescriptionSidecar) {
    let appid = item.appid();
    let mut sidecar = DescriptionSidecar::default();

    let mut fragments: Vec<String> = item
        .array("fraudwarnings")
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();

    for entry in item.array("descriptions") {
        let Some(value) = entry.get("value").and_then(Value::as_str) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        match classify(value, appid.as_deref()) {
            Fragment::Text(text) => fragments.push(text),
            Fragment::Sticker(sticker) => sidecar.sticker = Some(sticker),
            Fragment::Skip => {}
        }
    }

    if options.tag_summary {
        fragments.push(tag_summary(item));
    }

    let joined = fragments
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| truncate_chars(f, FRAGMENT_MAX_CHARS))
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR);

    let description = truncate_chars(&joined, DESCRIPTION_MAX_CHARS);
    let description = if description.is_empty() {
        EMPTY_DESCRIPTION.to_string()
    } else {
        description.to_string()
    };

    (description, sidecar)
}
