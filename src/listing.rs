use serde::Serialize;

use crate::{
    description::{self, DescriptionOptions},
    properties::{self, NormalizedProperties},
    tags, Clock, ParseError, RawItem, SystemClock,
};

/// A marketplace listing for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub steam_properties: NormalizedProperties,
}

/// Turns raw inventory items into [`Listing`]s.
///
/// Holds no per-item state, so a single builder can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ListingBuilder<C = SystemClock> {
    clock: C,
    options: DescriptionOptions,
}

impl ListingBuilder<SystemClock> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> ListingBuilder<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            options: DescriptionOptions::default(),
        }
    }

    pub fn options(mut self, options: DescriptionOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the listing for `item`.
    ///
    /// Properties are layered as owner override, then `overlay`, then the
    /// item's own properties, then the sticker block found in its description.
    /// Fails only on an unreadable trade hold, in which case nothing is built.
    #[tracing::instrument(skip_all, fields(item = item.display_name().unwrap_or_default()))]
    pub fn build(
        &self,
        item: &RawItem,
        overlay: Option<&NormalizedProperties>,
        owner_steamid: Option<&str>,
    ) -> Result<Listing, ParseError> {
        let extracted = properties::extract(item, owner_steamid, &self.clock)?;
        let (description, sidecar) = description::assemble(item, self.options);

        let mut steam_properties = NormalizedProperties::new();
        if let Some(owner) = owner_steamid {
            steam_properties.insert("owner_steamid", owner);
        }
        if let Some(overlay) = overlay {
            steam_properties.merge(overlay);
        }
        steam_properties.merge(&extracted);
        if let Some(sticker) = sidecar.sticker {
            steam_properties.insert("sticker", sticker);
        }

        let listing = Listing {
            name: item.display_name().unwrap_or_default().to_string(),
            description,
            tags: tags::canonical_tags(
                item.array("tags"),
                item.str("name"),
                item.str("market_hash_name"),
            ),
            steam_properties,
        };

        tracing::trace!(?listing, "Built listing");

        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{properties::PropertyValue, FixedClock};
    use chrono::DateTime;
    use serde_json::json;

    fn builder() -> ListingBuilder<FixedClock> {
        ListingBuilder::with_clock(FixedClock(DateTime::from_timestamp(1_500_000_000, 0).unwrap()))
    }

    #[test]
    fn overlay_loses_to_item() {
        let item = RawItem::from(json!({ "id": "42", "name": "Case", "owner": "1" }));
        let overlay: NormalizedProperties = [("id", "0"), ("price", "1.00"), ("owner_steamid", "9")]
            .into_iter()
            .collect();

        let listing = builder().build(&item, Some(&overlay), Some("2")).unwrap();
        let props = &listing.steam_properties;

        assert_eq!(props.get_str("id"), Some("42"));
        assert_eq!(props.get_str("price"), Some("1.00"));
        assert_eq!(props.get_str("owner_steamid"), Some("1"));
    }

    #[test]
    fn owner_override_fills_gap() {
        let item = RawItem::from(json!({ "name": "Case" }));
        let listing = builder().build(&item, None, Some("76561198277655553")).unwrap();

        assert_eq!(
            listing.steam_properties.get("owner_steamid"),
            Some(&PropertyValue::String("76561198277655553".into()))
        );
    }

    #[test]
    fn sticker_lands_in_properties() {
        let item = RawItem::from(json!({
            "market_name": "AK-47 | Redline (Field-Tested)",
            "descriptions": [{ "value": "<br><div id=\"sticker_info\">stickers</div>" }],
        }));

        let listing = builder().build(&item, None, None).unwrap();

        assert_eq!(listing.name, "AK-47 | Redline (Field-Tested)");
        assert_eq!(listing.description, ".");
        assert_eq!(
            listing.steam_properties.get_str("sticker"),
            Some("<br><div id=\"sticker_info\">stickers</div>")
        );
    }

    #[test]
    fn unreadable_trade_hold_aborts() {
        let item = RawItem::from(json!({
            "name": "Case",
            "tradable": 0,
            "owner_descriptions": [{ "value": "Tradable After-" }],
        }));

        assert_eq!(
            builder().build(&item, None, None),
            Err(ParseError::UnrecognizedTradeHold {
                text: "Tradable After-".into()
            })
        );
    }
}
