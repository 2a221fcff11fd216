use sha2::{Digest, Sha256};

use crate::RawItem;

/// Bumped whenever the fingerprint scheme changes so hashes from different
/// schemes can never collide.
pub const FORMAT_VERSION: u32 = 1;

/// Content fingerprint identifying an item kind rather than an item instance.
///
/// Format: `{version}|{appid}|{display name}|{sha256 hex}` where the digest
/// covers the item type and every tag as `|{category}: {internal name}` in the
/// order the service returned them. Asset ids, amounts and owners are ignored,
/// so two copies of the same case hash identically.
pub fn fingerprint(item: &RawItem) -> String {
    let mut hasher = Sha256::new();

    if let Some(ty) = item.str("type") {
        hasher.update(ty.as_bytes());
    }

    for tag in item.tags() {
        let entry = format!(
            "|{}: {}",
            tag.category().unwrap_or_default(),
            tag.internal_name().unwrap_or_default()
        );
        hasher.update(entry.as_bytes());
    }

    format!(
        "{}|{}|{}|{:x}",
        FORMAT_VERSION,
        item.appid().unwrap_or_default(),
        item.display_name().unwrap_or_default(),
        hasher.finalize()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn container() {
        let item = RawItem::from(json!({
            "appid": 730,
            "market_hash_name": "Chroma 3 Case",
            "type": "Base Grade Container",
            "tags": [{ "category": "Type", "name": "Container" }],
        }));

        // sha256("Base Grade Container|Type: Container")
        assert_eq!(
            fingerprint(&item),
            "1|730|Chroma 3 Case|3d8d28cb269e7cd144d096e683c81740dbebb951e92e11ed054b58c0e8446375"
        );
    }

    #[test]
    fn prefers_category_name_and_internal_name() {
        let item = RawItem::from(json!({
            "appid": "730",
            "name": "Chroma 3 Case",
            "type": "Base Grade Container",
            "tags": [
                { "internal_name": "CSGO_Type_WeaponCase", "name": "Container", "category": "Type", "category_name": "Type" },
                { "internal_name": "set_community_12", "name": "The Chroma 3 Collection", "category": "ItemSet", "category_name": "Collection" },
                { "internal_name": "normal", "name": "Normal", "category": "Quality", "category_name": "Category" },
                { "internal_name": "Rarity_Common", "name": "Base Grade", "category": "Rarity", "category_name": "Quality" },
            ],
        }));

        assert_eq!(
            fingerprint(&item),
            "1|730|Chroma 3 Case|251fbeec6b53918eb19cb0d7d0de9ce13a580c1f1981551ff3098c4f667cbf59"
        );
    }

    #[test]
    fn ignores_instance_fields() {
        let a = RawItem::from(json!({
            "id": "8795563285", "amount": 1, "owner": "76561198277655553",
            "appid": 730, "name": "Chroma 3 Case", "type": "Base Grade Container",
        }));
        let b = RawItem::from(json!({
            "id": "1", "amount": 20, "owner_steamid": "76561190000000000",
            "appid": 730, "name": "Chroma 3 Case", "type": "Base Grade Container",
        }));

        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn tag_order_matters() {
        let a = RawItem::from(json!({ "tags": [{ "category": "A", "name": "1" }, { "category": "B", "name": "2" }] }));
        let b = RawItem::from(json!({ "tags": [{ "category": "B", "name": "2" }, { "category": "A", "name": "1" }] }));

        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn empty_item() {
        assert_eq!(
            fingerprint(&RawItem::default()),
            "1|||e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
