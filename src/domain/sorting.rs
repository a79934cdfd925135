use crate::domain::item::Item;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Orderings available for the catalog view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Board tier order, best tier first; unranked items last.
    #[default]
    Tier,
    /// View count, most viewed first.
    Views,
    /// Group name, then title.
    Alpha,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tier" => Ok(SortKey::Tier),
            "views" => Ok(SortKey::Views),
            "alpha" => Ok(SortKey::Alpha),
            _ => Err(format!(
                "Invalid sort key '{}'. Valid keys: tier, views, alpha",
                s
            )),
        }
    }
}

/// Sorts the catalog in place by the given key.
///
/// `tier_order` is the board's label order, best first. Tier sorting breaks
/// ties alphabetically on the group name; the sort is stable, so otherwise
/// equal items keep their fetch order.
pub fn sort_items(items: &mut [Item], key: SortKey, tier_order: &[String]) {
    items.sort_by(|a, b| match key {
        SortKey::Tier => tier_rank(a, tier_order)
            .cmp(&tier_rank(b, tier_order))
            .then_with(|| a.group.cmp(&b.group)),
        SortKey::Views => b.views.cmp(&a.views),
        SortKey::Alpha => a.group.cmp(&b.group).then_with(|| a.title.cmp(&b.title)),
    });
}

/// Rank of an item's tier within the board order. Unranked items, and items
/// tagged with a tier no longer on the board, sort to the end.
fn tier_rank(item: &Item, tier_order: &[String]) -> usize {
    item.tier
        .as_ref()
        .and_then(|t| tier_order.iter().position(|label| label == t))
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(group: &str, title: &str, tier: Option<&str>, views: u64) -> Item {
        let mut item = Item::new(group, title, format!("{group}_{title}"));
        item.tier = tier.map(str::to_string);
        item.views = views;
        item
    }

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!(SortKey::from_str("tier").unwrap(), SortKey::Tier);
        assert_eq!(SortKey::from_str("VIEWS").unwrap(), SortKey::Views);
        assert_eq!(SortKey::from_str("alpha").unwrap(), SortKey::Alpha);
        assert!(SortKey::from_str("rating").is_err());
    }

    #[test]
    fn test_tier_sort_places_unranked_last() {
        let mut items = vec![
            item("gamma", "t1", Some("A"), 0),
            item("delta", "t2", Some("B"), 0),
            item("omega", "t3", None, 0),
            item("alpha", "t4", Some("A"), 0),
        ];
        sort_items(&mut items, SortKey::Tier, &order(&["S", "A", "B"]));

        // Both "A" items precede "B"; the unranked one is last; the tie
        // between the two "A" items breaks alphabetically on group.
        assert_eq!(items[0].group, "alpha");
        assert_eq!(items[1].group, "gamma");
        assert_eq!(items[2].group, "delta");
        assert_eq!(items[3].group, "omega");
    }

    #[test]
    fn test_tier_sort_treats_stale_tier_as_unranked() {
        let mut items = vec![
            item("one", "t", Some("Retired"), 0),
            item("two", "t", Some("S"), 0),
        ];
        sort_items(&mut items, SortKey::Tier, &order(&["S", "A"]));
        assert_eq!(items[0].group, "two");
        assert_eq!(items[1].group, "one");
    }

    #[test]
    fn test_views_sort_descending() {
        let mut items = vec![
            item("a", "low", None, 10),
            item("b", "high", None, 1_000),
            item("c", "mid", None, 500),
        ];
        sort_items(&mut items, SortKey::Views, &[]);
        assert_eq!(items[0].title, "high");
        assert_eq!(items[1].title, "mid");
        assert_eq!(items[2].title, "low");
    }

    #[test]
    fn test_alpha_sort_group_then_title() {
        let mut items = vec![
            item("beta", "z", None, 0),
            item("alpha", "b", None, 0),
            item("alpha", "a", None, 0),
        ];
        sort_items(&mut items, SortKey::Alpha, &[]);
        assert_eq!(
            items
                .iter()
                .map(|i| (i.group.as_str(), i.title.as_str()))
                .collect::<Vec<_>>(),
            vec![("alpha", "a"), ("alpha", "b"), ("beta", "z")]
        );
    }
}
