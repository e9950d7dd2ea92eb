//! Autocomplete handlers for Discord slash command parameters.

use crate::{
    bot::Context,
    core::{items::Item, jobs::Job},
};

/// Case-insensitive substring matches from `names`, capped at Discord's 25 suggestions.
fn matching(names: impl Iterator<Item = &'static str>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    names
        .filter(|name| name.contains(&partial_lower))
        .map(str::to_string)
        .take(25)
        .collect()
}

/// Suggests shop item ids.
pub async fn autocomplete_item(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    matching(Item::ALL.into_iter().map(Item::id), partial)
}

/// Suggests job ids.
pub async fn autocomplete_job(_ctx: Context<'_>, partial: &str) -> Vec<String> {
    matching(Job::ALL.into_iter().map(Job::id), partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive() {
        let names = ["fishing_rod", "golden_ticket", "shield"];
        assert_eq!(
            matching(names.into_iter(), "GOLD"),
            vec!["golden_ticket".to_string()]
        );
        assert_eq!(matching(names.into_iter(), "").len(), 3);
    }

    #[test]
    fn test_every_item_is_suggested_for_empty_input() {
        let all = matching(Item::ALL.into_iter().map(Item::id), "");
        assert_eq!(all.len(), Item::ALL.len());
    }
}
