//! Shop catalog.
//!
//! Every purchasable item has a fixed price and one of three behaviours:
//! an instant effect applied on `use`, a boost flag consumed later by another
//! ledger operation, or a passive effect that applies while the item is owned.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Items sold in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    /// Doubles the payout of the next `work`
    Potion,
    /// Raises the success chance of the next robbery
    Sword,
    /// Protects the owner's wallet from robbery for a day
    Shield,
    /// Boosts gambling payouts for an hour
    LuckyCharm,
    /// Grants experience immediately
    XpScroll,
    /// One free lottery entry
    GoldenTicket,
    /// Shortens the daily cooldown while owned
    DailyBooster,
    /// Shortens the weekly cooldown while owned
    WeeklyBooster,
    /// Shortens the monthly cooldown while owned
    MonthlyBooster,
}

/// How an item takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemUse {
    /// Consumed by `use`, effect applied immediately or armed for later
    Consumable,
    /// Consumed by a specific command other than `use`
    Command(&'static str),
    /// Never consumed; works while it sits in the inventory
    Passive,
}

impl Item {
    /// Every item in shop display order.
    pub const ALL: [Self; 9] = [
        Self::Potion,
        Self::Sword,
        Self::Shield,
        Self::LuckyCharm,
        Self::XpScroll,
        Self::GoldenTicket,
        Self::DailyBooster,
        Self::WeeklyBooster,
        Self::MonthlyBooster,
    ];

    /// Identifier used in commands and storage.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Potion => "potion",
            Self::Sword => "sword",
            Self::Shield => "shield",
            Self::LuckyCharm => "lucky_charm",
            Self::XpScroll => "xp_scroll",
            Self::GoldenTicket => "golden_ticket",
            Self::DailyBooster => "daily_booster",
            Self::WeeklyBooster => "weekly_booster",
            Self::MonthlyBooster => "monthly_booster",
        }
    }

    /// Shop price in coins.
    #[must_use]
    pub const fn price(self) -> i64 {
        match self {
            Self::Potion => 250,
            Self::Sword => 400,
            Self::Shield => 500,
            Self::LuckyCharm => 300,
            Self::XpScroll => 150,
            Self::GoldenTicket => 200,
            Self::DailyBooster => 1_000,
            Self::WeeklyBooster => 3_000,
            Self::MonthlyBooster => 10_000,
        }
    }

    /// One-line shop description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Potion => "Double earnings on your next shift",
            Self::Sword => "60% robbery success on your next attempt",
            Self::Shield => "Robbery protection for 24 hours",
            Self::LuckyCharm => "Better gambling payouts for 1 hour",
            Self::XpScroll => "Instantly gain 100 XP",
            Self::GoldenTicket => "One free lottery entry (`lottery join free`)",
            Self::DailyBooster => "Daily cooldown 6 hours shorter while owned",
            Self::WeeklyBooster => "Weekly cooldown 1 day shorter while owned",
            Self::MonthlyBooster => "Monthly cooldown 3 days shorter while owned",
        }
    }

    /// How the item is spent.
    #[must_use]
    pub const fn usage(self) -> ItemUse {
        match self {
            Self::Potion | Self::Sword | Self::Shield | Self::LuckyCharm | Self::XpScroll => {
                ItemUse::Consumable
            }
            Self::GoldenTicket => ItemUse::Command("lottery join free"),
            Self::DailyBooster | Self::WeeklyBooster | Self::MonthlyBooster => ItemUse::Passive,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Item {
    type Err = crate::errors::Error;

    /// Accepts the identifier with spaces, dashes or underscores, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|item| item.id() == normalized)
            .ok_or_else(|| crate::errors::Error::not_found(format!("Item `{}`", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;

    #[test]
    fn test_parse_item_names() {
        assert_eq!("potion".parse::<Item>().unwrap(), Item::Potion);
        assert_eq!("Lucky Charm".parse::<Item>().unwrap(), Item::LuckyCharm);
        assert_eq!("golden-ticket".parse::<Item>().unwrap(), Item::GoldenTicket);
        assert!(matches!("banana".parse::<Item>(), Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_every_item_round_trips_through_id() {
        for item in Item::ALL {
            assert_eq!(item.id().parse::<Item>().unwrap(), item);
            assert!(item.price() > 0);
        }
    }

    #[test]
    fn test_serde_uses_snake_case_ids() {
        let json = serde_json::to_string(&vec![Item::LuckyCharm, Item::XpScroll]).unwrap();
        assert_eq!(json, r#"["lucky_charm","xp_scroll"]"#);
    }
}
