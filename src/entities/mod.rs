//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables; list-valued fields are stored
//! as JSON text and decoded by the store layer.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod jail;
pub mod lottery;
pub mod settings;
pub mod warning;

// Re-export specific types to avoid conflicts with the domain records
pub use account::{Column as AccountColumn, Entity as Accounts, Model as AccountModel};
pub use jail::{Column as JailColumn, Entity as Jails, Model as JailModel};
pub use lottery::{Column as LotteryColumn, Entity as Lotteries, Model as LotteryModel};
pub use settings::{Column as SettingsColumn, Entity as Settings, Model as SettingsModel};
pub use warning::{Column as WarningColumn, Entity as Warnings, Model as WarningModel};
