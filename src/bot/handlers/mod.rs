//! Discord interaction handlers
//!
//! Gateway events that are not commands: autocomplete, button clicks, select
//! menus, chat replies to running games, and the background announcers.

/// Autocomplete handlers for item and job names
pub mod autocomplete;
/// Button and select-menu interactions
pub mod components;
/// Gateway event dispatch
pub mod events;
/// Announcements for expired games and scheduled lottery draws
pub mod expiry;
/// Chat messages answering running games
pub mod messages;
