//! Response structures for the world status API.
//!
//! This module contains structures for deserializing JSON responses from
//! the `worlds` endpoint.

use serde::Deserialize;
use std::fmt;

/// Response from `/worlds`.
///
/// Worlds are kept in upstream order; callers sort for display.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldsResponse {
    /// Every world known by the API.
    #[serde(default)]
    pub worlds: Vec<World>,
}

/// Status of a single game world.
///
/// Missing fields decode to their default value (`false` or an empty string).
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct World {
    /// Group (data center) the world belongs to, e.g. `Aether`.
    pub group: String,
    /// World name, e.g. `Gilgamesh`.
    pub name: String,
    /// Population category, e.g. `Standard` or `Congested`.
    pub category: String,
    /// Raw server status label.
    pub server_status: String,
    /// Whether new characters can be created on the world.
    pub can_create_new_characters: bool,
    /// Whether the world is online.
    pub is_online: bool,
    /// Whether the world is under maintenance.
    pub is_maintenance: bool,
    /// Whether the world is congested.
    pub is_congested: bool,
    /// Whether the world is a preferred world.
    pub is_preferred: bool,
    /// Whether the world was recently added.
    pub is_new: bool,
}

impl World {
    /// Whether the world belongs in the maintenance section.
    pub fn in_maintenance(&self) -> bool {
        self.is_maintenance
    }

    /// Whether the world belongs in the character creation section.
    pub fn character_creation_unavailable(&self) -> bool {
        !self.can_create_new_characters
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "name={}, group={}, category={}, maintenance={}, can_create={}",
            self.name,
            self.group,
            self.category,
            self.is_maintenance,
            self.can_create_new_characters
        )
    }
}
