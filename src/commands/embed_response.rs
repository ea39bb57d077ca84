//! Embed response formatters for bot commands.
//!
//! This module turns world status records into Discord messages. Worlds are
//! partitioned into sections (maintenance, character creation unavailable),
//! each rendered as one embed with one inline field per group.

use std::collections::BTreeMap;

use crate::{
    commands::Presentation,
    discord::{Embed, EmbedField, ResponseData, Thumbnail},
    ffxiv::World,
};

/// Answer to the `ping` command.
pub const PONG: &str = "Pong.";
/// Answer when no world is flagged.
pub const ALL_CLEAR: &str = "Everything looks good.";
/// Answer when the status API cannot be reached.
pub const FETCH_FAILED: &str = "Could not check availability.";

const MAINTENANCE_SECTION: &str = "Maintenance";
const CHARACTER_CREATION_SECTION: &str = "Character creation unavailable";
/// Field name for worlds the API reports without a group.
const UNGROUPED: &str = "Other";

/// Splits worlds into the maintenance and character creation sections.
///
/// Both predicates are independent: a world can be in both sections or in none.
///
/// # Returns
///
/// `(maintenance, character_creation_unavailable)`, in upstream order.
pub fn partition(worlds: &[World]) -> (Vec<&World>, Vec<&World>) {
    let maintenance = worlds.iter().filter(|w| w.in_maintenance()).collect();
    let character_creation = worlds
        .iter()
        .filter(|w| w.character_creation_unavailable())
        .collect();

    (maintenance, character_creation)
}

/// Groups world names by group, both sorted lexicographically.
///
/// Worlds without a group are gathered under `Other`.
pub fn group_worlds<'a>(worlds: &[&'a World]) -> BTreeMap<&'a str, Vec<&'a str>> {
    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for world in worlds {
        let group = match world.group.trim() {
            "" => UNGROUPED,
            group => group,
        };

        groups
            .entry(group)
            .or_default()
            .push(world.name.as_str());
    }

    for names in groups.values_mut() {
        names.sort_unstable();
    }

    groups
}

fn format_section(label: &str, worlds: &[&World], presentation: &Presentation) -> Embed {
    let fields = group_worlds(worlds)
        .into_iter()
        .map(|(group, names)| EmbedField {
            name: group.to_owned(),
            value: names.join("\n"),
            inline: true,
        })
        .collect();

    Embed {
        title: Some(presentation.title.clone()),
        description: Some(label.to_owned()),
        fields,
        thumbnail: presentation
            .thumbnail_url
            .as_ref()
            .map(|url| Thumbnail { url: url.clone() }),
    }
}

/// Formats the status of every flagged world.
///
/// # Arguments
///
/// * `worlds` - Worlds returned by the status API
/// * `presentation` - Embed title and optional thumbnail
///
/// # Returns
///
/// The all-clear text when no world is flagged, otherwise one embed per
/// non-empty section, maintenance first.
///
/// # Examples
///
/// ```no_run
/// let message = format_status(&[], &Presentation::default());
/// assert_eq!(message.content.as_deref(), Some("Everything looks good."));
/// ```
pub fn format_status(worlds: &[World], presentation: &Presentation) -> ResponseData {
    let (maintenance, character_creation) = partition(worlds);

    let embeds: Vec<Embed> = [
        (MAINTENANCE_SECTION, maintenance),
        (CHARACTER_CREATION_SECTION, character_creation),
    ]
    .into_iter()
    .filter(|(_, worlds)| !worlds.is_empty())
    .map(|(label, worlds)| format_section(label, &worlds, presentation))
    .collect();

    if embeds.is_empty() {
        return ResponseData::text(ALL_CLEAR);
    }

    ResponseData {
        content: None,
        embeds,
    }
}

/// Formats the worlds where new characters cannot be created.
///
/// Same rules as [`format_status`], restricted to the character creation section.
pub fn format_character_creation(worlds: &[World], presentation: &Presentation) -> ResponseData {
    let (_, character_creation) = partition(worlds);

    if character_creation.is_empty() {
        return ResponseData::text(ALL_CLEAR);
    }

    ResponseData {
        content: None,
        embeds: vec![format_section(
            CHARACTER_CREATION_SECTION,
            &character_creation,
            presentation,
        )],
    }
}
