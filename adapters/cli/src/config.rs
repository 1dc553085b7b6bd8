//! TOML configuration for the roster, tuning and spawn layout.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use commander_core::{Archetype, ArchetypeId, Layout, Roster, Tuning, UnitColor};
use serde::Deserialize;

/// Fully resolved settings used to build a simulation.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    /// Archetypes spawned at start-up.
    pub(crate) roster: Roster,
    /// Speed and arrival constants.
    pub(crate) tuning: Tuning,
    /// Placement of the spawned units.
    pub(crate) layout: Layout,
}

/// Command-line values that take precedence over the configuration file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) base_speed: Option<f32>,
    pub(crate) arrival_threshold: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    tuning: TuningSection,
    layout: Option<Layout>,
    archetypes: Vec<ArchetypeEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TuningSection {
    base_speed: Option<f32>,
    arrival_threshold: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArchetypeEntry {
    id: String,
    name: String,
    color: String,
    speed_multiplier: f32,
    #[serde(default)]
    description: String,
}

/// Loads settings from `path`, falling back to the built-in defaults when no file is given.
pub(crate) fn load(path: Option<&Path>, overrides: Overrides) -> Result<Settings> {
    let contents = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?,
        None => String::new(),
    };

    parse(&contents, overrides).with_context(|| match path {
        Some(path) => format!("invalid configuration {}", path.display()),
        None => "invalid default configuration".to_owned(),
    })
}

fn parse(contents: &str, overrides: Overrides) -> Result<Settings> {
    let file: ConfigFile = toml::from_str(contents).context("failed to parse TOML")?;

    let defaults = Tuning::default();
    let base_speed = overrides
        .base_speed
        .or(file.tuning.base_speed)
        .unwrap_or_else(|| defaults.base_speed());
    let arrival_threshold = overrides
        .arrival_threshold
        .or(file.tuning.arrival_threshold)
        .unwrap_or_else(|| defaults.arrival_threshold());
    let tuning = Tuning::new(base_speed, arrival_threshold).context("invalid tuning")?;

    let roster = if file.archetypes.is_empty() {
        Roster::commanders()
    } else {
        let archetypes = file
            .archetypes
            .into_iter()
            .map(ArchetypeEntry::into_archetype)
            .collect::<Result<Vec<_>>>()?;
        Roster::new(archetypes).context("invalid roster")?
    };

    Ok(Settings {
        roster,
        tuning,
        layout: file.layout.unwrap_or_default(),
    })
}

impl ArchetypeEntry {
    fn into_archetype(self) -> Result<Archetype> {
        let color = UnitColor::from_hex(&self.color)
            .with_context(|| format!("invalid colour for archetype {}", self.id))?;

        Ok(Archetype::new(
            ArchetypeId::new(self.id),
            self.name,
            color,
            self.speed_multiplier,
            self.description,
        ))
    }
}
