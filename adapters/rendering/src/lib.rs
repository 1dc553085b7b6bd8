#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for commander sandbox adapters.

mod camera;
mod picking;

use anyhow::Result as AnyResult;
use commander_core::{PointerInput, SelectionDetails, UnitColor, UnitId, UnitSnapshot};
use glam::Vec2;
use std::{error::Error, fmt};

pub use camera::CameraPan;
pub use picking::{pick_flat, pick_ray, Ray, UNIT_PICK_RADIUS};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a copy of the color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self {
            red: self.red,
            green: self.green,
            blue: self.blue,
            alpha,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

impl From<UnitColor> for Color {
    fn from(color: UnitColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer presses resolved against the scene on this frame, primary first.
    pub pointers: Vec<PointerInput>,
}

/// Describes the scrolling ground grid drawn beneath the units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPresentation {
    /// Distance between neighbouring grid lines in world units.
    pub spacing: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
}

impl GroundPresentation {
    /// Grid spacing of the flat sandbox view.
    pub const DEFAULT_SPACING: f32 = 50.0;

    /// Creates a new ground descriptor.
    ///
    /// Returns an error when `spacing` is not a positive finite number.
    pub fn new(spacing: f32, line_color: Color) -> Result<Self, RenderingError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(RenderingError::InvalidGridSpacing { spacing });
        }

        Ok(Self {
            spacing,
            line_color,
        })
    }

    /// Screen-space coordinates of the grid lines crossing an axis of length `extent`
    /// when the camera is offset by `offset` along that axis.
    #[must_use]
    pub fn line_offsets(&self, offset: f32, extent: f32) -> Vec<f32> {
        let mut lines = Vec::new();
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return lines;
        }
        let mut position = offset.rem_euclid(self.spacing);
        while position < extent {
            lines.push(position);
            position += self.spacing;
        }
        lines
    }
}

/// Unit drawn as a coloured disc with a label above it.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitPresentation {
    /// Identifier of the presented unit.
    pub unit: UnitId,
    /// Position of the unit in world units.
    pub position: Vec2,
    /// Fill color of the disc.
    pub color: Color,
    /// Upper-cased label rendered above the disc.
    pub label: String,
    /// Whether the unit should be drawn with the selection ring.
    pub selected: bool,
}

impl UnitPresentation {
    /// Creates a new unit descriptor.
    #[must_use]
    pub fn new(unit: UnitId, position: Vec2, color: Color, label: String, selected: bool) -> Self {
        Self {
            unit,
            position,
            color,
            label,
            selected,
        }
    }

    /// Builds the presentation for a world snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &UnitSnapshot) -> Self {
        Self::new(
            snapshot.id,
            snapshot.position,
            Color::from(snapshot.color),
            snapshot.display_name.to_uppercase(),
            snapshot.selected,
        )
    }
}

/// Side panel describing the selected commander.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionPanel {
    /// Display name of the selected unit.
    pub title: String,
    /// Accent color derived from the archetype.
    pub accent: Color,
    /// Archetype description.
    pub description: String,
    /// Speed multiplier of the archetype.
    pub speed_multiplier: f32,
}

impl From<SelectionDetails> for SelectionPanel {
    fn from(details: SelectionDetails) -> Self {
        Self {
            title: details.display_name,
            accent: Color::from(details.color),
            description: details.description,
            speed_multiplier: details.speed_multiplier,
        }
    }
}

/// Scene description combining the ground, the units and the selection panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Ground grid drawn beneath everything else.
    pub ground: GroundPresentation,
    /// Units currently on the field in spawn order.
    pub units: Vec<UnitPresentation>,
    /// Panel describing the selected unit, if any.
    pub selection: Option<SelectionPanel>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        ground: GroundPresentation,
        units: Vec<UnitPresentation>,
        selection: Option<SelectionPanel>,
    ) -> Self {
        Self {
            ground,
            units,
            selection,
        }
    }

    /// Iterator over unit identifiers paired with their world positions.
    pub fn unit_positions(&self) -> impl Iterator<Item = (UnitId, Vec2)> + '_ {
        self.units.iter().map(|unit| (unit.unit, unit.position))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting commander scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure is called once per frame with the
    /// input captured by the adapter and may mutate the scene before it is
    /// rendered. Each call corresponds to one simulation tick.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Grid spacing must be positive and finite.
    InvalidGridSpacing {
        /// Provided spacing that failed validation.
        spacing: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGridSpacing { spacing } => {
                write!(
                    f,
                    "grid spacing must be positive and finite (received {spacing})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
