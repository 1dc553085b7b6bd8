//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use commander_rendering::SelectionPanel;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Snapshot of the selection panel's layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SelectionPanelUiContext<'scene> {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub(crate) background: Color,
    /// Details of the selected commander.
    pub(crate) panel: &'scene SelectionPanel,
}

/// Renders the selected commander's name, speed and description.
pub(crate) fn draw_selection_panel_ui(ui: &mut Ui, context: SelectionPanelUiContext<'_>) {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    ui.push_skin(&skin);

    let panel = context.panel;
    let _ = ui.window(hash!("selection_panel"), context.origin, context.size, |ui| {
        ui.label(None, &panel.title.to_uppercase());
        ui.label(None, &format!("Speed x{:.1}", panel.speed_multiplier));
        ui.label(None, &panel.description);
    });

    ui.pop_skin();
}
