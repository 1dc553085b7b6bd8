#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the commander sandbox.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The selection panel uses Macroquad's immediate-mode UI module. All
//! UI-specific calls live inside the local `ui` module to avoid leaking
//! Macroquad UI types throughout the renderer.

mod ui;

use self::ui::{draw_selection_panel_ui, SelectionPanelUiContext};
use anyhow::Result;
use commander_core::{PointerButton, PointerInput};
use commander_rendering::{
    pick_flat, CameraPan, Color, FrameInput, GroundPresentation, Presentation, RenderingBackend,
    Scene, UnitPresentation, UNIT_PICK_RADIUS,
};
use glam::Vec2;
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::{
    color::WHITE,
    input::{
        is_key_pressed, is_mouse_button_down, is_mouse_button_pressed, mouse_position, KeyCode,
        MouseButton,
    },
};

const SELECTION_PANEL_WIDTH: f32 = 240.0;
const SELECTION_PANEL_HEIGHT: f32 = 150.0;
const SELECTION_PANEL_MARGIN: f32 = 16.0;
const LABEL_OFFSET: f32 = 25.0;
const LABEL_FONT_SIZE: u16 = 16;
const SELECTION_RING_THICKNESS: f32 = 3.0;
const SELECTION_GLOW_RADIUS: f32 = 8.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);

        Self { quit_requested }
    }
}

/// Raw pointer state sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct PointerObservations {
    cursor: Vec2,
    primary_pressed: bool,
    primary_down: bool,
    secondary_pressed: bool,
}

impl PointerObservations {
    fn poll() -> Self {
        let (cursor_x, cursor_y) = mouse_position();

        Self {
            cursor: Vec2::new(cursor_x, cursor_y),
            primary_pressed: is_mouse_button_pressed(MouseButton::Left),
            primary_down: is_mouse_button_down(MouseButton::Left),
            secondary_pressed: is_mouse_button_pressed(MouseButton::Right),
        }
    }
}

/// Screen rectangle occupied by the selection panel.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PanelLayout {
    origin: Vec2,
    size: Vec2,
}

impl PanelLayout {
    fn for_scene(scene: &Scene, screen_width: f32) -> Option<Self> {
        if scene.selection.is_none() {
            return None;
        }
        let width = SELECTION_PANEL_WIDTH.min(screen_width);
        let left = (screen_width - width - SELECTION_PANEL_MARGIN).max(0.0);

        Some(Self {
            origin: Vec2::new(left, SELECTION_PANEL_MARGIN),
            size: Vec2::new(width, SELECTION_PANEL_HEIGHT),
        })
    }

    fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.x < max.x && point.y >= self.origin.y && point.y < max.y
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Self { swap_interval } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1280,
            window_height: 720,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut camera = CameraPan::default();
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let panel_before = PanelLayout::for_scene(&scene, screen_width);
                let frame_input = gather_frame_input_from_observations(
                    &scene,
                    &mut camera,
                    panel_before,
                    PointerObservations::poll(),
                );

                update_scene(frame_input, &mut scene);

                draw_ground(&scene.ground, &camera, screen_width, screen_height);
                draw_units(&scene.units, &camera);

                if let (Some(layout), Some(panel)) = (
                    PanelLayout::for_scene(&scene, screen_width),
                    scene.selection.as_ref(),
                ) {
                    let panel_background = to_macroquad_color(clear_color.lighten(0.08));
                    macroquad::shapes::draw_rectangle(
                        layout.origin.x,
                        layout.origin.y,
                        layout.size.x,
                        layout.size.y,
                        panel_background,
                    );
                    macroquad::shapes::draw_rectangle(
                        layout.origin.x,
                        layout.origin.y,
                        4.0,
                        layout.size.y,
                        to_macroquad_color(panel.accent),
                    );

                    let mut selection_ui = macroquad::ui::root_ui();
                    draw_selection_panel_ui(
                        &mut selection_ui,
                        SelectionPanelUiContext {
                            origin: MacroquadVec2::new(layout.origin.x + 4.0, layout.origin.y),
                            size: MacroquadVec2::new(layout.size.x - 4.0, layout.size.y),
                            background: panel_background,
                            panel,
                        },
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    camera: &mut CameraPan,
    panel: Option<PanelLayout>,
    observations: PointerObservations,
) -> FrameInput {
    let cursor_world = camera.screen_to_world(observations.cursor);
    let over_panel = panel.map_or(false, |panel| panel.contains(observations.cursor));

    let mut pointers = Vec::new();
    if !over_panel {
        let buttons = [
            (PointerButton::Primary, observations.primary_pressed),
            (PointerButton::Secondary, observations.secondary_pressed),
        ];
        for (button, pressed) in buttons {
            if pressed {
                let pick = pick_flat(cursor_world, scene.unit_positions(), UNIT_PICK_RADIUS);
                pointers.push(PointerInput::new(button, pick));
            }
        }
    }

    if observations.primary_pressed && !over_panel {
        camera.press(observations.cursor);
    } else if observations.primary_down {
        camera.drag(observations.cursor);
    } else {
        camera.release();
    }

    FrameInput { pointers }
}

fn draw_ground(
    ground: &GroundPresentation,
    camera: &CameraPan,
    screen_width: f32,
    screen_height: f32,
) {
    let color = to_macroquad_color(ground.line_color);
    let offset = camera.offset();

    for x in ground.line_offsets(offset.x, screen_width) {
        macroquad::shapes::draw_line(x, 0.0, x, screen_height, 1.0, color);
    }
    for y in ground.line_offsets(offset.y, screen_height) {
        macroquad::shapes::draw_line(0.0, y, screen_width, y, 1.0, color);
    }
}

fn draw_units(units: &[UnitPresentation], camera: &CameraPan) {
    for unit in units {
        let centre = camera.world_to_screen(unit.position);
        let fill = to_macroquad_color(unit.color);

        if unit.selected {
            let glow = to_macroquad_color(unit.color.with_alpha(0.35));
            macroquad::shapes::draw_circle(
                centre.x,
                centre.y,
                UNIT_PICK_RADIUS + SELECTION_GLOW_RADIUS,
                glow,
            );
        }

        macroquad::shapes::draw_circle(centre.x, centre.y, UNIT_PICK_RADIUS, fill);

        if unit.selected {
            macroquad::shapes::draw_circle_lines(
                centre.x,
                centre.y,
                UNIT_PICK_RADIUS,
                SELECTION_RING_THICKNESS,
                WHITE,
            );
        }

        let label = label_origin(unit, camera);
        let _ = macroquad::text::draw_text(
            &unit.label,
            label.x,
            label.y,
            f32::from(LABEL_FONT_SIZE),
            WHITE,
        );
    }
}

fn label_origin(unit: &UnitPresentation, camera: &CameraPan) -> Vec2 {
    let centre = camera.world_to_screen(unit.position);
    let dimensions = macroquad::text::measure_text(&unit.label, None, LABEL_FONT_SIZE, 1.0);
    centred_label(centre, dimensions.width)
}

fn centred_label(centre: Vec2, label_width: f32) -> Vec2 {
    Vec2::new(centre.x - label_width * 0.5, centre.y - LABEL_OFFSET)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commander_core::{PickResult, UnitColor, UnitId};
    use commander_rendering::SelectionPanel;

    fn scene(selection: Option<SelectionPanel>) -> Scene {
        let ground =
            GroundPresentation::new(50.0, Color::new(1.0, 1.0, 1.0, 0.05)).expect("valid ground");
        let units = vec![
            UnitPresentation::new(
                UnitId::new(0),
                Vec2::new(150.0, 300.0),
                Color::from(UnitColor::from_rgb(239, 68, 68)),
                "MURAT".to_owned(),
                false,
            ),
            UnitPresentation::new(
                UnitId::new(1),
                Vec2::new(250.0, 300.0),
                Color::from(UnitColor::from_rgb(236, 72, 153)),
                "CANSU".to_owned(),
                false,
            ),
        ];

        Scene::new(ground, units, selection)
    }

    fn panel() -> SelectionPanel {
        SelectionPanel {
            title: "Cansu".to_owned(),
            accent: Color::from_rgb_u8(236, 72, 153),
            description: "Hızlı Akıncı".to_owned(),
            speed_multiplier: 1.8,
        }
    }

    fn click(cursor: Vec2, primary: bool) -> PointerObservations {
        PointerObservations {
            cursor,
            primary_pressed: primary,
            primary_down: primary,
            secondary_pressed: !primary,
        }
    }

    #[test]
    fn primary_click_on_unit_picks_it_through_camera_offset() {
        let scene = scene(None);
        let mut camera = CameraPan::new(Vec2::new(40.0, -20.0));

        let input = gather_frame_input_from_observations(
            &scene,
            &mut camera,
            None,
            click(Vec2::new(295.0, 285.0), true),
        );

        assert_eq!(
            input.pointers,
            vec![PointerInput::new(
                PointerButton::Primary,
                PickResult::Unit {
                    unit: UnitId::new(1)
                }
            )]
        );
        assert_eq!(
            camera.screen_to_world(Vec2::new(295.0, 285.0)),
            Vec2::new(255.0, 305.0)
        );
        assert!(camera.is_dragging());
    }

    #[test]
    fn secondary_click_on_empty_space_reports_ground_point() {
        let scene = scene(None);
        let mut camera = CameraPan::default();

        let input = gather_frame_input_from_observations(
            &scene,
            &mut camera,
            None,
            click(Vec2::new(600.0, 120.0), false),
        );

        assert_eq!(
            input.pointers,
            vec![PointerInput::new(
                PointerButton::Secondary,
                PickResult::Ground {
                    point: Vec2::new(600.0, 120.0)
                }
            )]
        );
        assert!(!camera.is_dragging());
    }

    #[test]
    fn both_buttons_pressed_in_one_frame_are_forwarded_in_order() {
        let scene = scene(None);
        let mut camera = CameraPan::default();

        let input = gather_frame_input_from_observations(
            &scene,
            &mut camera,
            None,
            PointerObservations {
                cursor: Vec2::new(250.0, 300.0),
                primary_pressed: true,
                primary_down: true,
                secondary_pressed: true,
            },
        );

        let unit = PickResult::Unit {
            unit: UnitId::new(1),
        };
        assert_eq!(
            input.pointers,
            vec![
                PointerInput::new(PointerButton::Primary, unit),
                PointerInput::new(PointerButton::Secondary, unit),
            ]
        );
    }

    #[test]
    fn holding_primary_pans_without_new_pointer_input() {
        let scene = scene(None);
        let mut camera = CameraPan::default();
        let _ = gather_frame_input_from_observations(
            &scene,
            &mut camera,
            None,
            click(Vec2::new(10.0, 10.0), true),
        );

        let input = gather_frame_input_from_observations(
            &scene,
            &mut camera,
            None,
            PointerObservations {
                cursor: Vec2::new(60.0, 30.0),
                primary_down: true,
                ..PointerObservations::default()
            },
        );

        assert!(input.pointers.is_empty());
        assert_eq!(camera.offset(), Vec2::new(50.0, 20.0));
    }

    #[test]
    fn clicks_over_selection_panel_are_not_forwarded() {
        let scene = scene(Some(panel()));
        let layout = PanelLayout::for_scene(&scene, 1280.0).expect("panel visible");
        let mut camera = CameraPan::default();

        let input = gather_frame_input_from_observations(
            &scene,
            &mut camera,
            Some(layout),
            click(layout.origin + Vec2::splat(5.0), true),
        );

        assert!(input.pointers.is_empty());
        assert!(!camera.is_dragging());
    }

    #[test]
    fn panel_layout_only_exists_with_selection() {
        assert!(PanelLayout::for_scene(&scene(None), 1280.0).is_none());

        let layout = PanelLayout::for_scene(&scene(Some(panel())), 1280.0).expect("panel");
        assert_eq!(layout.origin, Vec2::new(1024.0, 16.0));
        assert!(layout.contains(Vec2::new(1100.0, 100.0)));
        assert!(!layout.contains(Vec2::new(1000.0, 100.0)));
    }

    #[test]
    fn labels_are_centred_above_units() {
        assert_eq!(
            centred_label(Vec2::new(200.0, 300.0), 40.0),
            Vec2::new(180.0, 275.0)
        );
    }
}
