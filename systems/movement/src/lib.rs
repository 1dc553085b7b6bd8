#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step movement system that walks units toward their commanded targets.

use commander_core::{Command, Event, Tuning, UnitSnapshot, UnitView};
use glam::Vec2;

/// Pure system that reacts to world ticks and emits movement commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Movement {
    arrival_threshold: f32,
}

impl Movement {
    /// Creates a movement system that stops units within the tuning's arrival threshold.
    #[must_use]
    pub const fn new(tuning: Tuning) -> Self {
        Self {
            arrival_threshold: tuning.arrival_threshold(),
        }
    }

    /// Distance at which a unit counts as arrived.
    #[must_use]
    pub const fn arrival_threshold(&self) -> f32 {
        self.arrival_threshold
    }

    /// Consumes world events and the unit view to emit one step per approaching unit.
    ///
    /// Steps are only proposed when the batch contains a `TimeAdvanced` event, so
    /// selection or order changes never move anything on their own.
    pub fn handle(&mut self, events: &[Event], unit_view: &UnitView, out: &mut Vec<Command>) {
        let ticks = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();
        if ticks == 0 {
            return;
        }

        for unit in unit_view.iter() {
            if let Some(position) = self.step_unit(unit, ticks) {
                out.push(Command::MoveUnit {
                    unit: unit.id,
                    position,
                });
            }
        }
    }

    fn step_unit(&self, unit: &UnitSnapshot, ticks: usize) -> Option<Vec2> {
        let mut position = unit.position;
        let mut moved = false;
        for _ in 0..ticks {
            match next_position(position, unit.target, unit.base_speed, self.arrival_threshold) {
                Some(next) => {
                    position = next;
                    moved = true;
                }
                None => break,
            }
        }
        moved.then_some(position)
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Tuning::CANVAS)
    }
}

/// Advances `position` one fixed step toward `target`.
///
/// Returns `None` once the remaining distance is within `arrival_threshold`. The
/// step is clamped to the remaining distance, so a unit faster than its final
/// approach lands on the target instead of circling it.
#[must_use]
pub fn next_position(
    position: Vec2,
    target: Vec2,
    speed: f32,
    arrival_threshold: f32,
) -> Option<Vec2> {
    let delta = target - position;
    let distance = delta.length();
    if !distance.is_finite() || distance <= arrival_threshold {
        return None;
    }

    Some(position + delta / distance * speed.min(distance))
}
