#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that turns resolved pointer presses into selection and order commands.

use commander_core::{Command, PickResult, PointerButton, PointerInput, UnitId, UnitView};

/// Stateless system mapping pointer input onto unit store commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputResolver;

impl InputResolver {
    /// Creates a new input resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits the command implied by `input` given the current unit view.
    ///
    /// Primary presses select the picked unit or clear the selection when the
    /// press misses every unit. Secondary presses on the ground order the
    /// selected unit there; anything else is ignored.
    pub fn handle(
        &self,
        input: Option<PointerInput>,
        unit_view: &UnitView,
        out: &mut Vec<Command>,
    ) {
        let Some(input) = input else {
            return;
        };
        let selected = unit_view.selected().map(|unit| unit.id);
        if let Some(command) = resolve(input, selected) {
            out.push(command);
        }
    }
}

/// Decides which command, if any, a single pointer press produces.
#[must_use]
pub fn resolve(input: PointerInput, selected: Option<UnitId>) -> Option<Command> {
    match (input.button, input.pick) {
        (PointerButton::Primary, PickResult::Unit { unit }) => Some(Command::Select { unit }),
        (PointerButton::Primary, PickResult::Ground { .. } | PickResult::None) => {
            Some(Command::DeselectAll)
        }
        (PointerButton::Secondary, PickResult::Ground { point }) => {
            selected.map(|_| Command::CommandTarget { destination: point })
        }
        (PointerButton::Secondary, PickResult::Unit { .. } | PickResult::None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commander_core::PickHit;
    use glam::Vec2;

    fn ground(x: f32, y: f32) -> PickResult {
        PickResult::Ground {
            point: Vec2::new(x, y),
        }
    }

    #[test]
    fn primary_on_unit_selects_it() {
        let input = PointerInput::new(
            PointerButton::Primary,
            PickResult::Unit {
                unit: UnitId::new(4),
            },
        );

        assert_eq!(
            resolve(input, Some(UnitId::new(1))),
            Some(Command::Select {
                unit: UnitId::new(4)
            })
        );
    }

    #[test]
    fn primary_miss_clears_selection() {
        for pick in [ground(3.0, 4.0), PickResult::None] {
            let input = PointerInput::new(PointerButton::Primary, pick);
            assert_eq!(
                resolve(input, Some(UnitId::new(2))),
                Some(Command::DeselectAll)
            );
        }
    }

    #[test]
    fn secondary_on_ground_orders_selected_unit() {
        let input = PointerInput::new(PointerButton::Secondary, ground(10.0, 0.0));

        assert_eq!(
            resolve(input, Some(UnitId::new(3))),
            Some(Command::CommandTarget {
                destination: Vec2::new(10.0, 0.0)
            })
        );
        assert_eq!(resolve(input, None), None);
    }

    #[test]
    fn secondary_on_unit_or_nothing_is_ignored() {
        let on_unit = PointerInput::new(
            PointerButton::Secondary,
            PickResult::Unit {
                unit: UnitId::new(0),
            },
        );
        let on_nothing = PointerInput::new(PointerButton::Secondary, PickResult::None);

        assert_eq!(resolve(on_unit, Some(UnitId::new(1))), None);
        assert_eq!(resolve(on_nothing, Some(UnitId::new(1))), None);
    }

    #[test]
    fn nearest_hit_decides_ray_picks() {
        let pick = PickResult::nearest([
            PickHit::ground(Vec2::new(7.0, 7.0), 12.0),
            PickHit::unit(UnitId::new(5), 9.5),
        ]);
        let input = PointerInput::new(PointerButton::Primary, pick);

        assert_eq!(
            resolve(input, None),
            Some(Command::Select {
                unit: UnitId::new(5)
            })
        );
    }

    #[test]
    fn handle_without_input_emits_nothing() {
        let mut commands = Vec::new();

        InputResolver::new().handle(None, &UnitView::default(), &mut commands);

        assert!(commands.is_empty());
    }
}
