#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the commander sandbox.

use commander_core::{Command, Layout, UnitView};
use commander_world::{query, World};

/// Produces the start-up commands and data required to greet the player.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bootstrap {
    layout: Layout,
}

impl Bootstrap {
    /// Creates a bootstrap system that spawns the roster using `layout`.
    #[must_use]
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Emits the spawn command when the world has not been populated yet.
    pub fn handle(&self, world: &World, out: &mut Vec<Command>) {
        if query::is_spawned(world) {
            return;
        }

        out.push(Command::SpawnRoster {
            layout: self.layout,
        });
    }

    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Exposes the units currently on the field for presentation purposes.
    #[must_use]
    pub fn units(&self, world: &World) -> UnitView {
        query::unit_view(world)
    }
}
