//! Reference picking services turning pointer positions into pick results.

use commander_core::{PickHit, PickResult, UnitId};
use glam::{Vec2, Vec3};

/// Radius of a unit disc in the flat view, in world units.
pub const UNIT_PICK_RADIUS: f32 = 18.0;

/// Resolves a world-space point against unit discs of `radius` on an unbounded plane.
///
/// A point inside one or more discs picks the closest unit; any other point
/// lands on the ground.
#[must_use]
pub fn pick_flat<I>(point: Vec2, units: I, radius: f32) -> PickResult
where
    I: IntoIterator<Item = (UnitId, Vec2)>,
{
    let hits = units.into_iter().filter_map(|(unit, position)| {
        let distance = position.distance(point);
        (distance < radius).then_some(PickHit::unit(unit, distance))
    });

    match PickResult::nearest(hits) {
        PickResult::None => PickResult::Ground { point },
        pick => pick,
    }
}

/// Half-line cast from a camera into a 3D scene.
///
/// The ground is the `y = 0` plane; a unit at plan position `(x, z)` is a
/// sphere centred at `(x, height, z)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    /// Creates a ray, returning `None` when `direction` cannot be normalised.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }

    /// Starting point of the ray.
    #[must_use]
    pub const fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Unit-length direction of the ray.
    #[must_use]
    pub const fn direction(&self) -> Vec3 {
        self.direction
    }

    fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    fn ground_hit(&self) -> Option<PickHit> {
        if self.direction.y.abs() <= f32::EPSILON {
            return None;
        }
        let distance = -self.origin.y / self.direction.y;
        if distance < 0.0 {
            return None;
        }
        let point = self.point_at(distance);
        Some(PickHit::ground(Vec2::new(point.x, point.z), distance))
    }

    fn sphere_distance(&self, centre: Vec3, radius: f32) -> Option<f32> {
        let offset = self.origin - centre;
        let b = offset.dot(self.direction);
        let c = offset.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = -b - root;
        let far = -b + root;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(0.0)
        } else {
            None
        }
    }
}

/// Resolves a ray against unit spheres and the ground plane, keeping the nearest hit.
///
/// Rays that miss every sphere and never reach the ground resolve to
/// [`PickResult::None`].
#[must_use]
pub fn pick_ray<I>(ray: &Ray, units: I, radius: f32, height: f32) -> PickResult
where
    I: IntoIterator<Item = (UnitId, Vec2)>,
{
    let unit_hits = units.into_iter().filter_map(|(unit, position)| {
        let centre = Vec3::new(position.x, height, position.y);
        ray.sphere_distance(centre, radius)
            .map(|distance| PickHit::unit(unit, distance))
    });

    PickResult::nearest(unit_hits.chain(ray.ground_hit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> Vec<(UnitId, Vec2)> {
        vec![
            (UnitId::new(0), Vec2::new(150.0, 300.0)),
            (UnitId::new(1), Vec2::new(250.0, 300.0)),
            (UnitId::new(2), Vec2::new(170.0, 300.0)),
        ]
    }

    #[test]
    fn flat_pick_inside_disc_selects_unit() {
        let pick = pick_flat(Vec2::new(245.0, 310.0), units(), UNIT_PICK_RADIUS);

        assert_eq!(
            pick,
            PickResult::Unit {
                unit: UnitId::new(1)
            }
        );
    }

    #[test]
    fn flat_pick_overlapping_discs_prefers_closest_centre() {
        let pick = pick_flat(Vec2::new(162.0, 300.0), units(), UNIT_PICK_RADIUS);

        assert_eq!(
            pick,
            PickResult::Unit {
                unit: UnitId::new(2)
            }
        );
    }

    #[test]
    fn flat_pick_outside_every_disc_lands_on_ground() {
        let point = Vec2::new(150.0, 318.0);

        assert_eq!(
            pick_flat(point, units(), UNIT_PICK_RADIUS),
            PickResult::Ground { point }
        );
    }

    #[test]
    fn ray_pick_prefers_unit_in_front_of_ground() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, -10.0), Vec3::new(0.0, -1.0, 1.0))
            .expect("valid direction");
        let units = [(UnitId::new(7), Vec2::new(0.0, 0.0))];

        assert_eq!(
            pick_ray(&ray, units, 1.0, 0.5),
            PickResult::Unit {
                unit: UnitId::new(7)
            }
        );
    }

    #[test]
    fn ray_pick_reports_ground_point_when_units_are_missed() {
        let ray = Ray::new(Vec3::new(4.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0))
            .expect("valid direction");
        let units = [(UnitId::new(7), Vec2::new(-20.0, 0.0))];

        assert_eq!(
            pick_ray(&ray, units, 1.0, 0.5),
            PickResult::Ground {
                point: Vec2::new(4.0, 0.0)
            }
        );
    }

    #[test]
    fn ray_pointing_at_sky_resolves_to_nothing() {
        let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.3, 1.0, 0.0))
            .expect("valid direction");

        assert_eq!(pick_ray(&ray, units(), 1.0, 0.5), PickResult::None);
    }

    #[test]
    fn ray_rejects_zero_direction() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }
}
