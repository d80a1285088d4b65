//! Collision queries over instance bounding hierarchies
//!
//! The hierarchy has exactly two levels, so the engine is a pair of pure
//! functions run cheap-to-expensive: the broad phase tests the grand boxes
//! ([`Aabb::intersects`] on world-space volumes), and only on a hit does the
//! narrow phase walk the per-group frame boxes. Callers prepare world-space
//! boxes up front; nothing here reads instance state.

use crate::bounds::{Aabb, Ray};

/// A pair of overlapping groups, one index per instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupContact {
    /// Group index on the first instance
    pub group_a: usize,
    /// Group index on the second instance
    pub group_b: usize,
}

/// Result of a ray pick: the closest intersecting group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupHit {
    /// Index of the hit group
    pub group: usize,
    /// Distance from the ray origin to the box entry point
    pub distance: f32,
}

/// Narrow phase: all group pairs whose frame-level bounds overlap
///
/// Takes `(group index, world-space box)` lists for both instances. An empty
/// result is a valid outcome even after a broad-phase hit: the grand boxes
/// can overlap while every group pair stays disjoint.
pub fn contact_pairs(
    groups_a: &[(usize, Aabb)],
    groups_b: &[(usize, Aabb)],
) -> Vec<GroupContact> {
    let mut contacts = Vec::new();

    for &(group_a, bounds_a) in groups_a {
        for &(group_b, bounds_b) in groups_b {
            if bounds_a.intersects(&bounds_b) {
                contacts.push(GroupContact { group_a, group_b });
            }
        }
    }

    contacts
}

/// Ray pick: the closest group whose world-space box the ray enters
pub fn pick_group(groups: &[(usize, Aabb)], ray: &Ray) -> Option<GroupHit> {
    let mut closest: Option<GroupHit> = None;

    for &(group, bounds) in groups {
        if let Some(distance) = bounds.intersect_ray(ray) {
            let nearer = closest.map_or(true, |hit| distance < hit.distance);
            if nearer {
                closest = Some(GroupHit { group, distance });
            }
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn box_at(x: f32) -> Aabb {
        Aabb::from_center_extents(Vec3::new(x, 0.0, 0.0), Vec3::new(0.5, 0.5, 0.5))
    }

    #[test]
    fn test_contact_pairs_reports_only_overlaps() {
        let a = [(0, box_at(0.0)), (1, box_at(10.0))];
        let b = [(0, box_at(0.4)), (1, box_at(20.0))];

        let contacts = contact_pairs(&a, &b);
        assert_eq!(contacts, vec![GroupContact { group_a: 0, group_b: 0 }]);
    }

    #[test]
    fn test_contact_pairs_empty_when_disjoint() {
        let a = [(0, box_at(0.0))];
        let b = [(0, box_at(5.0))];

        assert!(contact_pairs(&a, &b).is_empty());
    }

    #[test]
    fn test_pick_returns_closest_group() {
        let groups = [(0, box_at(5.0)), (1, box_at(2.0)), (2, box_at(8.0))];
        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));

        let hit = pick_group(&groups, &ray).expect("ray should hit");
        assert_eq!(hit.group, 1);
        assert!((hit.distance - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_pick_misses_everything() {
        let groups = [(0, box_at(5.0))];
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));

        assert!(pick_group(&groups, &ray).is_none());
    }
}
