//! Per-instance group overrides
//!
//! Each instance mirrors its model's group list with an [`OverrideTable`]:
//! one mutable record per group, seeded from the model's defaults at bind
//! time. Overrides never touch the shared model data.
//!
//! Targets are addressed with a [`GroupSelector`] instead of the usual
//! string/index overload pair with magic "ALL"/-1/-2 sentinels: the selector
//! is resolved once to a concrete index set before any mutation happens.

use crate::foundation::math::Vec3;
use crate::model::Group;
use crate::render::material::MaterialId;
use crate::render::shader::ShaderId;

/// Selects which groups an override operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSelector<'a> {
    /// Apply to every group
    All,
    /// Apply to no group
    None,
    /// Apply to one group by stable index
    Index(usize),
    /// Apply to one group by exact name match
    Name(&'a str),
}

impl GroupSelector<'_> {
    /// Resolve this selector to a concrete set of group indices
    ///
    /// Unknown names and out-of-range indices resolve to the empty set;
    /// callers treat an empty set as "no group matched", never as an error.
    pub fn resolve(&self, groups: &[Group]) -> Vec<usize> {
        match self {
            Self::All => (0..groups.len()).collect(),
            Self::None => Vec::new(),
            Self::Index(index) => {
                if *index < groups.len() {
                    vec![*index]
                } else {
                    Vec::new()
                }
            }
            Self::Name(name) => groups
                .iter()
                .position(|group| group.name == *name)
                .map_or_else(Vec::new, |index| vec![index]),
        }
    }
}

/// Per-instance, per-group override record
///
/// Render bindings and visibility layered over the model's group defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupOverride {
    /// Whether the group is rendered
    pub visible: bool,

    /// Whether the group contributes to the instance's frame bounds
    pub in_frame_bounds: bool,

    /// Whether the group's frame-level bounding box is debug-drawn
    pub bounds_visible: bool,

    /// Whether the group's local axis gizmo is debug-drawn
    pub axis_visible: bool,

    /// Shader binding for this group
    pub shader: ShaderId,

    /// Material binding for this group
    pub material: MaterialId,

    /// Color tint applied on top of the material
    pub tint: Vec3,
}

impl GroupOverride {
    /// Seed an override record from a group's defaults
    pub fn from_group(group: &Group) -> Self {
        Self {
            visible: true,
            in_frame_bounds: true,
            bounds_visible: false,
            axis_visible: group.axis_visible,
            shader: group.shader,
            material: group.material,
            tint: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Override records for every group of a bound model
///
/// The table length always equals the model's group count. Cloning the table
/// is a deep copy, which is what keeps cloned instances independent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideTable {
    entries: Vec<GroupOverride>,
}

impl OverrideTable {
    /// Build a table seeded from a model's group defaults
    pub fn from_groups(groups: &[Group]) -> Self {
        Self {
            entries: groups.iter().map(GroupOverride::from_group).collect(),
        }
    }

    /// Get the number of override records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the table is empty (no model bound)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the override record for a group
    pub fn get(&self, group: usize) -> Option<&GroupOverride> {
        self.entries.get(group)
    }

    /// Iterate over all override records in group order
    pub fn iter(&self) -> impl Iterator<Item = &GroupOverride> {
        self.entries.iter()
    }

    /// Set the shader binding and tint for the selected groups
    pub fn set_shader(&mut self, indices: &[usize], shader: ShaderId, tint: Vec3) {
        for &index in indices {
            if let Some(entry) = self.entries.get_mut(index) {
                entry.shader = shader;
                entry.tint = tint;
            }
        }
    }

    /// Set the material binding for the selected groups
    pub fn set_material(&mut self, indices: &[usize], material: MaterialId) {
        for &index in indices {
            if let Some(entry) = self.entries.get_mut(index) {
                entry.material = material;
            }
        }
    }

    /// Set render visibility for the selected groups
    pub fn set_visible(&mut self, indices: &[usize], visible: bool) {
        for &index in indices {
            if let Some(entry) = self.entries.get_mut(index) {
                entry.visible = visible;
            }
        }
    }

    /// Include or exclude the selected groups from the frame bounds
    pub fn set_in_frame_bounds(&mut self, indices: &[usize], included: bool) {
        for &index in indices {
            if let Some(entry) = self.entries.get_mut(index) {
                entry.in_frame_bounds = included;
            }
        }
    }

    /// Set frame-bounds debug visibility for the selected groups
    pub fn set_bounds_visible(&mut self, indices: &[usize], visible: bool) {
        for &index in indices {
            if let Some(entry) = self.entries.get_mut(index) {
                entry.bounds_visible = visible;
            }
        }
    }

    /// Set axis-gizmo visibility for the selected groups
    pub fn set_axis_visible(&mut self, indices: &[usize], visible: bool) {
        for &index in indices {
            if let Some(entry) = self.entries.get_mut(index) {
                entry.axis_visible = visible;
            }
        }
    }

    /// Rewrite every entry bound to `old` so it binds `new` instead
    ///
    /// This is a bulk rename, not a toggle; entries bound to anything else
    /// are untouched. Returns the number of entries rewritten.
    pub fn swap_materials(&mut self, old: MaterialId, new: MaterialId) -> usize {
        let mut swapped = 0;
        for entry in &mut self.entries {
            if entry.material == old {
                entry.material = new;
                swapped += 1;
            }
        }
        swapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<Group> {
        vec![
            Group::new("hull").with_material(MaterialId(1)),
            Group::new("turret").with_material(MaterialId(2)),
            Group::new("tracks").with_material(MaterialId(1)),
        ]
    }

    #[test]
    fn test_selector_all_and_none() {
        let groups = groups();
        assert_eq!(GroupSelector::All.resolve(&groups), vec![0, 1, 2]);
        assert!(GroupSelector::None.resolve(&groups).is_empty());
    }

    #[test]
    fn test_selector_by_name() {
        let groups = groups();
        assert_eq!(GroupSelector::Name("turret").resolve(&groups), vec![1]);
        assert!(GroupSelector::Name("nonexistent").resolve(&groups).is_empty());
    }

    #[test]
    fn test_selector_out_of_range_index_matches_nothing() {
        let groups = groups();
        assert_eq!(GroupSelector::Index(2).resolve(&groups), vec![2]);
        assert!(GroupSelector::Index(3).resolve(&groups).is_empty());
    }

    #[test]
    fn test_table_seeds_from_defaults() {
        let groups = groups();
        let table = OverrideTable::from_groups(&groups);

        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1).unwrap().material, MaterialId(2));
        assert!(table.get(0).unwrap().visible);
    }

    #[test]
    fn test_set_material_only_touches_selection() {
        let groups = groups();
        let mut table = OverrideTable::from_groups(&groups);

        table.set_material(&[1], MaterialId(9));
        assert_eq!(table.get(0).unwrap().material, MaterialId(1));
        assert_eq!(table.get(1).unwrap().material, MaterialId(9));
    }

    #[test]
    fn test_swap_materials_round_trip() {
        let groups = groups();
        let mut table = OverrideTable::from_groups(&groups);
        let original = table.clone();

        assert_eq!(table.swap_materials(MaterialId(1), MaterialId(2)), 2);
        assert_eq!(table.get(0).unwrap().material, MaterialId(2));

        // Swapping back restores every entry, including the ones that were
        // already bound to MaterialId(2) before the first swap.
        table.swap_materials(MaterialId(2), MaterialId(1));
        assert_eq!(table.get(0).unwrap().material, MaterialId(1));
        assert_eq!(table.get(2).unwrap().material, MaterialId(1));
        assert_ne!(table, original); // turret moved from 2 to 1
    }
}
