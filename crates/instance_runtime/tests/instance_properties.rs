//! End-to-end behavior of the instance lifecycle, animation, overrides,
//! and collision queries against a small shared model.

use std::sync::Arc;

use instance_runtime::prelude::*;

fn corners(center: Vec3, half: f32) -> Vec<Vec3> {
    vec![
        center + Vec3::new(-half, -half, -half),
        center + Vec3::new(half, half, half),
    ]
}

/// Three-group, three-frame model; the "turret" group rises one unit per
/// frame so frame changes move the frame bounds.
fn ship_model(materials: &mut MaterialLibrary) -> Arc<Model> {
    let hull_mat = materials.register("hull-paint", Material::new().with_color(0.7, 0.7, 0.8));
    let trim_mat = materials.register("trim-paint", Material::new().with_color(0.2, 0.2, 0.2));

    let groups = vec![
        Group::new("hull").with_material(hull_mat),
        Group::new("turret").with_material(hull_mat),
        Group::new("tracks").with_material(trim_mat),
    ];

    let frames = (0..3)
        .map(|frame| {
            ModelFrame::new(vec![
                corners(Vec3::zeros(), 1.0),
                corners(Vec3::new(0.0, 2.0 + frame as f32, 0.0), 0.5),
                corners(Vec3::new(0.0, -1.5, 0.0), 0.4),
            ])
        })
        .collect();

    Arc::new(Model::new("ship", groups, frames).expect("valid test model"))
}

fn bound(name: &str, model: &Arc<Model>) -> Instance {
    let mut instance = Instance::new(name);
    instance.bind_model(Arc::clone(model)).expect("bind");
    instance
}

#[test]
fn override_table_mirrors_model_group_count() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let instance = bound("ship-01", &model);

    assert_eq!(instance.group_count().unwrap(), model.group_count());
    assert_eq!(instance.overrides().len(), model.group_count());
}

#[test]
fn deferred_transition_commits_exactly_once() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let mut instance = bound("ship-01", &model);
    let mut clock = FrameClock::new();

    instance.set_next_frame(2, Transition::Deferred).unwrap();
    assert_eq!(instance.current_frame(), 0);

    clock.tick();
    instance.update(&clock).unwrap();
    assert_eq!(instance.current_frame(), 2);

    clock.tick();
    instance.update(&clock).unwrap();
    assert_eq!(instance.current_frame(), 2);
}

#[test]
fn forced_transition_needs_no_update() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let mut instance = bound("ship-01", &model);

    instance.set_next_frame(1, Transition::Forced).unwrap();
    assert_eq!(instance.current_frame(), 1);
}

#[test]
fn one_past_last_frame_is_rejected_without_mutation() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let mut instance = bound("ship-01", &model);

    instance.set_next_frame(1, Transition::Deferred).unwrap();
    let result = instance.set_next_frame(model.frame_count(), Transition::Deferred);

    assert_eq!(
        result,
        Err(InstanceError::InvalidFrame { frame: 3, frame_count: 3 })
    );
    assert_eq!(instance.current_frame(), 0);
    assert_eq!(instance.pending_frame(), Some(1));
}

#[test]
fn grand_overlap_with_disjoint_groups_yields_empty_contact_list() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let a = bound("a", &model);
    let mut b = bound("b", &model);

    // Grand bounds span y in [-1.9, 4.5]; shifting by +5 keeps the grand
    // boxes overlapping while every frame-0 group pair stays disjoint.
    b.set_model_matrix(Mat4::new_translation(&Vec3::new(0.0, 5.0, 0.0)));

    assert!(a.is_colliding(&b));
    assert!(a.collision_list(&b).is_empty());
}

#[test]
fn disjoint_grand_bounds_never_collide() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let a = bound("a", &model);
    let mut b = bound("b", &model);
    b.set_model_matrix(Mat4::new_translation(&Vec3::new(50.0, 0.0, 0.0)));

    assert!(!a.is_colliding(&b));
    assert!(a.collision_list(&b).is_empty());
}

#[test]
fn overlapping_groups_report_contact_pairs() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let a = bound("a", &model);
    let b = bound("b", &model);

    // Identity transforms: every group overlaps itself
    let contacts = a.collision_list(&b);
    assert!(contacts
        .iter()
        .any(|c| c.group_a == 0 && c.group_b == 0));
    assert!(contacts.len() >= model.group_count());
}

#[test]
fn unknown_group_name_resolves_to_none() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let instance = bound("ship-01", &model);

    assert_eq!(instance.identify_group("nonexistent"), None);
    assert_eq!(instance.identify_group("turret"), Some(1));
}

#[test]
fn material_swap_round_trips() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let mut instance = bound("ship-01", &model);

    let hull_mat = materials.id_of("hull-paint").unwrap();
    let camo = materials.register("camo-paint", Material::new().with_color(0.3, 0.4, 0.2));

    let before: Vec<_> = instance
        .overrides()
        .iter()
        .map(|entry| entry.material)
        .collect();

    assert_eq!(instance.swap_materials(hull_mat, camo), 2);
    assert_eq!(instance.overrides().get(0).unwrap().material, camo);
    // The tracks group is bound to a different material and is untouched
    assert_ne!(instance.overrides().get(2).unwrap().material, camo);

    instance.swap_materials(camo, hull_mat);
    let after: Vec<_> = instance
        .overrides()
        .iter()
        .map(|entry| entry.material)
        .collect();
    assert_eq!(before, after);
}

#[test]
fn cloned_instances_keep_independent_overrides() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let original = bound("ship-01", &model);
    let mut copy = original.clone();

    let camo = materials.register("camo-paint", Material::new());
    copy.set_group_material(GroupSelector::Name("hull"), camo);

    assert_eq!(copy.overrides().get(0).unwrap().material, camo);
    assert_ne!(original.overrides().get(0).unwrap().material, camo);

    // The model itself is shared, not duplicated
    assert!(Arc::ptr_eq(original.model().unwrap(), copy.model().unwrap()));
}

#[test]
fn disconnect_makes_structural_access_fail_loudly() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let mut instance = bound("ship-01", &model);
    let mut clock = FrameClock::new();

    instance.disconnect();
    drop(model); // the instance holds no reference anymore

    clock.tick();
    assert_eq!(instance.update(&clock), Err(InstanceError::DanglingModel));
    assert_eq!(instance.group_count(), Err(InstanceError::DanglingModel));
    assert_eq!(instance.vertices(), Err(InstanceError::DanglingModel));

    // Collision and render queries degrade gracefully instead
    let other = Instance::new("other");
    assert!(!instance.is_colliding(&other));
    assert!(instance
        .pick(&Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0)))
        .is_none());
}

#[test]
fn render_submission_covers_visible_groups_with_overrides() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let mut shaders = ShaderCatalog::new();
    let toon = shaders.compile("toon.vert", "toon.frag", "Toon");

    let mut instance = bound("ship-01", &model);
    instance.set_shader(toon, Vec3::new(1.0, 1.0, 1.0));
    instance.set_group_shader(
        GroupSelector::Name("turret"),
        shaders.compile("glow.vert", "glow.frag", "Glow"),
        Vec3::new(2.0, 2.0, 2.0),
    );

    let mut queue = RenderQueue::new();
    let clock = FrameClock::new();
    instance.add_to_render_list(&mut queue, &clock);

    assert_eq!(queue.len(), model.group_count());
    let turret_item = &queue.items()[1];
    assert_eq!(turret_item.shader, shaders.id_of("Glow").unwrap());
    // Groups without an explicit override fall back to the instance default
    assert_eq!(queue.items()[0].shader, toon);
}

#[test]
fn world_space_vertices_follow_the_transform() {
    let mut materials = MaterialLibrary::new();
    let model = ship_model(&mut materials);
    let mut instance = bound("ship-01", &model);
    let mut clock = FrameClock::new();

    instance.set_transform(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
    clock.tick();
    instance.update(&clock).unwrap();

    let vertices = instance.vertices().unwrap();
    let local = model.frame_positions(0).unwrap();
    assert_eq!(vertices.len(), local.len());
    for (world, local) in vertices.iter().zip(&local) {
        assert!((world.x - (local.x + 10.0)).abs() < 1e-5);
    }
}
