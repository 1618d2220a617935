use bevy::prelude::*;
use tree_morph::prelude::*;

pub(crate) struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(Startup, setup_scene)
            .add_systems(Update, (sync_slot_entities, sync_ornament_meshes)
                .chain()
                .after(MorphSet::Input)
                .before(MorphSet::Parent))
            .add_systems(Update, sync_ornament_colors.after(MorphSet::Flush));
    }
}

#[derive(Resource)]
struct SceneAssets {
    foliage_mesh: Handle<Mesh>,
    foliage_material: Handle<StandardMaterial>,
    sphere_mesh: Handle<Mesh>,
    box_mesh: Handle<Mesh>,
    frame_mesh: Handle<Mesh>,
    frame_material: Handle<StandardMaterial>,
}

impl SceneAssets {
    fn ornament_mesh(&self, shape: Option<OrnamentShape>) -> Handle<Mesh> {
        match shape {
            Some(OrnamentShape::Box) => self.box_mesh.clone(),
            _ => self.sphere_mesh.clone(),
        }
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<MorphConfig>,
) {
    commands.insert_resource(SceneAssets {
        foliage_mesh: meshes.add(Sphere::new(0.08)),
        foliage_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.05, 0.35, 0.12),
            emissive: LinearRgba::rgb(0.1, 0.9, 0.3),
            ..default()
        }),
        sphere_mesh: meshes.add(Sphere::new(1.0)),
        box_mesh: meshes.add(Cuboid::new(1.4, 1.4, 1.4)),
        frame_mesh: meshes.add(Rectangle::new(config.dock.frame_size.x, config.dock.frame_size.y)),
        frame_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.95, 0.92, 0.85),
            double_sided: true,
            cull_mode: None,
            ..default()
        }),
    });

    commands.spawn((
        Transform::default(),
        Visibility::default(),
        TreeRoot,
        Name::new("TreeRoot"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            ..default()
        },
        Transform::from_xyz(6.0, 12.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Keeps one child entity of the tree root per buffer slot, respawning a
/// class whenever its instance count changes. Regenerated ornaments with an
/// unchanged count are handled by `sync_ornament_meshes`.
fn sync_slot_entities(
    mut commands: Commands,
    engine: Res<MorphEngine>,
    assets: Option<Res<SceneAssets>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    roots: Query<Entity, With<TreeRoot>>,
    slots: Query<(Entity, &InstanceSlot)>,
) {
    let (Some(assets), Ok(root)) = (assets, roots.get_single()) else {
        return;
    };

    for class in ClassKind::ALL {
        let records = engine.records(class);
        let spawned: Vec<Entity> = slots
            .iter()
            .filter(|(_, slot)| slot.class == class)
            .map(|(entity, _)| entity)
            .collect();
        if spawned.len() == records.len() {
            continue;
        }
        for entity in spawned {
            commands.entity(entity).despawn_recursive();
        }

        let buffer = engine.buffer().class(class);
        commands.entity(root).with_children(|parent| {
            for (index, record) in records.iter().enumerate() {
                let transform = buffer.transforms().get(index).copied().unwrap_or_default();
                let slot = InstanceSlot { class, index };
                match class {
                    ClassKind::Foliage => {
                        parent.spawn((
                            Mesh3d(assets.foliage_mesh.clone()),
                            MeshMaterial3d(assets.foliage_material.clone()),
                            transform,
                            slot,
                        ));
                    }
                    ClassKind::Ornament => {
                        let color = buffer.color(index).unwrap_or(LinearRgba::WHITE);
                        let mesh = assets.ornament_mesh(record.attrs.shape);
                        parent.spawn((
                            Mesh3d(mesh),
                            MeshMaterial3d(materials.add(StandardMaterial {
                                base_color: color.into(),
                                metallic: 0.7,
                                perceptual_roughness: 0.3,
                                ..default()
                            })),
                            transform,
                            slot,
                            SlotColor(color),
                        ));
                    }
                    ClassKind::PhotoFrame => {
                        let label = engine
                            .photo_ids()
                            .get(index)
                            .map(|id| format!("Photo {}", id.0))
                            .unwrap_or_default();
                        parent.spawn((
                            Mesh3d(assets.frame_mesh.clone()),
                            MeshMaterial3d(assets.frame_material.clone()),
                            transform,
                            slot,
                            Name::new(label),
                        ));
                    }
                }
            }
        });
        info!("spawned {} {:?} entities", records.len(), class);
    }
}

/// Swaps sphere and box meshes when ornaments are regenerated without a count change.
fn sync_ornament_meshes(
    engine: Res<MorphEngine>,
    assets: Option<Res<SceneAssets>>,
    mut slots: Query<(&InstanceSlot, &mut Mesh3d)>,
) {
    let Some(assets) = assets else { return };
    let records = engine.records(ClassKind::Ornament);
    for (slot, mut mesh) in &mut slots {
        if slot.class != ClassKind::Ornament {
            continue;
        }
        let Some(record) = records.get(slot.index) else { continue };
        let wanted = assets.ornament_mesh(record.attrs.shape);
        if mesh.0 != wanted {
            mesh.0 = wanted;
        }
    }
}

fn sync_ornament_colors(
    mut materials: ResMut<Assets<StandardMaterial>>,
    slots: Query<(&SlotColor, &MeshMaterial3d<StandardMaterial>), Changed<SlotColor>>,
) {
    for (color, handle) in &slots {
        let Some(material) = materials.get_mut(&handle.0) else {
            continue;
        };
        let color = color.0;
        material.base_color = color.into();
        // highlight values above 1 show up as glow
        material.emissive = LinearRgba::rgb(
            (color.red - 1.0).max(0.0),
            (color.green - 1.0).max(0.0),
            (color.blue - 1.0).max(0.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const SPHERE: Handle<Mesh> = Handle::weak_from_u128(0x51);
    const BOX: Handle<Mesh> = Handle::weak_from_u128(0xB0);

    fn test_assets() -> SceneAssets {
        SceneAssets {
            foliage_mesh: Handle::default(),
            foliage_material: Handle::default(),
            sphere_mesh: SPHERE,
            box_mesh: BOX,
            frame_mesh: Handle::default(),
            frame_material: Handle::default(),
        }
    }

    fn slot_meshes(app: &mut App) -> Vec<(usize, Handle<Mesh>)> {
        let mut query = app.world_mut().query::<(&InstanceSlot, &Mesh3d)>();
        query.iter(app.world()).map(|(slot, mesh)| (slot.index, mesh.0.clone())).collect()
    }

    #[test]
    fn regenerated_shapes_swap_meshes_at_the_same_count() {
        let mut config = MorphConfig::default();
        config.foliage.count = 16;
        config.ornaments.count = 12;
        config.ornaments.sphere_share = 1.0;

        let mut app = App::new();
        app.add_plugins(MorphPlugin::new(config))
            .init_resource::<Time>()
            .insert_resource(test_assets())
            .add_systems(Update, sync_ornament_meshes.after(MorphSet::Input).before(MorphSet::Parent));
        for index in 0..12 {
            app.world_mut().spawn((Mesh3d(SPHERE), InstanceSlot { class: ClassKind::Ornament, index }));
        }

        let tick = Duration::from_secs_f32(1.0 / 60.0);
        app.world_mut().resource_mut::<Time>().advance_by(tick);
        app.update();
        assert!(slot_meshes(&mut app).iter().all(|(_, mesh)| *mesh == SPHERE));

        app.world_mut().resource_mut::<MorphConfig>().ornaments.sphere_share = 0.0;
        app.world_mut().resource_mut::<Time>().advance_by(tick);
        app.update();

        let engine = app.world().resource::<MorphEngine>();
        assert_eq!(engine.records(ClassKind::Ornament).len(), 12);
        assert!(engine
            .records(ClassKind::Ornament)
            .iter()
            .all(|r| r.attrs.shape == Some(OrnamentShape::Box)));
        assert!(slot_meshes(&mut app).iter().all(|(_, mesh)| *mesh == BOX));
    }
}
