use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::game::{
    animation::{self, AnimatorParams, AttackSwing},
    components::*,
    events::{InputEvent, InteractionMessage},
    facing, input,
    intent::{self, Intent},
    interact::{self, Interactable, InteractableKind, PickupAssets},
    inventory::{Inventory, Item},
    physics,
};

// ── SystemSets (strict FixedUpdate ordering) ────────────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    FacingSet,
    AnimationSet,
    AnimatorSet,
    MotionSet,
    InteractionSet,
}

/// Update-side input handling; runs before the next fixed loop reads Intent.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputSet;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<InputEvent>();
        app.add_message::<InteractionMessage>();

        app.configure_sets(
            FixedUpdate,
            (
                LocomotionSet::FacingSet,
                LocomotionSet::AnimationSet,
                LocomotionSet::AnimatorSet,
                LocomotionSet::MotionSet,
                LocomotionSet::InteractionSet,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            facing::rotate_toward_movement.in_set(LocomotionSet::FacingSet),
        );
        app.add_systems(
            FixedUpdate,
            animation::reconcile_animation_flags.in_set(LocomotionSet::AnimationSet),
        );
        app.add_systems(
            FixedUpdate,
            animation::advance_animator.in_set(LocomotionSet::AnimatorSet),
        );
        app.add_systems(
            FixedUpdate,
            physics::integrate_motion.in_set(LocomotionSet::MotionSet),
        );
        // Chained so a proximity pickup is despawned before the button pass.
        app.add_systems(
            FixedUpdate,
            (
                interact::proximity_interactions,
                interact::button_interactions,
                interact::drop_items,
            )
                .chain()
                .in_set(LocomotionSet::InteractionSet),
        );

        // ── Startup ─────────────────────────────────────────────────────
        app.add_systems(Startup, setup_world);

        // ── Input (Update) ──────────────────────────────────────────────
        app.add_systems(
            Update,
            (input::poll_input, intent::resolve_intent)
                .chain()
                .in_set(InputSet),
        );

        // ── Always-on ───────────────────────────────────────────────────
        app.add_systems(Update, (tuning_reload_input, apply_tuning).chain());
    }
}

// ── Startup ─────────────────────────────────────────────────────────

fn setup_world(
    mut commands: Commands,
    tuning: Res<Tuning>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Ground
    commands.spawn((
        Ground,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(0.0, tuning.ground_height, 0.0),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Player: capsule with its feet at the transform origin.
    commands
        .spawn((
            Player,
            Name::new("Player"),
            Transform::from_xyz(0.0, tuning.ground_height, 0.0),
            Visibility::default(),
            Intent::default(),
            MotionState::default(),
            KinematicBody {
                grounded: true,
                ground_height: tuning.ground_height,
            },
            AnimatorParams::default(),
            AttackSwing::default(),
            Inventory::with_capacity(tuning.inventory_capacity),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Capsule3d::new(0.3, 1.0))),
                MeshMaterial3d(materials.add(Color::srgb(0.2, 0.6, 1.0))),
                Transform::from_xyz(0.0, 0.8, 0.0),
            ));
            // Nose, so facing is visible.
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.15, 0.15, 0.3))),
                MeshMaterial3d(materials.add(Color::srgb(0.9, 0.9, 1.0))),
                Transform::from_xyz(0.0, 1.2, -0.35),
            ));
        });

    // Pickups
    let pickup_assets = PickupAssets {
        mesh: meshes.add(Sphere::new(0.2)),
        material: materials.add(Color::srgb(1.0, 0.85, 0.0)),
    };
    let pickups = [
        ("Gold Coin", Vec3::new(2.0, 0.2, -3.0)),
        ("Silver Key", Vec3::new(-3.0, 0.2, -2.0)),
        ("Healing Herb", Vec3::new(4.0, 0.2, 2.0)),
        ("Ruby", Vec3::new(-1.5, 0.2, 4.0)),
        ("Old Map", Vec3::new(0.0, 0.2, -6.0)),
    ];
    for (name, pos) in pickups {
        commands.spawn((
            Name::new(name),
            Interactable::new(tuning.interact_radius, InteractableKind::Pickup(Item::new(name))),
            Mesh3d(pickup_assets.mesh.clone()),
            MeshMaterial3d(pickup_assets.material.clone()),
            Transform::from_translation(pos),
        ));
    }

    // Signpost
    commands.spawn((
        Name::new("Signpost"),
        Interactable::new(
            tuning.interact_radius * 2.0,
            InteractableKind::Inspect {
                description: "The road north leads to the old ruins.".into(),
            },
        ),
        Mesh3d(meshes.add(Cuboid::new(0.2, 1.6, 0.2))),
        MeshMaterial3d(materials.add(Color::srgb(0.5, 0.35, 0.2))),
        Transform::from_xyz(3.0, 0.8, -1.0),
    ));

    commands.insert_resource(pickup_assets);

    info!("World ready: {} pickups, inventory capacity {}", pickups.len(), tuning.inventory_capacity);
}

// ── Always-on ───────────────────────────────────────────────────────

/// Reload tuning with F5.
fn tuning_reload_input(keyboard: Res<ButtonInput<KeyCode>>, mut tuning: ResMut<Tuning>) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
    }
}

/// Push a reloaded tuning into everything that copied it at spawn.
fn apply_tuning(
    tuning: Res<Tuning>,
    mut last_radius: Local<Option<f32>>,
    mut fixed: ResMut<Time<Fixed>>,
    mut players: Query<(&mut Inventory, &mut KinematicBody), With<Player>>,
    mut ground: Query<&mut Transform, With<Ground>>,
    mut interactables: Query<&mut Interactable>,
) {
    if !tuning.is_changed() {
        return;
    }
    fixed.set_timestep_seconds(tuning.dt as f64);

    for (mut inventory, mut body) in &mut players {
        if inventory.capacity() != tuning.inventory_capacity {
            inventory.set_capacity(tuning.inventory_capacity);
        }
        body.ground_height = tuning.ground_height;
    }
    for mut transform in &mut ground {
        transform.translation.y = tuning.ground_height;
    }

    // Radii are spawned as multiples of interact_radius; rescaling keeps them.
    if let Some(previous) = last_radius.replace(tuning.interact_radius) {
        if previous > 0.0 && previous != tuning.interact_radius {
            let scale = tuning.interact_radius / previous;
            for mut interactable in &mut interactables {
                interactable.radius *= scale;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reload_app() -> App {
        let mut app = App::new();
        app.insert_resource(Tuning::default());
        app.insert_resource(Time::<Fixed>::from_seconds(1.0 / 60.0));
        app.add_systems(Update, apply_tuning);
        app
    }

    #[test]
    fn reload_reaches_spawned_entities() {
        let mut app = reload_app();
        let player = app
            .world_mut()
            .spawn((
                Player,
                Inventory::with_capacity(4),
                KinematicBody {
                    grounded: true,
                    ground_height: 0.0,
                },
            ))
            .id();
        let ground = app.world_mut().spawn((Ground, Transform::default())).id();
        let pickup = app
            .world_mut()
            .spawn(Interactable::new(0.75, InteractableKind::Pickup(Item::new("gem"))))
            .id();
        let sign = app
            .world_mut()
            .spawn(Interactable::new(
                1.5,
                InteractableKind::Inspect {
                    description: "sign".into(),
                },
            ))
            .id();
        app.update();

        {
            let mut tuning = app.world_mut().resource_mut::<Tuning>();
            tuning.dt = 0.02;
            tuning.inventory_capacity = 6;
            tuning.ground_height = 1.0;
            tuning.interact_radius = 1.5;
        }
        app.update();

        let world = app.world();
        assert_eq!(world.get::<Inventory>(player).unwrap().capacity(), 6);
        assert_eq!(world.get::<KinematicBody>(player).unwrap().ground_height, 1.0);
        assert_eq!(world.get::<Transform>(ground).unwrap().translation.y, 1.0);
        assert_eq!(world.get::<Interactable>(pickup).unwrap().radius, 1.5);
        assert_eq!(world.get::<Interactable>(sign).unwrap().radius, 3.0);
        let step = world.resource::<Time<Fixed>>().timestep().as_secs_f32();
        assert!((step - 0.02).abs() < 1e-6);
    }

    #[test]
    fn unchanged_tuning_leaves_radii_alone() {
        let mut app = reload_app();
        let pickup = app
            .world_mut()
            .spawn(Interactable::new(0.75, InteractableKind::Pickup(Item::new("gem"))))
            .id();
        app.update();
        app.update();
        assert_eq!(app.world().get::<Interactable>(pickup).unwrap().radius, 0.75);
    }
}
