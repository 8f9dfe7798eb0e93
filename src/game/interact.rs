use bevy::prelude::*;

use super::components::Player;
use super::events::InteractionMessage;
use super::intent::Intent;
use super::inventory::{Inventory, Item, ItemId};
use crate::config::tuning::Tuning;

/// Pre-built mesh/material handles for pickups spawned at runtime.
#[derive(Resource)]
pub struct PickupAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Offset in front of the player where dropped items land.
const DROP_DISTANCE: f32 = 1.2;

/// What an interactable does when the player reaches it.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractableKind {
    /// Look at something; leaves it in place.
    Inspect { description: String },
    /// Move the item into the player's inventory.
    Pickup(Item),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractOutcome {
    Inspected { description: String },
    PickedUp(ItemId),
    InventoryFull { capacity: usize },
}

#[derive(Component, Debug, Clone)]
pub struct Interactable {
    pub radius: f32,
    pub kind: InteractableKind,
    pub has_interacted: bool,
}

impl Interactable {
    pub fn new(radius: f32, kind: InteractableKind) -> Self {
        Self {
            radius,
            kind,
            has_interacted: false,
        }
    }

    /// Strictly inside the interaction radius.
    pub fn in_range(&self, own: Vec3, other: Vec3) -> bool {
        own.distance(other) < self.radius
    }

    pub fn interact(&mut self, inventory: &mut Inventory) -> InteractOutcome {
        self.has_interacted = true;
        match &self.kind {
            InteractableKind::Inspect { description } => InteractOutcome::Inspected {
                description: description.clone(),
            },
            InteractableKind::Pickup(item) => match inventory.add_item(item.clone()) {
                Ok(()) => InteractOutcome::PickedUp(item.id),
                Err(_) => InteractOutcome::InventoryFull {
                    capacity: inventory.capacity(),
                },
            },
        }
    }
}

/// Index of the closest interactable in range of `player`, if any.
pub fn nearest_in_range<'a>(
    player: Vec3,
    candidates: impl IntoIterator<Item = (Vec3, &'a Interactable)>,
) -> Option<usize> {
    candidates
        .into_iter()
        .enumerate()
        .filter(|(_, (pos, it))| it.in_range(*pos, player))
        .min_by(|(_, (a, _)), (_, (b, _))| a.distance(player).total_cmp(&b.distance(player)))
        .map(|(i, _)| i)
}

fn publish(
    commands: &mut Commands,
    out: &mut MessageWriter<InteractionMessage>,
    actor: Entity,
    target: Entity,
    name: Option<&Name>,
    outcome: InteractOutcome,
) {
    let target_name = name.map(|n| n.as_str().to_owned()).unwrap_or_else(|| format!("{target}"));
    match &outcome {
        InteractOutcome::Inspected { description } => {
            info!("Interacted with {target_name}: {description}");
        }
        InteractOutcome::PickedUp(_) => {
            info!("Picked up {target_name}");
            commands.entity(target).despawn();
        }
        InteractOutcome::InventoryFull { capacity } => {
            warn!("Cannot pick up {target_name}: inventory full ({capacity})");
        }
    }
    out.write(InteractionMessage {
        actor,
        target,
        target_name,
        outcome,
    });
}

/// InteractionSet: proximity triggers, once per interactable.
pub fn proximity_interactions(
    mut commands: Commands,
    mut players: Query<(Entity, &Transform, &mut Inventory), With<Player>>,
    mut interactables: Query<(Entity, &Transform, &mut Interactable, Option<&Name>), Without<Player>>,
    mut out: MessageWriter<InteractionMessage>,
) {
    for (player, player_tf, mut inventory) in &mut players {
        for (target, tf, mut interactable, name) in &mut interactables {
            if interactable.has_interacted
                || !interactable.in_range(tf.translation, player_tf.translation)
            {
                continue;
            }
            let outcome = interactable.interact(&mut inventory);
            publish(&mut commands, &mut out, player, target, name, outcome);
        }
    }
}

/// InteractionSet: the interact button reaches the nearest interactable in
/// range, including ones that already fired (e.g. a refused pickup).
pub fn button_interactions(
    mut commands: Commands,
    mut players: Query<(Entity, &Transform, &mut Intent, &mut Inventory), With<Player>>,
    mut interactables: Query<(Entity, &Transform, &mut Interactable, Option<&Name>), Without<Player>>,
    mut out: MessageWriter<InteractionMessage>,
) {
    for (player, player_tf, mut intent, mut inventory) in &mut players {
        if !intent.take_interact() {
            continue;
        }
        let nearest = {
            let candidates: Vec<(Entity, Vec3, &Interactable)> = interactables
                .iter()
                .map(|(e, tf, it, _)| (e, tf.translation, it))
                .collect();
            nearest_in_range(
                player_tf.translation,
                candidates.iter().map(|(_, pos, it)| (*pos, *it)),
            )
            .map(|i| candidates[i].0)
        };
        let Some(target) = nearest else {
            debug!("Interact pressed with nothing in range");
            continue;
        };
        let Ok((_, _, mut interactable, name)) = interactables.get_mut(target) else {
            continue;
        };
        let outcome = interactable.interact(&mut inventory);
        publish(&mut commands, &mut out, player, target, name, outcome);
    }
}

/// InteractionSet: drop the most recently collected item in front of the
/// player. It waits for the interact button instead of the proximity trigger.
pub fn drop_items(
    mut commands: Commands,
    tuning: Res<Tuning>,
    assets: Res<PickupAssets>,
    mut players: Query<(&Transform, &mut Intent, &mut Inventory), With<Player>>,
) {
    for (player_tf, mut intent, mut inventory) in &mut players {
        if !intent.take_drop() {
            continue;
        }
        let Some(id) = inventory.items().last().map(|item| item.id) else {
            debug!("Drop pressed with an empty inventory");
            continue;
        };
        let item = match inventory.remove_item(&id) {
            Ok(item) => item,
            Err(e) => {
                warn!("Drop failed: {e}");
                continue;
            }
        };

        let forward = player_tf.rotation * Vec3::NEG_Z;
        let pos = player_tf.translation + forward * DROP_DISTANCE + Vec3::Y * 0.2;
        info!("Dropped {}", item.name);

        let mut interactable = Interactable::new(tuning.interact_radius, InteractableKind::Pickup(item.clone()));
        interactable.has_interacted = true;
        commands.spawn((
            Name::new(item.name),
            interactable,
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.material.clone()),
            Transform::from_translation(pos),
        ));
    }
}
