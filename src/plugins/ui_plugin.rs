use bevy::prelude::*;

use crate::game::animation::{AnimFlag, AnimationFlagStore, AnimatorParams, AttackSwing};
use crate::game::components::*;
use crate::game::events::InteractionMessage;
use crate::game::interact::InteractOutcome;
use crate::game::inventory::Inventory;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LastInteraction>();
        app.add_systems(Startup, setup_ui);
        app.add_systems(
            Update,
            (
                record_interactions,
                update_state_display,
                update_inventory_display,
            )
                .chain(),
        );
    }
}

#[derive(Component)]
struct StateText;

#[derive(Component)]
struct InventoryText;

#[derive(Resource, Default)]
struct LastInteraction(Option<String>);

fn setup_ui(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                StateText,
                Text::new("---"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            parent.spawn((
                InventoryText,
                Text::new("Inventory: ---"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.2)),
            ));

            parent.spawn((
                Text::new(
                    "WASD move, Shift run, LMB/J attack, RMB/K block, E interact, G drop, \
                     wheel zoom, Z/C orbit, F5 reload tuning",
                ),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
            ));
        });
}

fn record_interactions(
    mut events: MessageReader<InteractionMessage>,
    mut last: ResMut<LastInteraction>,
) {
    for event in events.read() {
        debug!("[Interaction] {} -> {}: {:?}", event.actor, event.target, event.outcome);
        let line = match &event.outcome {
            InteractOutcome::Inspected { description } => {
                format!("{}: {}", event.target_name, description)
            }
            InteractOutcome::PickedUp(_) => format!("Picked up {}", event.target_name),
            InteractOutcome::InventoryFull { capacity } => {
                format!("Inventory full ({capacity}), {} left behind", event.target_name)
            }
        };
        last.0 = Some(line);
    }
}

fn update_state_display(
    player_q: Query<(&AnimatorParams, &AttackSwing, &MotionState, &KinematicBody), With<Player>>,
    mut text_query: Query<&mut Text, With<StateText>>,
) {
    let Ok((params, swing, motion, body)) = player_q.single() else {
        return;
    };
    let flag = |f: AnimFlag| if params.get_bool(f) { "on" } else { "off" };

    for mut text in &mut text_query {
        **text = format!(
            "walking:{} running:{} block:{} attack:{} (x{})\n\
             gait:{:?} speed:{:.2} vy:{:.2} grounded:{}  animator writes:{}",
            flag(AnimFlag::Walking),
            flag(AnimFlag::Running),
            flag(AnimFlag::Block),
            if swing.is_playing() { "swing" } else { "-" },
            swing.count,
            motion.gait,
            motion.horizontal_velocity.length(),
            motion.vertical_velocity,
            body.grounded,
            params.writes,
        );
    }
}

fn update_inventory_display(
    player_q: Query<&Inventory, With<Player>>,
    last: Res<LastInteraction>,
    mut text_query: Query<&mut Text, With<InventoryText>>,
) {
    let Ok(inventory) = player_q.single() else {
        return;
    };
    let names: Vec<&str> = inventory.items().iter().map(|i| i.name.as_str()).collect();

    for mut text in &mut text_query {
        **text = format!(
            "Inventory ({}/{}): {}\n{}",
            inventory.len(),
            inventory.capacity(),
            if inventory.is_empty() { "empty".to_string() } else { names.join(", ") },
            last.0.as_deref().unwrap_or(""),
        );
    }
}
