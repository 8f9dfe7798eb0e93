use bevy::prelude::*;

use super::interact::InteractOutcome;

/// Discrete input events, diffed from the polled input snapshot.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Raw movement axis, un-normalized.
    MovementChanged(Vec2),
    RunChanged(bool),
    AttackPressed,
    AttackReleased,
    BlockChanged(bool),
    InteractPressed,
    DropPressed,
}

/// Result of the player interacting with something in the world.
#[derive(Message, Debug, Clone)]
pub struct InteractionMessage {
    pub actor: Entity,
    pub target: Entity,
    pub target_name: String,
    pub outcome: InteractOutcome,
}
