use bevy::prelude::*;

use super::events::InputEvent;

/// Input intent: written in Update, consumed in FixedUpdate.
///
/// Every channel is last-value-wins; several events arriving within one frame
/// collapse into a single Intent before the fixed tick reads it.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Intent {
    /// Raw movement axis. Not normalized: diagonals are faster than axials.
    pub move_axis: Vec2,
    pub running: bool,
    pub blocking: bool,
    /// Edge latch, set on a press and consumed by the animation tick.
    pub attack_requested: bool,
    pub attack_held: bool,
    /// Edge latch, consumed by the interaction tick.
    pub interact_requested: bool,
    /// Edge latch, consumed by the interaction tick.
    pub drop_requested: bool,
}

impl Intent {
    /// Exact comparison against zero, no deadzone.
    pub fn is_moving(&self) -> bool {
        self.move_axis.x != 0.0 || self.move_axis.y != 0.0
    }

    /// Fold one input event into the intent.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::MovementChanged(axis) => self.move_axis = axis,
            InputEvent::RunChanged(running) => self.running = running,
            InputEvent::AttackPressed => {
                // Repeated presses without a release are one edge.
                if !self.attack_held {
                    self.attack_requested = true;
                }
                self.attack_held = true;
            }
            InputEvent::AttackReleased => self.attack_held = false,
            InputEvent::BlockChanged(blocking) => self.blocking = blocking,
            InputEvent::InteractPressed => self.interact_requested = true,
            InputEvent::DropPressed => self.drop_requested = true,
        }
    }

    pub fn take_attack(&mut self) -> bool {
        std::mem::take(&mut self.attack_requested)
    }

    pub fn take_interact(&mut self) -> bool {
        std::mem::take(&mut self.interact_requested)
    }

    pub fn take_drop(&mut self) -> bool {
        std::mem::take(&mut self.drop_requested)
    }
}

/// Update: fold this frame's input events into every controlled intent.
pub fn resolve_intent(
    mut events: MessageReader<InputEvent>,
    mut query: Query<&mut Intent>,
) {
    let events: Vec<InputEvent> = events.read().copied().collect();
    if events.is_empty() {
        return;
    }
    for mut intent in &mut query {
        for event in &events {
            intent.apply(event);
        }
    }
}
