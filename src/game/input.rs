use bevy::prelude::*;

use super::events::InputEvent;

/// Button/axis state polled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub axis: Vec2,
    pub run: bool,
    pub attack: bool,
    pub block: bool,
    pub interact: bool,
    pub drop: bool,
}

impl InputSnapshot {
    /// WASD / arrows move, Shift runs, left mouse or J attacks,
    /// right mouse or K blocks, E interacts, G drops the last item.
    pub fn poll(keyboard: &ButtonInput<KeyCode>, mouse: &ButtonInput<MouseButton>) -> Self {
        let held = |a: KeyCode, b: KeyCode| keyboard.pressed(a) || keyboard.pressed(b);
        let axis_of = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;

        let x = axis_of(
            held(KeyCode::KeyD, KeyCode::ArrowRight),
            held(KeyCode::KeyA, KeyCode::ArrowLeft),
        );
        let y = axis_of(
            held(KeyCode::KeyW, KeyCode::ArrowUp),
            held(KeyCode::KeyS, KeyCode::ArrowDown),
        );

        Self {
            axis: Vec2::new(x, y),
            run: held(KeyCode::ShiftLeft, KeyCode::ShiftRight),
            attack: mouse.pressed(MouseButton::Left) || keyboard.pressed(KeyCode::KeyJ),
            block: mouse.pressed(MouseButton::Right) || keyboard.pressed(KeyCode::KeyK),
            interact: keyboard.pressed(KeyCode::KeyE),
            drop: keyboard.pressed(KeyCode::KeyG),
        }
    }

    /// Events describing the transition from `prev` to `self`. Edges only.
    pub fn diff(&self, prev: &InputSnapshot) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if self.axis != prev.axis {
            events.push(InputEvent::MovementChanged(self.axis));
        }
        if self.run != prev.run {
            events.push(InputEvent::RunChanged(self.run));
        }
        match (prev.attack, self.attack) {
            (false, true) => events.push(InputEvent::AttackPressed),
            (true, false) => events.push(InputEvent::AttackReleased),
            _ => {}
        }
        if self.block != prev.block {
            events.push(InputEvent::BlockChanged(self.block));
        }
        if self.interact && !prev.interact {
            events.push(InputEvent::InteractPressed);
        }
        if self.drop && !prev.drop {
            events.push(InputEvent::DropPressed);
        }
        events
    }
}

/// Update: poll devices and publish input edges.
pub fn poll_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut last: Local<InputSnapshot>,
    mut out: MessageWriter<InputEvent>,
) {
    let snapshot = InputSnapshot::poll(&keyboard, &mouse);
    for event in snapshot.diff(&last) {
        out.write(event);
    }
    *last = snapshot;
}
