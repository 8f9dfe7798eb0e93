//! Animation-state synchronisation.
//!
//! The reconciler compares what the player intends against the flags the
//! animator currently holds and emits only the writes needed to close the
//! gap. Writing a flag that already has the desired value would retrigger
//! transitions in the animator, so it never does.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use super::components::Player;
use super::intent::Intent;
use super::types::Seconds;
use crate::config::tuning::Tuning;

/// Animator parameter identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimFlag {
    Walking,
    Running,
    Block,
    Attack,
}

impl AnimFlag {
    pub fn name(self) -> &'static str {
        match self {
            AnimFlag::Walking => "walking",
            AnimFlag::Running => "running",
            AnimFlag::Block => "blocking",
            AnimFlag::Attack => "attacking",
        }
    }
}

/// Host animator parameter table.
pub trait AnimationFlagStore {
    fn get_bool(&self, flag: AnimFlag) -> bool;
    fn set_bool(&mut self, flag: AnimFlag, value: bool);
    /// Fire a one-shot trigger.
    fn set_trigger(&mut self, flag: AnimFlag);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagWrite {
    SetBool(AnimFlag, bool),
    Trigger(AnimFlag),
}

/// Current values of the persistent flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagSnapshot {
    pub walking: bool,
    pub running: bool,
    pub block: bool,
}

impl FlagSnapshot {
    pub fn read(store: &impl AnimationFlagStore) -> Self {
        Self {
            walking: store.get_bool(AnimFlag::Walking),
            running: store.get_bool(AnimFlag::Running),
            block: store.get_bool(AnimFlag::Block),
        }
    }
}

/// Writes needed to bring `current` in line with `intent`. Empty when nothing
/// changed.
pub fn reconcile(intent: &Intent, current: FlagSnapshot) -> Vec<FlagWrite> {
    let moving = intent.is_moving();
    let mut writes = Vec::new();

    let mut sync = |flag: AnimFlag, desired: bool, current: bool| {
        if desired != current {
            writes.push(FlagWrite::SetBool(flag, desired));
        }
    };
    sync(AnimFlag::Walking, moving, current.walking);
    sync(AnimFlag::Running, moving && intent.running, current.running);
    sync(AnimFlag::Block, intent.blocking, current.block);

    if intent.attack_requested {
        writes.push(FlagWrite::Trigger(AnimFlag::Attack));
    }
    writes
}

pub fn apply_writes(store: &mut impl AnimationFlagStore, writes: &[FlagWrite]) {
    for write in writes {
        match *write {
            FlagWrite::SetBool(flag, value) => store.set_bool(flag, value),
            FlagWrite::Trigger(flag) => store.set_trigger(flag),
        }
    }
}

// ── Animator component ──────────────────────────────────────────────

/// In-engine parameter table standing in for an animator controller.
#[derive(Component, Debug, Default)]
pub struct AnimatorParams {
    bools: HashMap<AnimFlag, bool>,
    pending_triggers: HashSet<AnimFlag>,
    /// Total writes received, for diagnostics.
    pub writes: u64,
}

impl AnimatorParams {
    /// Consume a pending trigger. Returns whether it was set.
    pub fn consume_trigger(&mut self, flag: AnimFlag) -> bool {
        self.pending_triggers.remove(&flag)
    }
}

impl AnimationFlagStore for AnimatorParams {
    fn get_bool(&self, flag: AnimFlag) -> bool {
        self.bools.get(&flag).copied().unwrap_or(false)
    }

    fn set_bool(&mut self, flag: AnimFlag, value: bool) {
        self.bools.insert(flag, value);
        self.writes += 1;
    }

    fn set_trigger(&mut self, flag: AnimFlag) {
        self.pending_triggers.insert(flag);
        self.writes += 1;
    }
}

/// The one-shot attack clip currently playing, if any.
#[derive(Component, Debug, Default)]
pub struct AttackSwing {
    pub remaining: Seconds,
    pub count: u32,
}

impl AttackSwing {
    pub fn is_playing(&self) -> bool {
        !self.remaining.is_expired()
    }
}

// ── Systems ─────────────────────────────────────────────────────────

/// AnimationSet: mirror player intent into the animator.
pub fn reconcile_animation_flags(
    mut query: Query<(Entity, &mut Intent, &mut AnimatorParams), With<Player>>,
) {
    for (entity, mut intent, mut params) in &mut query {
        // Skip the change-detection write when there is nothing to do.
        let writes = reconcile(&intent, FlagSnapshot::read(&*params));
        if writes.is_empty() {
            continue;
        }
        apply_writes(&mut *params, &writes);
        intent.take_attack();
        for write in &writes {
            match *write {
                FlagWrite::SetBool(flag, value) => {
                    debug!("[Animator] {entity}: {} = {value}", flag.name());
                }
                FlagWrite::Trigger(flag) => debug!("[Animator] {entity}: trigger {}", flag.name()),
            }
        }
    }
}

/// AnimatorSet: consume triggers and play one-shot clips.
pub fn advance_animator(
    tuning: Res<Tuning>,
    time: Res<Time>,
    mut query: Query<(&mut AnimatorParams, &mut AttackSwing)>,
) {
    let dt = time.delta_secs();
    for (mut params, mut swing) in &mut query {
        swing.remaining = swing.remaining.dec(dt);
        if params.consume_trigger(AnimFlag::Attack) {
            swing.remaining = Seconds::new(tuning.attack_swing_secs);
            swing.count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store that records every write it receives.
    #[derive(Default)]
    struct RecordingStore {
        params: AnimatorParams,
        log: Vec<FlagWrite>,
    }

    impl AnimationFlagStore for RecordingStore {
        fn get_bool(&self, flag: AnimFlag) -> bool {
            self.params.get_bool(flag)
        }

        fn set_bool(&mut self, flag: AnimFlag, value: bool) {
            self.log.push(FlagWrite::SetBool(flag, value));
            self.params.set_bool(flag, value);
        }

        fn set_trigger(&mut self, flag: AnimFlag) {
            self.log.push(FlagWrite::Trigger(flag));
            self.params.set_trigger(flag);
        }
    }

    /// One tick of the reconciler against a plain store.
    fn sync_flags(intent: &mut Intent, store: &mut impl AnimationFlagStore) -> Vec<FlagWrite> {
        let writes = reconcile(intent, FlagSnapshot::read(store));
        apply_writes(store, &writes);
        intent.take_attack();
        writes
    }

    fn intent(axis: Vec2, running: bool) -> Intent {
        Intent {
            move_axis: axis,
            running,
            ..default()
        }
    }

    #[test]
    fn walking_mirrors_moving_across_sequences() {
        let mut store = RecordingStore::default();
        let sequence = [
            intent(Vec2::X, false),
            intent(Vec2::ZERO, false),
            intent(Vec2::new(0.0, -1.0), true),
            intent(Vec2::new(0.0, -1.0), false),
            intent(Vec2::ZERO, true),
            intent(Vec2::ONE, true),
        ];
        for mut step in sequence {
            let moving = step.is_moving();
            sync_flags(&mut step, &mut store);
            assert_eq!(store.get_bool(AnimFlag::Walking), moving);
        }
    }

    #[test]
    fn running_implies_moving() {
        let mut store = RecordingStore::default();
        let sequence = [
            intent(Vec2::ZERO, true),
            intent(Vec2::X, true),
            intent(Vec2::ZERO, true),
            intent(Vec2::X, false),
            intent(Vec2::X, true),
            intent(Vec2::ZERO, false),
        ];
        for mut step in sequence {
            let moving = step.is_moving();
            sync_flags(&mut step, &mut store);
            if store.get_bool(AnimFlag::Running) {
                assert!(moving);
            }
        }
    }

    #[test]
    fn running_cleared_when_run_released_while_moving() {
        let mut store = RecordingStore::default();
        sync_flags(&mut intent(Vec2::X, true), &mut store);
        assert!(store.get_bool(AnimFlag::Running));

        let writes = sync_flags(&mut intent(Vec2::X, false), &mut store);
        assert_eq!(writes, vec![FlagWrite::SetBool(AnimFlag::Running, false)]);
        assert!(store.get_bool(AnimFlag::Walking));
    }

    #[test]
    fn second_call_with_unchanged_intent_writes_nothing() {
        let mut store = RecordingStore::default();
        let mut held = intent(Vec2::ONE, true);
        held.blocking = true;

        sync_flags(&mut held, &mut store);
        let first = store.log.len();
        assert_eq!(first, 3);

        sync_flags(&mut held, &mut store);
        assert_eq!(store.log.len(), first);
    }

    #[test]
    fn idle_start_writes_nothing() {
        let mut store = RecordingStore::default();
        assert!(sync_flags(&mut Intent::default(), &mut store).is_empty());
    }

    #[test]
    fn attack_fires_once_per_press_edge() {
        let mut store = RecordingStore::default();
        let mut intent = Intent::default();
        intent.apply(&crate::game::events::InputEvent::AttackPressed);
        intent.apply(&crate::game::events::InputEvent::AttackPressed);

        sync_flags(&mut intent, &mut store);
        sync_flags(&mut intent, &mut store);

        let triggers = store
            .log
            .iter()
            .filter(|w| **w == FlagWrite::Trigger(AnimFlag::Attack))
            .count();
        assert_eq!(triggers, 1);
    }

    #[test]
    fn attack_release_never_triggers() {
        let mut store = RecordingStore::default();
        let mut intent = Intent::default();
        intent.apply(&crate::game::events::InputEvent::AttackReleased);
        assert!(sync_flags(&mut intent, &mut store).is_empty());
    }

    #[test]
    fn block_follows_button_edges() {
        use crate::game::events::InputEvent;

        let mut store = RecordingStore::default();
        let mut intent = Intent::default();

        intent.apply(&InputEvent::BlockChanged(true));
        intent.apply(&InputEvent::BlockChanged(true));
        sync_flags(&mut intent, &mut store);
        assert!(store.get_bool(AnimFlag::Block));
        assert_eq!(store.log, vec![FlagWrite::SetBool(AnimFlag::Block, true)]);

        intent.apply(&InputEvent::BlockChanged(false));
        sync_flags(&mut intent, &mut store);
        assert!(!store.get_bool(AnimFlag::Block));
    }

    #[test]
    fn block_is_independent_of_movement() {
        let mut blocking = intent(Vec2::ZERO, false);
        blocking.blocking = true;
        let writes = reconcile(&blocking, FlagSnapshot::default());
        assert_eq!(writes, vec![FlagWrite::SetBool(AnimFlag::Block, true)]);
    }

    #[test]
    fn system_writes_changes_and_consumes_attack() {
        let mut app = App::new();
        app.add_systems(Update, reconcile_animation_flags);
        let player = app
            .world_mut()
            .spawn((
                Player,
                Intent {
                    move_axis: Vec2::X,
                    attack_requested: true,
                    ..default()
                },
                AnimatorParams::default(),
            ))
            .id();

        app.update();
        let params = app.world().get::<AnimatorParams>(player).unwrap();
        assert!(params.get_bool(AnimFlag::Walking));
        assert_eq!(params.writes, 2);
        assert!(!app.world().get::<Intent>(player).unwrap().attack_requested);

        app.update();
        assert_eq!(app.world().get::<AnimatorParams>(player).unwrap().writes, 2);
    }

    #[test]
    fn animator_consumes_trigger_once() {
        let mut params = AnimatorParams::default();
        params.set_trigger(AnimFlag::Attack);
        assert!(params.consume_trigger(AnimFlag::Attack));
        assert!(!params.consume_trigger(AnimFlag::Attack));
        assert_eq!(params.writes, 1);
    }

    #[test]
    fn flag_names_match_animator_parameters() {
        assert_eq!(AnimFlag::Walking.name(), "walking");
        assert_eq!(AnimFlag::Running.name(), "running");
        assert_eq!(AnimFlag::Block.name(), "blocking");
        assert_eq!(AnimFlag::Attack.name(), "attacking");
    }
}
