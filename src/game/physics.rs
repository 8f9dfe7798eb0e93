use bevy::prelude::*;

use super::components::*;
use super::intent::Intent;
use crate::config::tuning::Tuning;

/// Host-side collision resolution. The controller only requests displacements.
pub trait PhysicsMover {
    fn move_by(&mut self, displacement: Vec3);
    fn is_grounded(&self) -> bool;
}

/// Locomotion mode; decides the horizontal speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gait {
    #[default]
    Walk,
    Run,
    Block,
}

impl Gait {
    /// Priority: running > blocking > walking.
    pub fn select(intent: &Intent) -> Self {
        if intent.running {
            Gait::Run
        } else if intent.blocking {
            Gait::Block
        } else {
            Gait::Walk
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub walk_multiplier: f32,
    pub run_multiplier: f32,
    pub block_multiplier: f32,
    pub grounded_gravity: f32,
    pub airborne_gravity: f32,
}

impl MotionParams {
    pub fn multiplier(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Walk => self.walk_multiplier,
            Gait::Run => self.run_multiplier,
            Gait::Block => self.block_multiplier,
        }
    }
}

/// Map an input axis onto the ground plane. Axis +y is forward (-Z).
pub fn ground_direction(axis: Vec2) -> Vec3 {
    Vec3::new(axis.x, 0.0, -axis.y)
}

/// One tick of planned motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionStep {
    pub gait: Gait,
    pub horizontal_velocity: Vec3,
    pub vertical_velocity: f32,
    pub displacement: Vec3,
}

/// Plan this tick's velocity and displacement. `None` when the inputs
/// would put a non-finite value into the mover.
pub fn plan_motion(
    intent: &Intent,
    grounded: bool,
    params: &MotionParams,
    dt: f32,
) -> Option<MotionStep> {
    if !dt.is_finite() || dt <= 0.0 || !intent.move_axis.is_finite() {
        return None;
    }

    let gait = Gait::select(intent);
    let horizontal_velocity = ground_direction(intent.move_axis) * params.multiplier(gait);

    // Fixed per-tick values, not integrated over time.
    let vertical_velocity = if grounded {
        params.grounded_gravity
    } else {
        params.airborne_gravity
    };

    let velocity = horizontal_velocity + Vec3::Y * vertical_velocity;
    Some(MotionStep {
        gait,
        horizontal_velocity,
        vertical_velocity,
        displacement: velocity * dt,
    })
}

/// Advance one tick against any mover, recording the result in `state`.
pub fn step_motion(
    intent: &Intent,
    mover: &mut impl PhysicsMover,
    params: &MotionParams,
    dt: f32,
    state: &mut MotionState,
) -> Option<MotionStep> {
    let step = plan_motion(intent, mover.is_grounded(), params, dt)?;
    mover.move_by(step.displacement);
    state.gait = step.gait;
    state.horizontal_velocity = step.horizontal_velocity;
    state.vertical_velocity = step.vertical_velocity;
    Some(step)
}

/// Kinematic mover resolving against a flat ground plane.
pub struct GroundMover<'a> {
    pub transform: &'a mut Transform,
    pub body: &'a mut KinematicBody,
}

impl PhysicsMover for GroundMover<'_> {
    fn move_by(&mut self, displacement: Vec3) {
        let mut target = self.transform.translation + displacement;
        if target.y <= self.body.ground_height {
            target.y = self.body.ground_height;
            self.body.grounded = true;
        } else {
            self.body.grounded = false;
        }
        self.transform.translation = target;
    }

    fn is_grounded(&self) -> bool {
        self.body.grounded
    }
}

/// MotionSet: integrate intent into a displacement and hand it to the mover.
pub fn integrate_motion(
    tuning: Res<Tuning>,
    time: Res<Time>,
    mut query: Query<(&Intent, &mut Transform, &mut KinematicBody, &mut MotionState), With<Player>>,
    mut tick: Local<u32>,
) {
    *tick = tick.wrapping_add(1);
    let log_this_tick = *tick % 60 == 0;

    let params = tuning.motion_params();
    let dt = time.delta_secs();
    for (intent, mut transform, mut body, mut state) in &mut query {
        let mut mover = GroundMover {
            transform: &mut transform,
            body: &mut body,
        };
        let Some(step) = step_motion(intent, &mut mover, &params, dt, &mut state) else {
            continue;
        };

        if log_this_tick {
            debug!(
                "[Motion] gait={:?} speed={:.2} vy={:.2} grounded={}",
                step.gait,
                step.horizontal_velocity.length(),
                step.vertical_velocity,
                body.grounded
            );
        }
    }
}
