use crate::core::math::{rotate_x, rotate_y, rotate_z};
use crate::core::model::{Model, ModelLibrary, WingSide};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;
use std::ops::Range;
use std::sync::Arc;

/// How far past the left / bottom edge a toaster may go before it is recycled.
pub const OFFSCREEN_MARGIN: f32 = 200.0;

pub const DEPTH_RANGE: Range<f32> = 200.0..600.0;
pub const SPEED_RANGE: Range<f32> = 1.5..3.0;
pub const WOBBLE_SPEED_RANGE: Range<f32> = 0.02..0.04;
pub const WING_SPEED_RANGE: Range<f32> = 0.15..0.20;
pub const ROT_X_RANGE: Range<f32> = 0.2..0.3;
pub const ROT_Y_RANGE: Range<f32> = -0.3..-0.1;
pub const SCALE_RANGE: Range<f32> = 40.0..70.0;

/// Peak wing deflection in radians.
pub const FLAP_AMPLITUDE: f32 = 0.5;

/// Where a (re)spawned toaster is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spawn {
    /// Anywhere on screen, so the first frame is already populated.
    Initial,
    /// Just off the top-right corner, so it flies back in.
    Respawn,
}

/// Size of the area toasters fly across, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlyingToaster {
    /// Screen-space center
    pub x: f32,
    pub y: f32,
    /// Distance into the screen, also the sort key
    pub z: f32,
    pub speed: f32,
    /// Advanced every update but not applied to the flight path.
    pub wobble: f32,
    pub wobble_speed: f32,
    pub wing_phase: f32,
    pub wing_speed: f32,
    pub rot_x: f32,
    pub rot_y: f32,
    pub scale: f32,
    pub body: Arc<Model>,
    pub left_wing: Arc<Model>,
    pub right_wing: Arc<Model>,
}

impl FlyingToaster {
    pub fn spawn<R: Rng + ?Sized>(models: &ModelLibrary, viewport: Viewport, rng: &mut R) -> Self {
        let mut toaster = Self {
            x: 0.0,
            y: 0.0,
            z: DEPTH_RANGE.start,
            speed: SPEED_RANGE.start,
            wobble: 0.0,
            wobble_speed: WOBBLE_SPEED_RANGE.start,
            wing_phase: 0.0,
            wing_speed: WING_SPEED_RANGE.start,
            rot_x: ROT_X_RANGE.start,
            rot_y: ROT_Y_RANGE.start,
            scale: SCALE_RANGE.start,
            body: Arc::clone(&models.body),
            left_wing: Arc::clone(&models.left_wing),
            right_wing: Arc::clone(&models.right_wing),
        };
        toaster.reset(Spawn::Initial, viewport, rng);
        toaster
    }

    /// Re-roll position and every flight / animation parameter.
    pub fn reset<R: Rng + ?Sized>(&mut self, spawn: Spawn, viewport: Viewport, rng: &mut R) {
        match spawn {
            Spawn::Initial => {
                self.x = rng.gen::<f32>() * viewport.width;
                self.y = rng.gen::<f32>() * viewport.height;
            }
            Spawn::Respawn => {
                self.x = viewport.width + 100.0 + rng.gen::<f32>() * 200.0;
                self.y = -100.0 - rng.gen::<f32>() * 200.0;
            }
        }

        self.z = rng.gen_range(DEPTH_RANGE);
        self.speed = rng.gen_range(SPEED_RANGE);
        self.wobble = rng.gen::<f32>() * TAU;
        self.wobble_speed = rng.gen_range(WOBBLE_SPEED_RANGE);
        self.wing_phase = rng.gen::<f32>() * TAU;
        self.wing_speed = rng.gen_range(WING_SPEED_RANGE);
        self.rot_y = rng.gen_range(ROT_Y_RANGE);
        self.rot_x = rng.gen_range(ROT_X_RANGE);
        self.scale = rng.gen_range(SCALE_RANGE);
    }

    /// One frame of flight. Returns `true` if the toaster left the screen and was respawned.
    pub fn update<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) -> bool {
        // top-right to bottom-left
        self.x -= self.speed * 2.0;
        self.y += self.speed * 1.5;
        self.wobble += self.wobble_speed;
        self.wing_phase += self.wing_speed;

        if self.is_offscreen(viewport) {
            self.reset(Spawn::Respawn, viewport, rng);
            return true;
        }
        false
    }

    pub fn is_offscreen(&self, viewport: Viewport) -> bool {
        self.x < -OFFSCREEN_MARGIN || self.y > viewport.height + OFFSCREEN_MARGIN
    }

    pub fn wing_angle(&self) -> f32 {
        self.wing_phase.sin() * FLAP_AMPLITUDE
    }

    /// Flap angle for one side; the wings beat in mirrored opposition.
    pub fn flap_angle(&self, side: WingSide) -> f32 {
        self.wing_angle() * side.sign()
    }

    pub fn wing(&self, side: WingSide) -> &Arc<Model> {
        match side {
            WingSide::Left => &self.left_wing,
            WingSide::Right => &self.right_wing,
        }
    }

    /// Model space to world space: scale, tilt, yaw, then push back by `z`.
    /// x and y stay relative to the toaster's screen center.
    pub fn to_world(&self, v: Vec3) -> Vec3 {
        let mut v = v * self.scale;
        v = rotate_x(v, self.rot_x);
        v = rotate_y(v, self.rot_y);
        v.z += self.z;
        v
    }

    /// Like `to_world`, but first swings the wing vertex about its hinge.
    pub fn wing_to_world(&self, side: WingSide, v: Vec3) -> Vec3 {
        let pivot = side.pivot_x();
        let mut local = v;
        local.x -= pivot;
        local = rotate_z(local, self.flap_angle(side));
        local.x += pivot;
        self.to_world(local)
    }
}
