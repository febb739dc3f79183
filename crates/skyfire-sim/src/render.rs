//! Render boundary.
//!
//! The simulation never talks to a graphics API. Each object turns itself
//! into a `DrawItem` against a caller-provided `ViewContext`, and the
//! renderer collects them through a `DrawSink`.

use glam::{Mat4, Quat, Vec3, Vec4};

use skyfire_core::enums::ObjectKind;

const FIELD_OF_VIEW: f32 = std::f32::consts::FRAC_PI_3;
const NEAR_PLANE: f32 = 0.5;

/// View/projection state supplied by the renderer for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext {
    pub view_projection: Mat4,
    pub eye: Vec3,
    /// Objects farther than this from the eye are culled.
    pub far: f32,
}

impl ViewContext {
    pub fn new(view_projection: Mat4, eye: Vec3, far: f32) -> Self {
        Self {
            view_projection,
            eye,
            far,
        }
    }

    /// Perspective camera at `eye` looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3, aspect: f32, far: f32) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let projection = Mat4::perspective_rh(FIELD_OF_VIEW, aspect, NEAR_PLANE, far);
        Self::new(projection * view, eye, far)
    }

    /// Clip-space position of a world point.
    pub fn project(&self, point: Vec3) -> Vec4 {
        self.view_projection * point.extend(1.0)
    }

    /// In front of the camera and within the far distance.
    pub fn is_visible(&self, point: Vec3) -> bool {
        self.project(point).w > 0.0 && self.eye.distance(point) <= self.far
    }
}

/// One object to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub kind: ObjectKind,
    pub callsign: Option<u32>,
    pub model: Mat4,
    pub clip_position: Vec4,
    /// Opacity; only fading Slugs draw below 1.0.
    pub alpha: f32,
}

impl DrawItem {
    pub fn new(
        ctx: &ViewContext,
        kind: ObjectKind,
        callsign: Option<u32>,
        position: Vec3,
        orientation: Quat,
        alpha: f32,
    ) -> Self {
        Self {
            kind,
            callsign,
            model: Mat4::from_rotation_translation(orientation, position),
            clip_position: ctx.project(position),
            alpha,
        }
    }
}

/// Receives draw items from the simulation's render pass.
pub trait DrawSink {
    fn draw(&mut self, item: DrawItem);
}

impl DrawSink for Vec<DrawItem> {
    fn draw(&mut self, item: DrawItem) {
        self.push(item);
    }
}
