//! Perspective correction for an orthographic camera
//!
//! The theater renders through an orthographic camera but wants nodes to
//! shift as if seen through a perspective one. [`project`] maps a "flat"
//! world position to the position that reproduces that apparent shift.
//!
//! Each screen axis is handled independently on its own plane: x on the XZ
//! plane, y on the YZ plane. Depth is passed through untouched.

use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};

/// Planar look vectors with a squared length at or below this value are
/// treated as pointing straight at the camera.
pub const PLANAR_EPSILON: f32 = f32::EPSILON;

/// Camera state the projection reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    /// World position of the camera
    pub viewpoint: Vec3,
    /// Orthographic half-height of the camera
    pub orthographic_half_height: f32,
    /// Simulated field of view, in degrees
    pub field_of_view_degrees: f32,
}

impl ViewParams {
    pub fn new(viewpoint: Vec3, orthographic_half_height: f32, field_of_view_degrees: f32) -> Self {
        Self {
            viewpoint,
            orthographic_half_height,
            field_of_view_degrees,
        }
    }

    /// `π · half_height · 0.5 / fov_radians`
    pub fn correction_multiplier(&self) -> f32 {
        PI * self.orthographic_half_height * 0.5 / self.field_of_view_degrees.to_radians()
    }
}

/// Signed angle in radians from `from` to `to`
///
/// The magnitude is `acos` of the clamped normalized dot product. The sign
/// follows the 2D cross product, with zero counting as positive, so a
/// vector pointing exactly opposite to `from` yields `+π`.
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    let denominator = (from.length_squared() * to.length_squared()).sqrt();
    if denominator < 1e-15 {
        return 0.0;
    }
    let angle = (from.dot(to) / denominator).clamp(-1.0, 1.0).acos();
    if from.perp_dot(to) >= 0.0 {
        angle
    } else {
        -angle
    }
}

/// Perspective-corrected position of `target` as seen from `view`
pub fn project(target: Vec3, view: &ViewParams) -> Vec3 {
    let look = target - view.viewpoint;
    let multiplier = view.correction_multiplier();
    Vec3::new(
        view.viewpoint.x + corrected_axis(Vec2::new(look.x, look.z), multiplier),
        view.viewpoint.y + corrected_axis(Vec2::new(look.y, look.z), multiplier),
        target.z,
    )
}

/// Offset from the viewpoint along one screen axis
fn corrected_axis(planar: Vec2, multiplier: f32) -> f32 {
    // Target sits on the camera in this plane
    if planar.length_squared() <= PLANAR_EPSILON {
        return 0.0;
    }
    let angle = signed_angle(Vec2::X, planar.normalize());
    angle.cos() * (multiplier / (angle - FRAC_PI_2).cos())
}
