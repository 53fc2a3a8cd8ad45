//! Per-frame scene transform and the projection/model-view matrix contract.
//!
//! The model-view composition order -- translation first, then rotation
//! about X, then Y, then Z -- is a contract, not an implementation detail:
//! rotations do not commute, and downstream output depends on this exact
//! order.

use glam::{Mat4, Vec3};

/// Vertical field of view of the scene camera, in radians.
pub const FOV_Y_RADIANS: f32 = 45.0 * (std::f32::consts::PI / 180.0);
/// Near clipping plane distance.
pub const NEAR_PLANE: f32 = 0.1;
/// Far clipping plane distance.
pub const FAR_PLANE: f32 = 100.0;

/// The stock view translation: geometry pushed six units into the scene,
/// comfortably inside the frustum at the 45° field of view.
pub const DEFAULT_VIEW_TRANSLATION: Vec3 = Vec3::new(0.0, 0.0, -6.0);

/// Normalizes an angle in radians to the range [0, 2π).
///
/// Used by the driving loop to keep per-frame rotation angles bounded.
pub fn wrap_angle(radians: f32) -> f32 {
    let tau = std::f32::consts::TAU;
    let wrapped = radians.rem_euclid(tau);
    // rem_euclid of a tiny negative value can round up to exactly TAU.
    if wrapped >= tau {
        0.0
    } else {
        wrapped
    }
}

/// Builds the scene perspective projection for a surface of the given pixel
/// dimensions: 45° vertical FOV, aspect = width/height, near 0.1, far 100.0.
pub fn projection(width: u32, height: u32) -> Mat4 {
    let aspect = width as f32 / height as f32;
    Mat4::perspective_rh_gl(FOV_Y_RADIANS, aspect, NEAR_PLANE, FAR_PLANE)
}

/// Rotation angles and translation for one frame of the scene pass.
///
/// Owned per frame and immutable once handed to the renderer. The driving
/// loop is responsible for keeping the angles in [0, 2π) via [`wrap_angle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    /// Rotation about the X axis, radians.
    pub rotation_x: f32,
    /// Rotation about the Y axis, radians.
    pub rotation_y: f32,
    /// Rotation about the Z axis, radians.
    pub rotation_z: f32,
    /// Translation applied before the rotations.
    pub translation: Vec3,
}

impl SceneTransform {
    /// Creates a transform from explicit rotation angles and translation.
    pub fn new(rotation_x: f32, rotation_y: f32, rotation_z: f32, translation: Vec3) -> Self {
        Self {
            rotation_x,
            rotation_y,
            rotation_z,
            translation,
        }
    }

    /// Derives the per-frame transform the way the external frame loop
    /// does: one wrapped angle `seconds * angular_velocity` applied to all
    /// three axes.
    pub fn spinning(seconds: f64, angular_velocity: f64, translation: Vec3) -> Self {
        let angle = wrap_angle((seconds * angular_velocity) as f32);
        Self::new(angle, angle, angle, translation)
    }

    /// Composes the model-view matrix: translation first, then rotation
    /// about X, then Y, then Z, in that fixed order.
    pub fn model_view(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_x(self.rotation_x)
            * Mat4::from_rotation_y(self.rotation_y)
            * Mat4::from_rotation_z(self.rotation_z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const VIEW_DISTANCE: Vec3 = DEFAULT_VIEW_TRANSLATION;

    fn mats_approx_eq(a: Mat4, b: Mat4) -> bool {
        a.to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
            .all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn wrap_angle_leaves_small_positive_angles_unchanged() {
        assert!((wrap_angle(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn wrap_angle_wraps_full_turn_to_zero() {
        assert!(wrap_angle(std::f32::consts::TAU) < 1e-6);
    }

    #[test]
    fn wrap_angle_maps_negative_angles_into_range() {
        let wrapped = wrap_angle(-0.5);
        assert!(
            (wrapped - (std::f32::consts::TAU - 0.5)).abs() < 1e-5,
            "got {wrapped}"
        );
    }

    #[test]
    fn zero_rotation_model_view_is_pure_translation() {
        let t = SceneTransform::new(0.0, 0.0, 0.0, VIEW_DISTANCE);
        assert!(mats_approx_eq(
            t.model_view(),
            Mat4::from_translation(VIEW_DISTANCE)
        ));
    }

    #[test]
    fn rotation_order_is_not_commutative() {
        // Contract check: translate -> rotX -> rotY -> rotZ must differ from
        // the reversed composition for a nonzero angle on more than one axis.
        let theta = 0.7;
        let contract = Mat4::from_translation(VIEW_DISTANCE)
            * Mat4::from_rotation_x(theta)
            * Mat4::from_rotation_y(theta)
            * Mat4::from_rotation_z(theta);
        let reversed = Mat4::from_rotation_z(theta)
            * Mat4::from_rotation_y(theta)
            * Mat4::from_rotation_x(theta)
            * Mat4::from_translation(VIEW_DISTANCE);
        assert!(
            !mats_approx_eq(contract, reversed),
            "rotation composition unexpectedly commuted"
        );
    }

    #[test]
    fn model_view_matches_contract_composition() {
        let t = SceneTransform::new(0.3, 1.1, 2.0, VIEW_DISTANCE);
        let expected = Mat4::from_translation(VIEW_DISTANCE)
            * Mat4::from_rotation_x(0.3)
            * Mat4::from_rotation_y(1.1)
            * Mat4::from_rotation_z(2.0);
        assert!(mats_approx_eq(t.model_view(), expected));
    }

    #[test]
    fn spinning_wraps_angle_and_applies_it_to_all_axes() {
        let t = SceneTransform::spinning(10.0, 1.0, VIEW_DISTANCE);
        let expected = wrap_angle(10.0);
        assert!((t.rotation_x - expected).abs() < 1e-6);
        assert!((t.rotation_y - expected).abs() < 1e-6);
        assert!((t.rotation_z - expected).abs() < 1e-6);
        assert!(t.rotation_x >= 0.0 && t.rotation_x < std::f32::consts::TAU);
    }

    #[test]
    fn unrotated_cube_at_view_distance_is_inside_frustum() {
        // A cube spanning [-1, 1] translated to (0, 0, -6) must sit entirely
        // inside the frustum of a 45° / 640x480 / 0.1..100.0 camera.
        let proj = projection(640, 480);
        let mv = SceneTransform::new(0.0, 0.0, 0.0, VIEW_DISTANCE).model_view();
        for x in [-1.0f32, 1.0] {
            for y in [-1.0f32, 1.0] {
                for z in [-1.0f32, 1.0] {
                    let clip = proj * mv * Vec4::new(x, y, z, 1.0);
                    let w = clip.w;
                    assert!(w > 0.0, "corner ({x},{y},{z}) behind camera");
                    assert!(
                        clip.x.abs() <= w && clip.y.abs() <= w,
                        "corner ({x},{y},{z}) outside lateral frustum planes"
                    );
                    assert!(
                        clip.z >= -w && clip.z <= w,
                        "corner ({x},{y},{z}) outside depth range"
                    );
                }
            }
        }
    }

    #[test]
    fn projection_aspect_follows_viewport() {
        // Wider viewport compresses x relative to y by the aspect ratio.
        let proj = projection(1280, 720);
        let x_scale = proj.col(0).x;
        let y_scale = proj.col(1).y;
        let aspect = 1280.0 / 720.0;
        assert!(
            (y_scale / x_scale - aspect).abs() < 1e-4,
            "x scale {x_scale}, y scale {y_scale}"
        );
    }

    // -- Property-based tests --

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn wrap_angle_always_lands_in_zero_tau(a in -1.0e4f32..1.0e4) {
                let wrapped = wrap_angle(a);
                prop_assert!(
                    (0.0..std::f32::consts::TAU).contains(&wrapped),
                    "wrap_angle({a}) = {wrapped} out of range"
                );
            }

            #[test]
            fn wrap_angle_is_idempotent(a in -1.0e4f32..1.0e4) {
                let once = wrap_angle(a);
                let twice = wrap_angle(once);
                prop_assert!((once - twice).abs() < 1e-5);
            }
        }
    }
}
