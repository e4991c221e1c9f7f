//! Camera mapper: transform plus lens parameters.
//!
//! `UserData` layout:
//!
//! | index | meaning |
//! |-------|---------|
//! | 0..=2 | translation x, y, z |
//! | 3..=5 | Euler angles about x, y, z |
//! | 6..=8 | focal length, focus distance, aperture |
//! | 9     | unused |
//!
//! Existing emitters and consumers expect the lens values to be read from
//! indices 0..=2, which is what [`LensChannels::Aliased`] does. Use
//! [`LensChannels::Direct`] to read 6..=8.

use glam::{DQuat, DVec3};
use serde_json::Value;

use super::{PayloadMapper, user_data};
use crate::error::MappingError;
use crate::role::{CameraFrameData, CameraStaticData, FrameData, Role, StaticData, Transform};

/// Unit of the Euler angles in `UserData[3..=5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Degrees => angle.to_radians(),
            AngleUnit::Radians => angle,
        }
    }
}

/// Intrinsic rotation order.
///
/// `Zyx` means rotate about Z, then about the new Y, then about the new X,
/// giving `Rz * Ry * Rx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationOrder {
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    #[default]
    Zyx,
}

impl RotationOrder {
    fn axes(self) -> [usize; 3] {
        match self {
            RotationOrder::Xyz => [0, 1, 2],
            RotationOrder::Xzy => [0, 2, 1],
            RotationOrder::Yxz => [1, 0, 2],
            RotationOrder::Yzx => [1, 2, 0],
            RotationOrder::Zxy => [2, 0, 1],
            RotationOrder::Zyx => [2, 1, 0],
        }
    }
}

/// Sign convention of the angles about X and Y.
///
/// Emitters that speak in roll/pitch/yaw for a Z-up, left-handed scene send
/// roll and pitch with the opposite sign of a right-handed rotation about
/// the same axis. Yaw about Z is the same in both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handedness {
    /// Roll and pitch are negated before composing: `Rz(z) * Ry(-y) * Rx(-x)`
    /// for the Z-Y-X order.
    #[default]
    LeftHanded,
    /// Angles are used as sent.
    RightHanded,
}

impl Handedness {
    fn sign(self, axis: usize) -> f64 {
        match (self, axis) {
            (Handedness::LeftHanded, 0 | 1) => -1.0,
            _ => 1.0,
        }
    }
}

/// How Euler angles become a rotation.
///
/// The default is degrees, Z-Y-X order, left-handed: the rotator convention
/// existing camera emitters are written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EulerConvention {
    pub unit: AngleUnit,
    pub order: RotationOrder,
    pub handedness: Handedness,
}

impl EulerConvention {
    /// Create a convention from a unit and an order, with the default
    /// handedness.
    pub fn new(unit: AngleUnit, order: RotationOrder) -> Self {
        Self {
            unit,
            order,
            handedness: Handedness::default(),
        }
    }

    /// Set the handedness.
    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    /// Convert angles about x, y and z to a rotation.
    pub fn to_quat(&self, angles: [f64; 3]) -> DQuat {
        let axis_rotation = |axis: usize| {
            let angle = self.handedness.sign(axis) * self.unit.to_radians(angles[axis]);
            match axis {
                0 => DQuat::from_rotation_x(angle),
                1 => DQuat::from_rotation_y(angle),
                _ => DQuat::from_rotation_z(angle),
            }
        };
        let [first, second, third] = self.order.axes();
        (axis_rotation(first) * axis_rotation(second) * axis_rotation(third)).normalize()
    }
}

/// Which `UserData` indices carry the lens values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LensChannels {
    /// Indices 0, 1 and 2, the same values as the translation.
    #[default]
    Aliased,
    /// Indices 6, 7 and 8.
    Direct,
}

impl LensChannels {
    /// Indices of focal length, focus distance and aperture.
    pub fn indices(self) -> [usize; 3] {
        match self {
            LensChannels::Aliased => [0, 1, 2],
            LensChannels::Direct => [6, 7, 8],
        }
    }
}

/// Maps `UserData` onto a camera transform and lens.
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraMapper {
    euler: EulerConvention,
    lens: LensChannels,
}

impl CameraMapper {
    /// Create a camera mapper with the default convention and aliased lens
    /// channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Euler convention.
    pub fn euler_convention(mut self, euler: EulerConvention) -> Self {
        self.euler = euler;
        self
    }

    /// Set which indices carry the lens values.
    pub fn lens_channels(mut self, lens: LensChannels) -> Self {
        self.lens = lens;
        self
    }

    /// The active Euler convention.
    pub fn euler(&self) -> EulerConvention {
        self.euler
    }

    /// The active lens channel selection.
    pub fn lens(&self) -> LensChannels {
        self.lens
    }
}

impl PayloadMapper for CameraMapper {
    fn role(&self) -> Role {
        Role::Camera
    }

    fn static_data(&self) -> StaticData {
        StaticData::Camera(CameraStaticData {
            is_focal_length_supported: true,
            is_focus_distance_supported: true,
            is_aperture_supported: true,
        })
    }

    fn frame_data(&self, value: &Value) -> Result<FrameData, MappingError> {
        let data = user_data(value)?;

        let translation = DVec3::new(data[0], data[1], data[2]);
        let rotation = self.euler.to_quat([data[3], data[4], data[5]]);
        let [focal_length, focus_distance, aperture] = self.lens.indices().map(|i| data[i]);

        Ok(FrameData::Camera(CameraFrameData {
            transform: Transform::from_rotation_translation(rotation, translation),
            focal_length,
            focus_distance,
            aperture,
        }))
    }
}
