//! Roles and the data shapes published for each.
//!
//! A role fixes two shapes: the static data announced once per subject and
//! the frame data pushed for every datagram.

use std::fmt;

use glam::{DQuat, DVec3};
use serde::Serialize;

/// The kind of subject a source publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    /// Free-form numeric channels.
    Basic,
    /// Camera transform plus lens parameters.
    Camera,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Basic => write!(f, "Basic"),
            Role::Camera => write!(f, "Camera"),
        }
    }
}

/// Static data announced once per subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StaticData {
    /// Channel names for a basic subject.
    Basic(BasicStaticData),
    /// Lens capabilities for a camera subject.
    Camera(CameraStaticData),
}

impl StaticData {
    /// The role this data belongs to.
    pub fn role(&self) -> Role {
        match self {
            StaticData::Basic(_) => Role::Basic,
            StaticData::Camera(_) => Role::Camera,
        }
    }
}

/// Ordered channel names for a basic subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicStaticData {
    /// Channel names, in the order frame values are reported.
    pub property_names: Vec<String>,
}

/// Which lens parameters a camera subject reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CameraStaticData {
    pub is_focal_length_supported: bool,
    pub is_focus_distance_supported: bool,
    pub is_aperture_supported: bool,
}

/// One instant of data for a subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameData {
    /// Raw channel values.
    Basic(BasicFrameData),
    /// Camera transform and lens values.
    Camera(CameraFrameData),
}

impl FrameData {
    /// The role this data belongs to.
    pub fn role(&self) -> Role {
        match self {
            FrameData::Basic(_) => Role::Basic,
            FrameData::Camera(_) => Role::Camera,
        }
    }
}

/// Channel values for a basic subject, positionally matching
/// [`BasicStaticData::property_names`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicFrameData {
    pub property_values: Vec<f64>,
}

/// A rigid transform with scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub rotation: DQuat,
    pub translation: DVec3,
    pub scale: DVec3,
}

impl Transform {
    /// A transform with unit scale.
    pub fn from_rotation_translation(rotation: DQuat, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
            scale: DVec3::ONE,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_rotation_translation(DQuat::IDENTITY, DVec3::ZERO)
    }
}

/// Camera frame: where the camera is and how its lens is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraFrameData {
    pub transform: Transform,
    pub focal_length: f64,
    pub focus_distance: f64,
    pub aperture: f64,
}
