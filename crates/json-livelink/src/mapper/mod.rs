//! Payload mappers: turn one subject's JSON value into role data.
//!
//! A source is built with exactly one mapper. The mapper decides the role,
//! the static data announced on first sight, and how a `UserData` array
//! becomes a frame.

mod basic;
mod camera;

pub use basic::BasicMapper;
pub use camera::{
    AngleUnit, CameraMapper, EulerConvention, Handedness, LensChannels, RotationOrder,
};

use serde_json::Value;

use crate::error::{MappingError, kind_of};
use crate::role::{FrameData, Role, StaticData};

/// Name of the field carrying the raw numeric channels.
pub const USER_DATA_FIELD: &str = "UserData";

/// Number of entries `UserData` must hold.
pub const USER_DATA_LEN: usize = 10;

/// Maps a subject's JSON value to frame data for a fixed role.
///
/// Implementations are pure: the same value always maps to the same frame.
pub trait PayloadMapper: Send {
    /// The role of every subject this mapper produces.
    fn role(&self) -> Role;

    /// Static data registered once per subject.
    fn static_data(&self) -> StaticData;

    /// Build one frame from a subject's value.
    fn frame_data(&self, value: &Value) -> Result<FrameData, MappingError>;
}

impl<M: PayloadMapper + ?Sized> PayloadMapper for Box<M> {
    fn role(&self) -> Role {
        (**self).role()
    }

    fn static_data(&self) -> StaticData {
        (**self).static_data()
    }

    fn frame_data(&self, value: &Value) -> Result<FrameData, MappingError> {
        (**self).frame_data(value)
    }
}

/// Extract the `UserData` array of a subject value.
///
/// The value must be an object whose `UserData` field is an array of exactly
/// [`USER_DATA_LEN`] numbers. Extra fields next to `UserData` are ignored.
pub fn user_data(value: &Value) -> Result<[f64; USER_DATA_LEN], MappingError> {
    let object = value.as_object().ok_or(MappingError::NotAnObject {
        found: kind_of(value),
    })?;

    let field = object
        .get(USER_DATA_FIELD)
        .ok_or(MappingError::MissingUserData)?;
    let entries = field.as_array().ok_or(MappingError::UserDataNotArray {
        found: kind_of(field),
    })?;

    if entries.len() != USER_DATA_LEN {
        return Err(MappingError::WrongArity {
            expected: USER_DATA_LEN,
            actual: entries.len(),
        });
    }

    let mut values = [0.0; USER_DATA_LEN];
    for (index, (slot, entry)) in values.iter_mut().zip(entries).enumerate() {
        *slot = entry.as_f64().ok_or(MappingError::NonNumeric { index })?;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_data_reads_ten_numbers() {
        let value = json!({ "UserData": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9.5] });
        let values = user_data(&value).unwrap();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[9], 9.5);
    }

    #[test]
    fn test_user_data_ignores_extra_fields() {
        let value = json!({ "Name": "cam", "UserData": vec![0; 10] });
        assert!(user_data(&value).is_ok());
    }

    #[test]
    fn test_user_data_rejects_wrong_shapes() {
        assert_eq!(
            user_data(&json!([1, 2, 3])),
            Err(MappingError::NotAnObject { found: "array" })
        );
        assert_eq!(
            user_data(&json!({ "Other": 1 })),
            Err(MappingError::MissingUserData)
        );
        assert_eq!(
            user_data(&json!({ "UserData": "1,2,3" })),
            Err(MappingError::UserDataNotArray { found: "string" })
        );
        assert_eq!(
            user_data(&json!({ "UserData": vec![0; 9] })),
            Err(MappingError::WrongArity {
                expected: 10,
                actual: 9
            })
        );
        assert_eq!(
            user_data(&json!({ "UserData": [0, 1, 2, "x", 4, 5, 6, 7, 8, 9] })),
            Err(MappingError::NonNumeric { index: 3 })
        );
    }
}
