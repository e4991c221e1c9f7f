//! Generic mapper: ten numeric channels passed through untouched.

use serde_json::Value;

use super::{PayloadMapper, USER_DATA_LEN, user_data};
use crate::error::MappingError;
use crate::role::{BasicFrameData, BasicStaticData, FrameData, Role, StaticData};

/// Maps `UserData` onto channels `userdata0` through `userdata9`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicMapper;

impl BasicMapper {
    /// Create a new basic mapper.
    pub fn new() -> Self {
        Self
    }

    /// The fixed channel names, in order.
    pub fn property_names() -> Vec<String> {
        (0..USER_DATA_LEN).map(|i| format!("userdata{i}")).collect()
    }
}

impl PayloadMapper for BasicMapper {
    fn role(&self) -> Role {
        Role::Basic
    }

    fn static_data(&self) -> StaticData {
        StaticData::Basic(BasicStaticData {
            property_names: Self::property_names(),
        })
    }

    fn frame_data(&self, value: &Value) -> Result<FrameData, MappingError> {
        let values = user_data(value)?;
        Ok(FrameData::Basic(BasicFrameData {
            property_values: values.to_vec(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_static_data_names() {
        let StaticData::Basic(data) = BasicMapper.static_data() else {
            panic!("expected basic static data");
        };
        assert_eq!(data.property_names.len(), 10);
        assert_eq!(data.property_names[0], "userdata0");
        assert_eq!(data.property_names[9], "userdata9");
    }

    #[test]
    fn test_values_pass_through() {
        let value = json!({ "UserData": [-1.5, 0, 1e6, 3, 4, 5, 6, 7, 8, 0.125] });
        let FrameData::Basic(frame) = BasicMapper.frame_data(&value).unwrap() else {
            panic!("expected basic frame");
        };
        assert_eq!(
            frame.property_values,
            vec![-1.5, 0.0, 1e6, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 0.125]
        );
    }

    #[test]
    fn test_role() {
        assert_eq!(BasicMapper.role(), Role::Basic);
        assert_eq!(BasicMapper.static_data().role(), Role::Basic);
    }
}
