//! Editable profile fields.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;

/// Partial profile update. `None` fields are left unchanged; fields not
/// listed here are ignored during deserialization.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfilePatch {
    #[validate(length(min = 1, max = 64))]
    pub known_as: Option<String>,
    #[validate(length(max = 2000))]
    pub introduction: Option<String>,
    #[validate(length(max = 2000))]
    pub looking_for: Option<String>,
    #[validate(length(max = 2000))]
    pub interests: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
}

impl ProfilePatch {
    /// Run the field validators, mapping failures to [`CoreError::Validation`].
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.known_as.is_none()
            && self.introduction.is_none()
            && self.looking_for.is_none()
            && self.interests.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}
