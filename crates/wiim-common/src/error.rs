//! Error types and error codes for WIIM
//!
//! This module defines:
//! - `WiimError`: Distinguishable failure kinds of the asset store
//! - `ErrorCode`: Structured error codes for API responses

use serde::{Deserialize, Serialize};

/// Application-specific error types
///
/// Services return `anyhow::Result` and carry these values inside; callers
/// recover the kind with `downcast_ref::<WiimError>()`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WiimError {
    /// Missing or invalid fields on a create request, or an unknown filter column
    #[error("invalid fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// A foreign key references a row that does not exist
    #[error("referential integrity violated: {0}")]
    ReferentialIntegrity(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("database error: {0}")]
    DatabaseError(String),
}

impl WiimError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        WiimError::NotFound { entity, id }
    }

    pub fn validation<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        fields.sort();
        fields.dedup();
        WiimError::Validation(fields)
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const MEDIA_TYPE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20003,
    message: "MediaType Error",
};

pub const RESOURCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20004,
    message: "resource not found",
};

pub const REFERENCE_NOT_FOUND: ErrorCode<'static> = ErrorCode {
    code: 20011,
    message: "referenced resource not exist",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wiim_error_display() {
        let err = WiimError::validation(["name", "alias"]);
        assert_eq!(format!("{}", err), "invalid fields: alias, name");

        let err = WiimError::not_found("Tag", 7);
        assert_eq!(format!("{}", err), "Tag 7 not found");

        let err = WiimError::ReferentialIntegrity("tag 3 does not exist".to_string());
        assert_eq!(
            format!("{}", err),
            "referential integrity violated: tag 3 does not exist"
        );
    }

    #[test]
    fn test_validation_fields_are_sorted_and_unique() {
        let err = WiimError::validation(vec!["value", "time_opc", "value"]);
        assert_eq!(
            err,
            WiimError::Validation(vec!["time_opc".to_string(), "value".to_string()])
        );
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = WiimError::not_found("Site", 1).into();
        assert!(matches!(
            err.downcast_ref::<WiimError>(),
            Some(WiimError::NotFound { entity: "Site", id: 1 })
        ));
    }

    #[test]
    fn test_error_code_constants() {
        assert_eq!(SUCCESS.code, 0);
        assert_eq!(SUCCESS.message, "success");
        assert_eq!(PARAMETER_VALIDATE_ERROR.code, 20002);
        assert_eq!(RESOURCE_NOT_FOUND.code, 20004);
    }
}
