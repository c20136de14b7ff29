//! Error handling for the HTTP layer
//!
//! Services return `anyhow::Result` carrying [`WiimError`] values; `AppError`
//! recovers the kind and renders it with the response envelope.

use std::fmt::{Display, Formatter};

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError, ResponseError},
    http::StatusCode,
};
use wiim_common::{
    WiimError,
    error::{
        DATA_ACCESS_ERROR, MEDIA_TYPE_ERROR, PARAMETER_VALIDATE_ERROR, REFERENCE_NOT_FOUND,
        RESOURCE_NOT_FOUND, SERVER_ERROR,
    },
};

use crate::model::response::Result;

pub type HandlerResult = std::result::Result<HttpResponse, AppError>;

// Local wrapper for application errors to implement actix-web error handling
// (Cannot impl foreign trait for foreign type due to orphan rules)
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<WiimError> for AppError {
    fn from(value: WiimError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.downcast_ref::<WiimError>() {
            Some(WiimError::Validation(_)) | Some(WiimError::ReferentialIntegrity(_)) => {
                StatusCode::BAD_REQUEST
            }
            Some(WiimError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Some(WiimError::DatabaseError(_)) | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code().as_u16();
        let message = self.inner.to_string();

        match self.downcast_ref::<WiimError>() {
            Some(WiimError::Validation(fields)) => Result::<Vec<String>>::http_response(
                status,
                PARAMETER_VALIDATE_ERROR.code,
                message,
                fields.clone(),
            ),
            Some(WiimError::ReferentialIntegrity(_)) => {
                Result::<()>::http_response(status, REFERENCE_NOT_FOUND.code, message, ())
            }
            Some(WiimError::NotFound { .. }) => {
                Result::<()>::http_response(status, RESOURCE_NOT_FOUND.code, message, ())
            }
            Some(WiimError::DatabaseError(_)) => {
                tracing::error!(error = %message, "Data access failed");
                Result::<()>::http_response(status, DATA_ACCESS_ERROR.code, message, ())
            }
            None => {
                tracing::error!(error = %message, "Request failed");
                Result::<()>::http_response(status, SERVER_ERROR.code, message, ())
            }
        }
    }
}

/// Render malformed or mistyped JSON bodies with the response envelope
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = match &err {
        JsonPayloadError::ContentType => Result::<()>::http_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE.as_u16(),
            MEDIA_TYPE_ERROR.code,
            err.to_string(),
            (),
        ),
        _ => bad_request(err.to_string()),
    };
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = bad_request(err.to_string());
    InternalError::from_response(err, response).into()
}

fn bad_request(message: String) -> HttpResponse {
    Result::<()>::http_response(
        StatusCode::BAD_REQUEST.as_u16(),
        PARAMETER_VALIDATE_ERROR.code,
        message,
        (),
    )
}
