use crate::errors::ServiceError;
use crate::ApiResponse;
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    enveloped(StatusCode::OK, data)
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    enveloped(StatusCode::CREATED, data)
}

fn enveloped<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::new(status, data))).into_response()
}

/// A request body whose fields are checked in declaration order.
pub trait RequiredFields: Validate {
    /// Name used as the `<Type>` part of validation messages.
    const TYPE_NAME: &'static str;
    /// Validated fields, in the order they are declared on the struct.
    const FIELDS: &'static [&'static str];
}

/// Validate request input
pub fn validate_input<T: RequiredFields>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|errors| ServiceError::ValidationError(describe_validation_errors::<T>(&errors)))
}

/// Renders one line per failing field, in declaration order:
/// `Key: 'Type.Field' Error:Field validation for 'Field' failed on the 'tag' tag`.
pub fn describe_validation_errors<T: RequiredFields>(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();

    T::FIELDS
        .iter()
        .filter_map(|field| {
            let tag = &field_errors.get(field)?.first()?.code;
            let name = pascal_case(field);
            Some(format!(
                "Key: '{}.{}' Error:Field validation for '{}' failed on the '{}' tag",
                T::TYPE_NAME,
                name,
                name,
                tag
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn pascal_case(field: &str) -> String {
    field
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Zero identifiers and quantities count as absent.
pub fn non_zero(value: i32) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Bodies that parse as JSON but do not fit the schema are validation
/// failures; anything that is not JSON at all is a bad request.
pub fn map_json_rejection(rejection: JsonRejection) -> ServiceError {
    match rejection {
        JsonRejection::JsonDataError(err) => ServiceError::ValidationError(err.body_text()),
        other => ServiceError::BadRequest(other.body_text()),
    }
}

pub fn map_path_rejection(rejection: PathRejection) -> ServiceError {
    ServiceError::BadRequest(rejection.body_text())
}

pub fn map_query_rejection(rejection: QueryRejection) -> ServiceError {
    ServiceError::BadRequest(rejection.body_text())
}
