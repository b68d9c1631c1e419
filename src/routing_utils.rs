use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_macros::FromRequest;

use serde::Serialize;
use tracing::error;
use utoipa::ToResponse;

use validator::ValidationErrors;

/// The uniform response envelope shared by every endpoint. Fields left as [None]
/// are omitted from the serialized body, so success and failure payloads are both
/// projections of the same shape.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, serde::Deserialize))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T: Serialize> Envelope<T> {
    /// Wraps a payload in a bare success envelope
    pub fn of(data: T) -> Envelope<T> {
        Envelope {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            total: None,
        }
    }

    /// Wraps a payload in a success envelope carrying a human-readable message
    pub fn of_message(data: T, message: &str) -> Envelope<T> {
        Envelope {
            message: Some(message.to_owned()),
            ..Envelope::of(data)
        }
    }

    /// Wraps a collection in a success envelope reporting the number of items
    pub fn of_collection(data: T, total: usize) -> Envelope<T> {
        Envelope {
            total: Some(total),
            ..Envelope::of(data)
        }
    }
}

/// Envelope variant returned on any API failure
#[derive(Serialize, Debug, ToResponse)]
#[cfg_attr(test, derive(serde::Deserialize))]
#[response(examples(
    ("Invalid Input" = (
        summary = "Submitted data was invalid (400)",
        value = json!({
            "success": false,
            "error": "name: must not be blank"
        })
    )),

    ("Not Found" = (
        summary = "Todo could not be found (404)",
        value = json!({
            "success": false,
            "error": "Todo not found"
        })
    )),

    ("Internal Failure" = (
        summary = "Something unexpected went wrong inside the server (500)",
        value = json!({
            "success": false,
            "error": "Internal server error"
        })
    ))
))]
pub struct BasicErrorResponse {
    pub success: bool,
    pub error: String,
}

impl BasicErrorResponse {
    fn new(error: &str) -> BasicErrorResponse {
        BasicErrorResponse {
            success: false,
            error: error.to_owned(),
        }
    }
}

/// Response type for requests rejected before reaching storage, such as an
/// unparseable todo ID or a patch that touches no fields (400)
pub struct BadRequestResponse(String);

impl BadRequestResponse {
    pub fn new(reason: &str) -> BadRequestResponse {
        BadRequestResponse(reason.to_owned())
    }
}

impl IntoResponse for BadRequestResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse::new(&self.0)),
        )
            .into_response()
    }
}

/// Response type that wraps validation errors and turns them into [BasicErrorResponse]s
pub struct ValidationErrorResponse(ValidationErrors);

impl From<ValidationErrors> for ValidationErrorResponse {
    fn from(value: ValidationErrors) -> Self {
        Self(value)
    }
}

impl IntoResponse for ValidationErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse::new(&describe_validation_errors(&self.0))),
        )
            .into_response()
    }
}

/// Flattens validator output into the envelope's single error string, e.g.
/// "name: must not be blank"
fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut failed_fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let reasons: Vec<String> = field_errors
                .iter()
                .map(|field_error| match field_error.message {
                    Some(ref message) => message.to_string(),
                    None => field_error.code.to_string(),
                })
                .collect();

            format!("{}: {}", field, reasons.join(", "))
        })
        .collect();
    failed_fields.sort();

    failed_fields.join("; ")
}

/// Response type for lookups targeting a todo that does not exist (404)
pub struct NotFoundResponse;

impl IntoResponse for NotFoundResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            axum::Json(BasicErrorResponse::new("Todo not found")),
        )
            .into_response()
    }
}

/// Response type for storage and other internal failures. The full error chain
/// is logged here while the caller only sees a generic error (500)
pub struct GenericErrorResponse(pub anyhow::Error);

impl IntoResponse for GenericErrorResponse {
    fn into_response(self) -> Response {
        error!("Request failed on an internal error: {:#}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(BasicErrorResponse::new("Internal server error")),
        )
            .into_response()
    }
}

/// Wrapper for [axum::Json] which customizes the error response to use our
/// data structure for API errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonErrorResponse))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Response type representing JSON parse errors
pub struct JsonErrorResponse {
    parse_problem: String,
}

impl From<JsonRejection> for JsonErrorResponse {
    fn from(value: JsonRejection) -> Self {
        JsonErrorResponse {
            parse_problem: value.body_text(),
        }
    }
}

impl IntoResponse for JsonErrorResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            axum::Json(BasicErrorResponse::new(&format!(
                "The request body contained malformed or unreadable JSON: {}",
                self.parse_problem
            ))),
        )
            .into_response()
    }
}
