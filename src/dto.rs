use crate::domain;
use chrono::NaiveDateTime;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use validator::{Validate, ValidationError};

/// Collects OpenAPI schemas for the DTOs in this module
#[derive(OpenApi)]
#[openapi(components(
    schemas(Todo, NewTodo, UpdateTodo, PatchTodo),
    responses(crate::routing_utils::BasicErrorResponse)
))]
pub struct OpenApiSchemas;

/// Verifies a value still has content once surrounding whitespace is removed
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut blank_error = ValidationError::new("not_blank");
        blank_error.message = Some("must not be blank".into());
        return Err(blank_error);
    }

    Ok(())
}

/// DTO for a returned todo on the API
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Debug, Deserialize))]
pub struct Todo {
    #[schema(example = 10)]
    pub id: i32,
    #[schema(example = "Buy groceries")]
    pub name: String,
    pub is_completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<domain::todo::Todo> for Todo {
    fn from(value: domain::todo::Todo) -> Self {
        Todo {
            id: value.id,
            name: value.name,
            is_completed: value.is_completed,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// DTO for creating a new todo via the API
#[derive(Deserialize, Display, Validate, ToSchema)]
#[display("{name} (completed: {is_completed})")]
pub struct NewTodo {
    #[validate(custom = "not_blank")]
    #[schema(example = "Buy groceries")]
    pub name: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
}

impl From<NewTodo> for domain::todo::NewTodo {
    fn from(value: NewTodo) -> Self {
        domain::todo::NewTodo {
            name: value.name.trim().to_owned(),
            is_completed: value.is_completed,
        }
    }
}

/// DTO for overwriting a todo's full content via the API
#[derive(Deserialize, Validate, ToSchema)]
pub struct UpdateTodo {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
}

impl From<UpdateTodo> for domain::todo::UpdateTodo {
    fn from(value: UpdateTodo) -> Self {
        domain::todo::UpdateTodo {
            name: value.name.trim().to_owned(),
            is_completed: value.is_completed,
        }
    }
}

/// DTO for partially updating a todo via the API. Fields absent from the
/// request body are left untouched on the stored record.
#[derive(Deserialize, Validate, ToSchema)]
pub struct PatchTodo {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    #[serde(rename = "isCompleted")]
    pub is_completed: Option<bool>,
}

impl From<PatchTodo> for domain::todo::PatchTodo {
    fn from(value: PatchTodo) -> Self {
        domain::todo::PatchTodo {
            name: value.name.map(|name| name.trim().to_owned()),
            is_completed: value.is_completed,
        }
    }
}
