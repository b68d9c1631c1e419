use crate::domain::todo::driving_ports::{PatchTodoError, TodoError, TodoPort};
use crate::external_connections::ExternalConnectivity;
use crate::routing_utils::{
    BadRequestResponse, BasicErrorResponse, Envelope, GenericErrorResponse, Json,
    NotFoundResponse, ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto, persistence};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::ErrorResponse;
use axum::routing::{delete, get, patch, post, put};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;
use validator::Validate;

/// Defines the OpenAPI documentation for the todo API
#[derive(OpenApi)]
#[openapi(paths(
    list_todos,
    create_todo,
    get_todo,
    replace_todo,
    patch_todo,
    delete_todo
))]
pub struct TodosApi;

/// Constant used to group todo endpoints in OpenAPI documentation
pub const TODO_API_GROUP: &str = "Todos";

/// Adds routes for the todo CRUD operations to the application router
pub fn todo_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();

                list_todos(&mut ext_cxn, &domain::todo::TodoService {}).await
            }),
        )
        .route(
            "/",
            post(
                |State(app_state): AppState, Json(new_todo): Json<dto::NewTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();

                    create_todo(new_todo, &mut ext_cxn, &domain::todo::TodoService {}).await
                },
            ),
        )
        .route(
            "/:todo_id",
            get(
                |State(app_state): AppState, Path(todo_id): Path<String>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();

                    get_todo(&todo_id, &mut ext_cxn, &domain::todo::TodoService {}).await
                },
            ),
        )
        .route(
            "/:todo_id",
            put(
                |State(app_state): AppState,
                 Path(todo_id): Path<String>,
                 Json(todo_content): Json<dto::UpdateTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();

                    replace_todo(
                        &todo_id,
                        todo_content,
                        &mut ext_cxn,
                        &domain::todo::TodoService {},
                    )
                    .await
                },
            ),
        )
        .route(
            "/:todo_id",
            patch(
                |State(app_state): AppState,
                 Path(todo_id): Path<String>,
                 Json(todo_patch): Json<dto::PatchTodo>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();

                    patch_todo(
                        &todo_id,
                        todo_patch,
                        &mut ext_cxn,
                        &domain::todo::TodoService {},
                    )
                    .await
                },
            ),
        )
        .route(
            "/:todo_id",
            delete(
                |State(app_state): AppState, Path(todo_id): Path<String>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();

                    delete_todo(&todo_id, &mut ext_cxn, &domain::todo::TodoService {}).await
                },
            ),
        )
}

/// Parses a raw path segment into a todo ID. Runs before any storage access so
/// a bad identifier never costs a pooled connection.
fn parse_todo_id(raw_id: &str) -> Result<i32, BadRequestResponse> {
    raw_id
        .parse()
        .map_err(|_| BadRequestResponse::new("Invalid todo ID"))
}

/// Retrieves every stored todo, newest first
#[utoipa::path(
    get,
    path = "/todos",
    tag = TODO_API_GROUP,
    responses(
        (status = 200, description = "All stored todos ordered newest first, with a total count"),
        (status = 500, response = BasicErrorResponse),
    ),
)]
async fn list_todos(
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<Envelope<Vec<dto::Todo>>>, ErrorResponse> {
    info!("Requested todo list");
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

    let list_result = todo_service.list_todos(&mut *ext_cxn, &todo_reader).await;
    match list_result {
        Ok(todos) => {
            let total = todos.len();
            let returned_todos: Vec<dto::Todo> = todos.into_iter().map(dto::Todo::from).collect();

            Ok(Json(Envelope::of_collection(returned_todos, total)))
        }
        Err(port_err) => Err(GenericErrorResponse(port_err).into()),
    }
}

/// Creates a todo
#[utoipa::path(
    post,
    path = "/todos",
    tag = TODO_API_GROUP,
    request_body = dto::NewTodo,
    responses(
        (status = 201, description = "Todo successfully created"),
        (status = 400, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
async fn create_todo(
    new_todo: dto::NewTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<(StatusCode, Json<Envelope<dto::Todo>>), ErrorResponse> {
    info!("Attempt to create todo: {new_todo}");
    new_todo.validate().map_err(ValidationErrorResponse::from)?;

    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;
    let todo_to_create = domain::todo::NewTodo::from(new_todo);

    let create_result = todo_service
        .create_todo(&todo_to_create, &mut *ext_cxn, &todo_writer)
        .await;
    match create_result {
        Ok(created_todo) => Ok((
            StatusCode::CREATED,
            Json(Envelope::of_message(
                dto::Todo::from(created_todo),
                "Todo created successfully",
            )),
        )),
        Err(port_err) => Err(GenericErrorResponse(port_err).into()),
    }
}

/// Retrieves a single todo by its ID
#[utoipa::path(
    get,
    path = "/todos/{id}",
    tag = TODO_API_GROUP,
    params(
        ("id" = String, Path, description = "The ID of the todo to fetch"),
    ),
    responses(
        (status = 200, description = "The requested todo"),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
async fn get_todo(
    raw_todo_id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<Envelope<dto::Todo>>, ErrorResponse> {
    info!("Requested todo {raw_todo_id}");
    let todo_id = parse_todo_id(raw_todo_id)?;
    let todo_reader = persistence::db_todo_driven_ports::DbTodoReader;

    let fetch_result = todo_service
        .todo_by_id(todo_id, &mut *ext_cxn, &todo_reader)
        .await;
    match fetch_result {
        Ok(todo) => Ok(Json(Envelope::of(dto::Todo::from(todo)))),
        Err(TodoError::NotFound) => Err(NotFoundResponse.into()),
        Err(TodoError::PortError(cause)) => Err(GenericErrorResponse(cause).into()),
    }
}

/// Overwrites a todo's name and completion state
#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = TODO_API_GROUP,
    params(
        ("id" = String, Path, description = "The ID of the todo to replace"),
    ),
    request_body = dto::UpdateTodo,
    responses(
        (status = 200, description = "The todo after replacement"),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
async fn replace_todo(
    raw_todo_id: &str,
    todo_content: dto::UpdateTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<Envelope<dto::Todo>>, ErrorResponse> {
    info!("Replacing todo {raw_todo_id}");
    let todo_id = parse_todo_id(raw_todo_id)?;
    todo_content
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;
    let replacement = domain::todo::UpdateTodo::from(todo_content);

    let replace_result = todo_service
        .replace_todo(todo_id, &replacement, &mut *ext_cxn, &todo_writer)
        .await;
    match replace_result {
        Ok(replaced_todo) => Ok(Json(Envelope::of_message(
            dto::Todo::from(replaced_todo),
            "Todo updated successfully",
        ))),
        Err(TodoError::NotFound) => Err(NotFoundResponse.into()),
        Err(TodoError::PortError(cause)) => Err(GenericErrorResponse(cause).into()),
    }
}

/// Updates only the fields of a todo present in the request body. This is also
/// the route callers use to toggle completion: read the current state, then
/// submit its negation. That read-then-write is not atomic, so two concurrent
/// toggles of the same todo may overwrite each other.
#[utoipa::path(
    patch,
    path = "/todos/{id}",
    tag = TODO_API_GROUP,
    params(
        ("id" = String, Path, description = "The ID of the todo to update"),
    ),
    request_body = dto::PatchTodo,
    responses(
        (status = 200, description = "The todo after the partial update"),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
async fn patch_todo(
    raw_todo_id: &str,
    todo_patch: dto::PatchTodo,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<Envelope<dto::Todo>>, ErrorResponse> {
    info!("Partially updating todo {raw_todo_id}");
    let todo_id = parse_todo_id(raw_todo_id)?;
    todo_patch
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;
    let patch_to_apply = domain::todo::PatchTodo::from(todo_patch);

    let patch_result = todo_service
        .patch_todo(todo_id, &patch_to_apply, &mut *ext_cxn, &todo_writer)
        .await;
    match patch_result {
        Ok(patched_todo) => Ok(Json(Envelope::of_message(
            dto::Todo::from(patched_todo),
            "Todo updated successfully",
        ))),
        Err(PatchTodoError::NothingToPatch) => {
            Err(BadRequestResponse::new("No fields to update").into())
        }
        Err(PatchTodoError::NotFound) => Err(NotFoundResponse.into()),
        Err(PatchTodoError::PortError(cause)) => Err(GenericErrorResponse(cause).into()),
    }
}

/// Permanently removes a todo, returning its last known values
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = TODO_API_GROUP,
    params(
        ("id" = String, Path, description = "The ID of the todo to delete"),
    ),
    responses(
        (status = 200, description = "The deleted todo's last known values"),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
async fn delete_todo(
    raw_todo_id: &str,
    ext_cxn: &mut impl ExternalConnectivity,
    todo_service: &impl TodoPort,
) -> Result<Json<Envelope<dto::Todo>>, ErrorResponse> {
    info!("Deleting todo {raw_todo_id}");
    let todo_id = parse_todo_id(raw_todo_id)?;
    let todo_writer = persistence::db_todo_driven_ports::DbTodoWriter;

    let delete_result = todo_service
        .delete_todo(todo_id, &mut *ext_cxn, &todo_writer)
        .await;
    match delete_result {
        Ok(deleted_todo) => Ok(Json(Envelope::of_message(
            dto::Todo::from(deleted_todo),
            "Todo deleted successfully",
        ))),
        Err(TodoError::NotFound) => Err(NotFoundResponse.into()),
        Err(TodoError::PortError(cause)) => Err(GenericErrorResponse(cause).into()),
    }
}
