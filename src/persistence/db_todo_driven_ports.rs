use crate::domain;
use crate::domain::todo::{NewTodo, PatchTodo, Todo, UpdateTodo};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::{Context, Error};
use chrono::NaiveDateTime;
use sqlx::query_as;

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i32,
    name: String,
    is_completed: bool,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<TodoRow> for Todo {
    fn from(value: TodoRow) -> Self {
        Todo {
            id: value.id,
            name: value.name,
            is_completed: value.is_completed,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

pub struct DbTodoReader;

impl domain::todo::driven_ports::TodoReader for DbTodoReader {
    async fn all(&self, ext_cxn: &mut impl ExternalConnectivity) -> Result<Vec<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await.map_err(super::anyhowify)?;

        let todos: Vec<Todo> =
            query_as::<_, TodoRow>("SELECT * FROM todos ORDER BY created_at DESC")
                .fetch_all(cxn.borrow_connection())
                .await
                .context("trying to fetch all todos")?
                .into_iter()
                .map(Todo::from)
                .collect();

        Ok(todos)
    }

    async fn by_id(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await.map_err(super::anyhowify)?;

        let todo = query_as::<_, TodoRow>("SELECT * FROM todos WHERE id = $1")
            .bind(todo_id)
            .fetch_optional(cxn.borrow_connection())
            .await
            .context("trying to fetch a todo by ID")?
            .map(Todo::from);

        Ok(todo)
    }
}

pub struct DbTodoWriter;

impl domain::todo::driven_ports::TodoWriter for DbTodoWriter {
    async fn create(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Todo, Error> {
        let mut cxn = ext_cxn.database_cxn().await.map_err(super::anyhowify)?;

        let created_todo = query_as::<_, TodoRow>(
            "INSERT INTO todos (name, is_completed) VALUES ($1, $2) RETURNING *",
        )
        .bind(&new_todo.name)
        .bind(new_todo.is_completed)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(Todo::from(created_todo))
    }

    async fn replace(
        &self,
        todo_id: i32,
        content: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await.map_err(super::anyhowify)?;

        let replaced_todo = query_as::<_, TodoRow>(
            "UPDATE todos SET name = $1, is_completed = $2, updated_at = CURRENT_TIMESTAMP \
             WHERE id = $3 RETURNING *",
        )
        .bind(&content.name)
        .bind(content.is_completed)
        .bind(todo_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to replace a todo in the database")?;

        Ok(replaced_todo.map(Todo::from))
    }

    // Each updatable column falls back to its current value when the patch leaves
    // that field unset, so the statement is fixed rather than assembled from
    // whichever fields happen to be present.
    async fn apply_patch(
        &self,
        todo_id: i32,
        patch: &PatchTodo,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await.map_err(super::anyhowify)?;

        let patched_todo = query_as::<_, TodoRow>(
            "UPDATE todos \
             SET name = COALESCE($1, name), \
                 is_completed = COALESCE($2, is_completed), \
                 updated_at = CURRENT_TIMESTAMP \
             WHERE id = $3 RETURNING *",
        )
        .bind(patch.name.as_deref())
        .bind(patch.is_completed)
        .bind(todo_id)
        .fetch_optional(cxn.borrow_connection())
        .await
        .context("trying to partially update a todo in the database")?;

        Ok(patched_todo.map(Todo::from))
    }

    async fn delete(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<Todo>, Error> {
        let mut cxn = ext_cxn.database_cxn().await.map_err(super::anyhowify)?;

        let deleted_todo = query_as::<_, TodoRow>("DELETE FROM todos WHERE id = $1 RETURNING *")
            .bind(todo_id)
            .fetch_optional(cxn.borrow_connection())
            .await
            .context("trying to remove a todo from the database")?;

        Ok(deleted_todo.map(Todo::from))
    }
}
