use crate::external_connections::ExternalConnectivity;
use anyhow::Context;
use chrono::NaiveDateTime;

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(test, derive(Clone))]
pub struct Todo {
    pub id: i32,
    pub name: String,
    pub is_completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[cfg_attr(test, derive(Clone))]
pub struct NewTodo {
    pub name: String,
    pub is_completed: bool,
}

#[cfg_attr(test, derive(Clone))]
pub struct UpdateTodo {
    pub name: String,
    pub is_completed: bool,
}

/// The set of fields a partial update may touch. Fields left as [None] are not modified.
#[cfg_attr(test, derive(Clone))]
pub struct PatchTodo {
    pub name: Option<String>,
    pub is_completed: Option<bool>,
}

impl PatchTodo {
    /// True when the patch would not touch any field
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_completed.is_none()
    }
}

pub mod driven_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;

    pub trait TodoReader {
        /// Fetches every stored todo, newest first
        async fn all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<Todo>, anyhow::Error>;

        async fn by_id(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;
    }

    /// Write operations resolve to [None] when no todo matches the given ID.
    pub trait TodoWriter {
        async fn create(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Todo, anyhow::Error>;

        async fn replace(
            &self,
            todo_id: i32,
            content: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;

        async fn apply_patch(
            &self,
            todo_id: i32,
            patch: &PatchTodo,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;

        async fn delete(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<Todo>, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;
    use crate::external_connections::ExternalConnectivity;
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum TodoError {
        #[error("The specified todo did not exist.")]
        NotFound,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }

    #[derive(Debug, Error)]
    pub enum PatchTodoError {
        #[error("No fields were supplied to update.")]
        NothingToPatch,
        #[error("The specified todo did not exist.")]
        NotFound,
        #[error(transparent)]
        PortError(#[from] anyhow::Error),
    }


    pub trait TodoPort {
        async fn list_todos(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Vec<Todo>, anyhow::Error>;

        async fn todo_by_id(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::TodoReader,
        ) -> Result<Todo, TodoError>;

        async fn create_todo(
            &self,
            new_todo: &NewTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, anyhow::Error>;

        async fn replace_todo(
            &self,
            todo_id: i32,
            content: &UpdateTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, TodoError>;

        async fn patch_todo(
            &self,
            todo_id: i32,
            patch: &PatchTodo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, PatchTodoError>;

        async fn delete_todo(
            &self,
            todo_id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::TodoWriter,
        ) -> Result<Todo, TodoError>;
    }
}

pub struct TodoService {}

impl driving_ports::TodoPort for TodoService {
    async fn list_todos(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl driven_ports::TodoReader,
    ) -> Result<Vec<Todo>, anyhow::Error> {
        let todos = todo_read
            .all(&mut *ext_cxn)
            .await
            .context("listing todos")?;

        Ok(todos)
    }

    async fn todo_by_id(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl driven_ports::TodoReader,
    ) -> Result<Todo, driving_ports::TodoError> {
        let maybe_todo = todo_read
            .by_id(todo_id, &mut *ext_cxn)
            .await
            .context("fetching a todo by ID")?;

        maybe_todo.ok_or(driving_ports::TodoError::NotFound)
    }

    async fn create_todo(
        &self,
        new_todo: &NewTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl driven_ports::TodoWriter,
    ) -> Result<Todo, anyhow::Error> {
        let created_todo = todo_write
            .create(new_todo, &mut *ext_cxn)
            .await
            .context("creating a todo")?;

        Ok(created_todo)
    }

    async fn replace_todo(
        &self,
        todo_id: i32,
        content: &UpdateTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl driven_ports::TodoWriter,
    ) -> Result<Todo, driving_ports::TodoError> {
        let replaced_todo = todo_write
            .replace(todo_id, content, &mut *ext_cxn)
            .await
            .context("replacing a todo")?;

        replaced_todo.ok_or(driving_ports::TodoError::NotFound)
    }

    async fn patch_todo(
        &self,
        todo_id: i32,
        patch: &PatchTodo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl driven_ports::TodoWriter,
    ) -> Result<Todo, driving_ports::PatchTodoError> {
        if patch.is_empty() {
            return Err(driving_ports::PatchTodoError::NothingToPatch);
        }

        let patched_todo = todo_write
            .apply_patch(todo_id, patch, &mut *ext_cxn)
            .await
            .context("partially updating a todo")?;

        patched_todo.ok_or(driving_ports::PatchTodoError::NotFound)
    }

    async fn delete_todo(
        &self,
        todo_id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl driven_ports::TodoWriter,
    ) -> Result<Todo, driving_ports::TodoError> {
        let deleted_todo = todo_write
            .delete(todo_id, &mut *ext_cxn)
            .await
            .context("deleting a todo")?;

        deleted_todo.ok_or(driving_ports::TodoError::NotFound)
    }
}
