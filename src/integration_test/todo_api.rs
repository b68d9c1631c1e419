use super::test_util::prepare_test_database;
use crate::domain::todo::driving_ports::{TodoError, TodoPort};
use crate::domain::todo::{NewTodo, PatchTodo, TodoService, UpdateTodo};
use crate::persistence;
use crate::persistence::db_todo_driven_ports::{DbTodoReader, DbTodoWriter};
use speculoos::prelude::*;

// One sequential scenario rather than several test functions, as parallel tests
// would race each other on the shared TEST_DB_URL database.
#[tokio::test]
async fn schema_bootstrap_and_crud_lifecycle() {
    let mut ext_cxn = prepare_test_database().await;
    let todo_service = TodoService {};
    let todo_reader = DbTodoReader;
    let todo_writer = DbTodoWriter;

    // Re-running the bootstrap against the emptied table re-seeds it exactly once
    persistence::schema::initialize(&mut ext_cxn)
        .await
        .expect("First schema re-initialization failed");
    persistence::schema::initialize(&mut ext_cxn)
        .await
        .expect("Second schema re-initialization failed");

    let seeded_todos = todo_service
        .list_todos(&mut ext_cxn, &todo_reader)
        .await
        .expect("Could not list seeded todos");
    assert_that!(seeded_todos).has_length(10);

    // Create
    let created_todo = todo_service
        .create_todo(
            &NewTodo {
                name: "Buy milk".to_owned(),
                is_completed: false,
            },
            &mut ext_cxn,
            &todo_writer,
        )
        .await
        .expect("Todo creation failed");
    assert!(!created_todo.is_completed);
    assert_eq!(created_todo.created_at, created_todo.updated_at);

    let listed_todos = todo_service
        .list_todos(&mut ext_cxn, &todo_reader)
        .await
        .expect("Could not list todos after create");
    assert_that!(listed_todos).has_length(11);
    // Newest first
    assert_eq!(created_todo.id, listed_todos[0].id);

    // Toggle completion via partial update
    let patched_todo = todo_service
        .patch_todo(
            created_todo.id,
            &PatchTodo {
                name: None,
                is_completed: Some(true),
            },
            &mut ext_cxn,
            &todo_writer,
        )
        .await
        .expect("Todo patch failed");
    assert_eq!("Buy milk", patched_todo.name);
    assert!(patched_todo.is_completed);
    assert!(patched_todo.updated_at > patched_todo.created_at);

    // Full replacement
    let replaced_todo = todo_service
        .replace_todo(
            created_todo.id,
            &UpdateTodo {
                name: "Buy milk and bread".to_owned(),
                is_completed: false,
            },
            &mut ext_cxn,
            &todo_writer,
        )
        .await
        .expect("Todo replacement failed");
    assert_eq!("Buy milk and bread", replaced_todo.name);
    assert!(!replaced_todo.is_completed);

    // Delete returns the record's last known values
    let deleted_todo = todo_service
        .delete_todo(created_todo.id, &mut ext_cxn, &todo_writer)
        .await
        .expect("Todo deletion failed");
    assert_eq!("Buy milk and bread", deleted_todo.name);

    // The record is gone afterwards
    let fetch_after_delete = todo_service
        .todo_by_id(created_todo.id, &mut ext_cxn, &todo_reader)
        .await;
    let Err(TodoError::NotFound) = fetch_after_delete else {
        panic!("Expected deleted todo to be gone, instead got: {fetch_after_delete:#?}");
    };
}
