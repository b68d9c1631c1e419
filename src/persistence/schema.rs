use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use sqlx::{query, query_as};
use tracing::info;

const CREATE_TODOS_TABLE: &str = "CREATE TABLE IF NOT EXISTS todos (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    is_completed BOOLEAN DEFAULT FALSE,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Sample todos inserted the first time the application starts against an empty
/// database. Purely informational content.
const SEED_TODOS: [(&str, bool); 10] = [
    ("Buy milk and bread at the supermarket", false),
    ("Finish the project report", true),
    ("Call the dentist to book an appointment", false),
    ("Work out at the gym", true),
    ("Read 30 pages of the current book", false),
    ("Organize the work desk", false),
    ("Go through pending emails", true),
    ("Prepare the slides for the meeting", false),
    ("Take out the trash before 8 AM", true),
    ("Study for the certification exam", false),
];

/// Idempotently brings the database up to the schema the application expects:
/// ensures the todos table exists and seeds it with sample rows when it is empty.
/// Safe to run on every startup; re-runs neither duplicate the seed data nor fail
/// on an existing table.
pub async fn initialize(ext_cxn: &mut impl ExternalConnectivity) -> Result<(), anyhow::Error> {
    let mut cxn = ext_cxn.database_cxn().await.map_err(super::anyhowify)?;

    query(CREATE_TODOS_TABLE)
        .execute(cxn.borrow_connection())
        .await
        .context("creating the todos table")?;
    info!("Todos table created or verified.");

    let existing_todos = query_as::<_, super::Count>("SELECT count(*) FROM todos")
        .fetch_one(cxn.borrow_connection())
        .await
        .context("counting existing todos")?
        .count();

    if existing_todos > 0 {
        info!("Todos table already contains {existing_todos} item(s), skipping seed data.");
        return Ok(());
    }

    for (name, is_completed) in SEED_TODOS {
        query("INSERT INTO todos (name, is_completed) VALUES ($1, $2)")
            .bind(name)
            .bind(is_completed)
            .execute(cxn.borrow_connection())
            .await
            .context("inserting seed todos")?;
    }
    info!("Inserted {} seed todos.", SEED_TODOS.len());

    Ok(())
}
