use crate::app_env;
use crate::persistence;
use dotenv::dotenv;
use std::env;

/// Connects to the test database, brings up the schema, and clears out any
/// leftover rows so the test body starts from a blank table.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub async fn prepare_test_database() -> persistence::ExternalConnectivity {
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    let db_url = env::var(app_env::test::TEST_DB_URL).expect(
        "You must provide the TEST_DB_URL environment variable as the postgres connection string",
    );
    let db_pool = persistence::connect_sqlx(&db_url)
        .await
        .expect("Could not connect to the test database");

    let mut ext_cxn = persistence::ExternalConnectivity::new(db_pool.clone());
    persistence::schema::initialize(&mut ext_cxn)
        .await
        .expect("Test database schema initialization failed");

    sqlx::query("TRUNCATE todos RESTART IDENTITY")
        .execute(&db_pool)
        .await
        .expect("Could not clear the todos table");

    ext_cxn
}
