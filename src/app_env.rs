/// URL for accessing the PostgreSQL database (should contain a schema name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Log level configuration for the application. Accepts tracing-subscriber env-filter
/// directives, e.g. `info` or `todo_rest=debug,sqlx=warn`
pub const LOG_LEVEL: &str = "LOG_LEVEL";
/// Port the HTTP server listens on. Defaults to 8080 when unset.
pub const SERVER_PORT: &str = "SERVER_PORT";
