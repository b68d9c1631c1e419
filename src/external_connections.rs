use sqlx::PgConnection;

/// A handle to an active database connection. Abstracts over whether the
/// connection was checked out of a pool or borrowed from an active transaction.
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Owns clients for connecting to external systems. Allows business logic to be
/// agnostic of the external systems it communicates with so driven adapters can
/// easily be swapped out for other implementations
pub trait ExternalConnectivity: Sync {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

#[cfg(test)]
pub mod test_util {
    use super::*;

    /// Stand-in connectivity for unit tests. Unit tests exercise domain logic against
    /// in-memory ports, so any attempt to check out a real database connection is a bug
    /// in the test and panics immediately.
    #[derive(Clone)]
    pub struct FakeExternalConnectivity;

    impl FakeExternalConnectivity {
        pub fn new() -> FakeExternalConnectivity {
            FakeExternalConnectivity
        }
    }

    pub struct NoDatabase;

    impl ConnectionHandle for NoDatabase {
        fn borrow_connection(&mut self) -> &mut PgConnection {
            unreachable!("unit tests must not borrow a real database connection")
        }
    }

    impl ExternalConnectivity for FakeExternalConnectivity {
        type DbHandle<'cxn_borrow> = NoDatabase;

        async fn database_cxn(&mut self) -> Result<NoDatabase, anyhow::Error> {
            panic!("unit tests must not open a real database connection")
        }
    }
}
