//! Connection plumbing shared by the `PostgreSQL` adapters.
//!
//! Diesel connections are synchronous, so every adapter runs its queries on
//! the blocking thread pool through [`run_blocking`].

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool shared by all marketplace adapters.
pub type MarketplacePgPool = Pool<ConnectionManager<PgConnection>>;

/// Error types that can absorb infrastructure failures.
pub trait PersistenceFailure: Sized {
    /// Wraps an infrastructure error.
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}

/// Checks out a connection and runs `f` on the blocking thread pool.
///
/// Pool checkout and join failures are mapped through
/// [`PersistenceFailure::persistence`].
pub(crate) async fn run_blocking<F, T, E>(pool: &MarketplacePgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: PersistenceFailure + Send + 'static,
{
    let owned_pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = owned_pool.get().map_err(E::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(E::persistence)?
}
