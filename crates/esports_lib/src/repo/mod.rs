//! The typed repositories of the website, one module per entity.
//!
//! Every function is generic over [`ConnectionTrait`](sea_orm::ConnectionTrait), so it can be
//! called with a pool, a transaction or a mock connection. The same functions are used
//! by the public API, the admin API and the CLI.
//!
//! The admin forms are represented by the `*Form` types. Their `validate` method checks
//! the presence of the required fields before any write, and returns the typed data to save,
//! along with the image of the form if any, which is resolved separately.

pub mod admins;
pub mod committee;
pub mod events;
pub mod gallery;
pub mod games;
pub mod registrations;
pub mod settings;
pub mod sponsors;
pub mod stats;
pub mod tournaments;

use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};

use crate::error::{EsportsError, EsportsResult};

/// Deletes the row of the provided entity with the provided ID.
///
/// Returns a [`EsportsError::NotFound`] error labelled with `kind` if no row was deleted.
pub(crate) async fn delete_by_id<E, C>(conn: &C, kind: &'static str, id: i32) -> EsportsResult
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    C: ConnectionTrait,
{
    let result = E::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(EsportsError::not_found(kind, id));
    }
    tracing::info!("Deleted {kind} {id}");
    Ok(())
}
