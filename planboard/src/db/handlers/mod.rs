//! PostgreSQL repositories, one per table.
//!
//! Each repository wraps a `&mut PgConnection` so it can run either on a pooled
//! connection or inside a transaction opened by the caller:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let subscription = Subscriptions::new(&mut tx).create(&request).await?;
//! Invoices::new(&mut tx).create(subscription.id, &draft).await?;
//! tx.commit().await?;
//! ```
//!
//! Queries are checked at runtime (`sqlx::query_as`) and map rows into the
//! structs in [`crate::db::models`]. Errors are converted into
//! [`crate::db::errors::DbError`].

pub mod invoices;
pub mod plans;
pub mod projects;
pub mod subscriptions;
pub mod tasks;
pub mod users;

pub use invoices::Invoices;
pub use plans::Plans;
pub use projects::Projects;
pub use subscriptions::Subscriptions;
pub use tasks::Tasks;
pub use users::Users;
