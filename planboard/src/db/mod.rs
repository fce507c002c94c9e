//! Data persistence layer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Services   │  (crate::services - business rules)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │    Store     │  (db::store - Arc<dyn Store>, Postgres or in-memory)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │ Repositories │  (db::handlers - one per table, Postgres only)
//! └──────┬───────┘
//!        │
//!        ↓
//! ┌──────────────┐
//! │  PostgreSQL  │
//! └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`store`]: The [`Store`](store::Store) trait and its two implementations
//! - [`handlers`]: Per-table repositories over a `&mut PgConnection`
//! - [`models`]: Row structures and create/update requests
//! - [`errors`]: [`DbError`](errors::DbError), shared by both store backends
//!
//! # Repositories
//!
//! Repositories borrow a connection, so callers decide whether work runs inside a
//! transaction:
//!
//! ```ignore
//! use planboard::db::handlers::{Invoices, Subscriptions};
//!
//! let mut tx = pool.begin().await?;
//! let subscription = Subscriptions::new(&mut tx).create(&request).await?;
//! Invoices::new(&mut tx).create(subscription.id, &draft).await?;
//! tx.commit().await?;
//! ```
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and are embedded by [`crate::migrator`]. The initial
//! migration also seeds the `free` and `pro` plans.

pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
