//! Database record models matching table schemas.
//!
//! These structs correspond to table rows and are what the [`crate::db::store::Store`]
//! implementations accept and return. They are distinct from the API models in
//! [`crate::api::models`] so storage and wire representations can evolve separately.
//!
//! - [`users`]: User accounts and password hashes
//! - [`plans`]: Plan catalog entries (seeded reference data)
//! - [`subscriptions`]: Subscription records and their status
//! - [`invoices`]: Invoices written alongside a subscription purchase
//! - [`projects`]: Projects subject to plan quotas
//! - [`tasks`]: Per-user tasks

pub mod invoices;
pub mod plans;
pub mod projects;
pub mod subscriptions;
pub mod tasks;
pub mod users;
