//! API request and response data models.
//!
//! These define the public JSON contract and are kept separate from the database models so
//! the two can evolve independently. Field names are camelCase on the wire and every type
//! derives `utoipa::ToSchema` for the OpenAPI document.
//!
//! - [`auth`]: Registration, login and the token response
//! - [`users`]: Public user profile
//! - [`plans`]: Localized plan catalog entries
//! - [`subscriptions`]: Purchase requests and subscription views
//! - [`projects`]: Project create requests and responses
//! - [`tasks`]: Task CRUD payloads
//! - [`pagination`]: `skip`/`take` query parameters

pub mod auth;
pub mod pagination;
pub mod plans;
pub mod projects;
pub mod subscriptions;
pub mod tasks;
pub mod users;
