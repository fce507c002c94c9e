//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! Everything is mounted under `/api`:
//!
//! - **Authentication** (`/auth/*`): Register and log in (`signup`/`signin` aliases)
//! - **Plans** (`/plans`): Public plan catalog
//! - **Subscriptions** (`/subscriptions/*`): Purchase, inspect and cancel
//! - **Projects** (`/projects/*`): Quota-limited projects
//! - **Tasks** (`/tasks/*`): Personal tasks
//!
//! # OpenAPI Documentation
//!
//! All endpoints are documented with `utoipa` annotations. The rendered documentation is
//! available at `/docs` when the server is running.

pub mod handlers;
pub mod models;
