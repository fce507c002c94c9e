//! Authentication.
//!
//! Users register and log in with email and password and receive a signed JWT. Every other
//! authenticated route reads that token from the `Authorization: Bearer <token>` header.
//!
//! # Modules
//!
//! - [`current_user`]: The [`CurrentUser`](current_user::CurrentUser) extractor for handlers
//! - [`password`]: Password hashing and verification using Argon2id
//! - [`session`]: JWT creation and verification (HS256, subject = numeric user id)
//!
//! # Usage in Handlers
//!
//! ```ignore
//! use planboard::auth::current_user::CurrentUser;
//!
//! async fn protected_handler(user: CurrentUser) -> String {
//!     format!("Hello, user {}!", user.id)
//! }
//! ```
//!
//! Rejections are [`crate::errors::Error::Unauthenticated`] and render as 401 with one of
//! "Unauthorized", "Invalid token" or "Invalid token subject".

pub mod current_user;
pub mod password;
pub mod session;
