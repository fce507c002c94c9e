//! Common type definitions shared across layers.
//!
//! All entity IDs are 64-bit integers assigned by the store. They are wrapped in
//! type aliases so signatures say which entity they refer to:
//!
//! - [`UserId`]: User account identifier (also the JWT subject)
//! - [`PlanId`]: Plan catalog entry
//! - [`SubscriptionId`]: Subscription record
//! - [`InvoiceId`]: Invoice record
//! - [`ProjectId`]: Project owned by a user
//! - [`TaskId`]: Task owned by a user

use std::fmt;

pub type UserId = i64;
pub type PlanId = i64;
pub type SubscriptionId = i64;
pub type InvoiceId = i64;
pub type ProjectId = i64;
pub type TaskId = i64;

/// Resources that can be looked up, owned, or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Plan,
    Subscription,
    Project,
    Task,
    User,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Plan => write!(f, "Plan"),
            Resource::Subscription => write!(f, "Subscription"),
            Resource::Project => write!(f, "Project"),
            Resource::Task => write!(f, "Task"),
            Resource::User => write!(f, "User"),
        }
    }
}
