//! Offset pagination for list endpoints.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Default number of items to return per page.
pub const DEFAULT_TAKE: i64 = 20;

/// Maximum number of items that can be requested per page.
pub const MAX_TAKE: i64 = 100;

/// `skip`/`take` query parameters.
///
/// `take` is clamped to 1..=100 and `skip` to at least 0, so a bad value narrows the page
/// instead of failing the request.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Number of items to skip (default: 0)
    #[param(default = 0, minimum = 0)]
    pub skip: Option<i64>,

    /// Maximum number of items to return (default: 20, max: 100)
    #[param(default = 20, minimum = 1, maximum = 100)]
    pub take: Option<i64>,
}

impl Pagination {
    #[inline]
    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    #[inline]
    pub fn take(&self) -> i64 {
        self.take.unwrap_or(DEFAULT_TAKE).clamp(1, MAX_TAKE)
    }

    #[inline]
    pub fn params(&self) -> (i64, i64) {
        (self.skip(), self.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, (0, 20))]
    #[case(Some(5), Some(10), (5, 10))]
    #[case(Some(-3), Some(500), (0, 100))]
    #[case(None, Some(0), (0, 1))]
    fn test_params(#[case] skip: Option<i64>, #[case] take: Option<i64>, #[case] expected: (i64, i64)) {
        assert_eq!(Pagination { skip, take }.params(), expected);
    }
}
