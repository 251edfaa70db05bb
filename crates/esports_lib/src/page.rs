//! Pagination of the list queries.

use mkenv::prelude::*;
use sea_orm::QuerySelect;
use serde::Deserialize;

/// The default limit used when the global environment isn't initialized.
pub const DEFAULT_LIMIT: u64 = 50;
/// The maximum limit used when the global environment isn't initialized.
pub const MAX_LIMIT: u64 = 200;

/// The pagination parameters, as provided by a client in the query string.
#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct PageInput {
    /// The amount of rows to skip.
    pub offset: Option<u64>,
    /// The maximum amount of rows to return.
    pub limit: Option<u64>,
}

/// Resolved pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// The amount of rows to skip.
    pub offset: u64,
    /// The maximum amount of rows to return.
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        PageInput::default().resolve()
    }
}

impl PageInput {
    /// Resolves the pagination with the limits of the global library environment.
    pub fn resolve(self) -> Page {
        match crate::try_env() {
            Some(env) => self.resolve_with(env.list_default_limit.get(), env.list_max_limit.get()),
            None => self.resolve_with(DEFAULT_LIMIT, MAX_LIMIT),
        }
    }

    /// Resolves the pagination with the provided default and maximum limits.
    ///
    /// A limit of 0 is treated as missing.
    pub fn resolve_with(self, default_limit: u64, max_limit: u64) -> Page {
        let limit = match self.limit {
            Some(0) | None => default_limit,
            Some(limit) => limit,
        };

        Page {
            offset: self.offset.unwrap_or(0),
            limit: limit.min(max_limit),
        }
    }
}

impl Page {
    /// Applies the pagination to the provided query.
    pub fn apply<S: QuerySelect>(self, query: S) -> S {
        query.offset(self.offset).limit(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageInput};

    #[test]
    fn missing_values_use_defaults() {
        let page = PageInput::default().resolve_with(50, 200);
        assert_eq!(
            page,
            Page {
                offset: 0,
                limit: 50
            }
        );
    }

    #[test]
    fn zero_limit_is_missing() {
        let page = PageInput {
            offset: Some(10),
            limit: Some(0),
        }
        .resolve_with(20, 200);
        assert_eq!(
            page,
            Page {
                offset: 10,
                limit: 20
            }
        );
    }

    #[test]
    fn limit_is_capped() {
        let page = PageInput {
            offset: None,
            limit: Some(10_000),
        }
        .resolve_with(50, 200);
        assert_eq!(page.limit, 200);
    }
}
