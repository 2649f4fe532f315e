//! Query and generation identifiers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::QueryError;

/// A search query accepted for dispatch.
///
/// Always trimmed and never empty. Cloning is cheap, the text is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(Arc<str>);

impl Query {
    /// Accept raw input as a query.
    ///
    /// Surrounding whitespace is trimmed. Blank input is rejected with
    /// [`QueryError::Empty`].
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(Arc::from(trimmed)))
    }

    /// The query text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Recency tag of a dispatched request.
///
/// Allocated by one [`RequestDispatcher`](crate::RequestDispatcher) in strictly
/// increasing order. The first issued generation is 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Placeholder preceding every issued generation.
    pub(crate) const NONE: Self = Self(0);

    /// Raw generation number.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_input() {
        let query = Query::parse("  batman \n").unwrap();
        assert_eq!(query.as_str(), "batman");
        assert_eq!(query.to_string(), "batman");
    }

    #[test]
    fn test_parse_rejects_blank_input() {
        assert_eq!(Query::parse(""), Err(QueryError::Empty));
        assert_eq!(Query::parse("   \t "), Err(QueryError::Empty));
        assert!("\n".parse::<Query>().is_err());
    }

    #[test]
    fn test_generation_ordering() {
        let first = Generation::NONE.next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(first.get(), 1);
        assert_eq!(second.to_string(), "#2");
    }
}
