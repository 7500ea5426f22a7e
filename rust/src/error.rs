//! Error handling and result types for BPlusIndex operations.
//!
//! Misses on search and delete are ordinary outcomes and are reported through
//! `Option`/`bool` by the core operations. The `try_*` variants surface them as
//! `IndexError::KeyNotFound` for callers that prefer `?` propagation.

use thiserror::Error;

/// Error type for B+ tree index operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// The minimum degree passed at construction is too small.
    #[error("Invalid degree: {degree} (minimum required: {min})")]
    InvalidDegree { degree: usize, min: usize },
    /// Key not found in the index.
    #[error("Key not found in index")]
    KeyNotFound,
    /// Key is already present; duplicates are rejected.
    #[error("Key already present in index")]
    DuplicateKey,
    /// A structural invariant does not hold. Signals a bug in the index itself.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl IndexError {
    /// Create an InvalidDegree error
    pub fn invalid_degree(degree: usize, min: usize) -> Self {
        Self::InvalidDegree { degree, min }
    }

    /// Create an InvariantViolation error with context
    pub fn invariant_violation(context: &str, details: &str) -> Self {
        Self::InvariantViolation(format!("{}: {}", context, details))
    }

    /// Check if this error is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidDegree { .. })
    }

    /// Check if this error is a normal negative lookup result
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }
}

/// Public result type for index operations that may fail
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type for index modification operations
pub type ModifyResult<T> = Result<T, IndexError>;

/// Result type for index construction
pub type InitResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IndexError::invalid_degree(1, 2);
        assert_eq!(err.to_string(), "Invalid degree: 1 (minimum required: 2)");

        let err = IndexError::invariant_violation("Leaf chain", "cycle at leaf 3");
        assert_eq!(err.to_string(), "Invariant violation: Leaf chain: cycle at leaf 3");

        assert_eq!(IndexError::KeyNotFound.to_string(), "Key not found in index");
    }

    #[test]
    fn test_error_predicates() {
        assert!(IndexError::invalid_degree(0, 2).is_configuration_error());
        assert!(!IndexError::KeyNotFound.is_configuration_error());
        assert!(IndexError::KeyNotFound.is_not_found());
        assert!(!IndexError::DuplicateKey.is_not_found());
    }
}
