use std::fmt;

use thiserror::Error;

/// Ordered record of the failures seen during one retry session.
#[derive(Debug)]
pub struct MultiError<E> {
    errors: Vec<E>,
}

impl<E> Default for MultiError<E> {
    fn default() -> Self {
        Self { errors: Vec::new() }
    }
}

impl<E: fmt::Display> MultiError<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `err` when present; `None` is ignored.
    pub fn collect(&mut self, err: Option<E>) {
        if let Some(err) = err {
            self.errors.push(err);
        }
    }

    pub fn errors(&self) -> &[E] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Joins every collected message with `\n`, oldest first.
    ///
    /// A single collected error still produces a fresh [`CombinedError`]
    /// carrying the same text. Returns `None` when nothing was collected.
    pub fn to_error(&self) -> Option<CombinedError> {
        if self.errors.is_empty() {
            return None;
        }

        let message = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Some(CombinedError {
            message,
            count: self.errors.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CombinedError {
    message: String,
    count: usize,
}

impl CombinedError {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Number of failures that were joined.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.message.lines()
    }
}

#[cfg(test)]
mod tests {
    use super::MultiError;
    use crate::driver::transient::AttemptError;

    #[test]
    fn empty_aggregate_is_absent() {
        let m: MultiError<AttemptError> = MultiError::new();
        assert!(m.is_empty());
        assert!(m.to_error().is_none());
    }

    #[test]
    fn collecting_none_is_a_no_op() {
        let mut m: MultiError<AttemptError> = MultiError::new();
        for _ in 0..4 {
            m.collect(None);
        }
        assert_eq!(m.len(), 0);
        assert!(m.to_error().is_none());
    }

    #[test]
    fn single_error_keeps_its_text() {
        let mut m = MultiError::new();
        m.collect(Some(AttemptError::permanent(anyhow::anyhow!("hdiutil attach failed"))));
        let combined = m.to_error().expect("combined");
        assert_eq!(combined.message(), "hdiutil attach failed");
        assert_eq!(combined.lines().count(), 1);
        assert_eq!(combined.count(), 1);
    }

    #[test]
    fn joins_in_insertion_order() {
        let mut m = MultiError::new();
        m.collect(Some(AttemptError::retriable(anyhow::anyhow!("first"))));
        m.collect(None);
        m.collect(Some(AttemptError::retriable(anyhow::anyhow!("second"))));
        m.collect(Some(AttemptError::permanent(anyhow::anyhow!("third"))));

        assert_eq!(m.errors().len(), 3);
        assert_eq!(m.to_error().map(|e| e.count()), Some(3));
        let combined = m.to_error().expect("combined");
        assert_eq!(
            combined.to_string(),
            "Temporary Error: first\nTemporary Error: second\nthird"
        );
    }
}
