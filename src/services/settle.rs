//! Gather independent results without letting one failure discard the rest

use std::future::Future;

use futures_util::future::join_all;

use crate::error::{DraftsError, Result};

/// Outcome of a batch of independent operations
#[derive(Debug)]
pub struct Settled<T> {
    /// Successful results, in input order
    pub values: Vec<T>,
    /// Failures paired with the index of the operation that produced them
    pub failures: Vec<(usize, DraftsError)>,
}

impl<T> Settled<T> {
    /// Log every failure as a warning, then return the successes
    pub fn into_values_logged(self, what: &str) -> Vec<T> {
        for (index, error) in &self.failures {
            tracing::warn!("Failed to {} (item {}): {}", what, index, error);
        }
        self.values
    }
}

/// Run all futures concurrently and wait for every one of them to finish
pub async fn settle_all<I, F, T>(operations: I) -> Settled<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T>>,
{
    let results = join_all(operations).await;

    let mut values = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(value) => values.push(value),
            Err(error) => failures.push((index, error)),
        }
    }

    Settled { values, failures }
}

/// Value of a settled result; a failure is logged and becomes `None`
pub fn settled_value<T>(result: Result<T>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!("Failed to {}: {}", what, error);
            None
        }
    }
}
