//! Adapters that turn a fallible async operation into one that always resolves.
//!
//! Used to keep optional enrichments (trusted orgs, token exchange, settings
//! fetch) from failing context construction. The failure is still explicit at
//! the call site: the wrapped operation returns a `Result`, and the wrapper
//! decides what the `Err` arm resolves to.

use std::fmt::Display;
use std::future::Future;

/// A fallible operation paired with the value it resolves to on failure.
pub struct FailSafe<F, T> {
    op: F,
    fallback: T,
    label: &'static str,
}

/// Wrap `op` so that calling it never fails, resolving to `fallback` instead.
pub const fn with_fallback<F, T>(op: F, fallback: T) -> FailSafe<F, T> {
    FailSafe {
        op,
        fallback,
        label: "operation",
    }
}

impl<F, T> FailSafe<F, T> {
    /// Name used in the warning logged when the fallback is taken.
    #[must_use]
    pub fn labeled(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

impl<F, T: Clone> FailSafe<F, T> {
    /// Run the operation. Resolves to its `Ok` value or a clone of the fallback.
    pub async fn call<A, Fut, E>(&self, args: A) -> T
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        or_fallback((self.op)(args), self.fallback.clone(), self.label).await
    }
}

/// One-shot form of [`with_fallback`]: await `fut`, substituting `fallback` on error.
pub async fn or_fallback<T, E, Fut>(fut: Fut, fallback: T, label: &str) -> T
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    match fut.await {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, operation = label, "optional fetch failed; using fallback");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn halve(n: u32) -> Result<u32, String> {
        if n % 2 == 0 {
            Ok(n / 2)
        } else {
            Err(format!("{n} is odd"))
        }
    }

    #[tokio::test]
    async fn passes_through_success() {
        let safe = with_fallback(halve, 0).labeled("halve");
        assert_eq!(safe.call(10).await, 5);
    }

    #[tokio::test]
    async fn resolves_to_fallback_on_failure() {
        let safe = with_fallback(halve, 999);
        assert_eq!(safe.call(7).await, 999);
        // Fallback is reusable across calls.
        assert_eq!(safe.call(9).await, 999);
        assert_eq!(safe.call(4).await, 2);
    }

    #[tokio::test]
    async fn one_shot_form() {
        let value: Vec<String> =
            or_fallback(async { Err::<Vec<String>, _>("network down") }, Vec::new(), "orgs").await;
        assert!(value.is_empty());
        let value = or_fallback(async { Ok::<_, String>(vec![1, 2]) }, vec![], "nums").await;
        assert_eq!(value, vec![1, 2]);
    }
}
