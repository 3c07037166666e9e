//! Correlation identifier carried by every request.
//!
//! The [`Trace`](crate::Trace) middleware puts one `TraceId` in task-local
//! scope per request; domain errors and log spans read it from there. Work
//! moved to another task has to re-enter the scope with [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header used both to accept a caller's trace id and to echo it back.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying one request across logs, errors and responses.
///
/// ```
/// use shareit::TraceId;
///
/// let forwarded = TraceId::adopt_or_generate(Some("5f0c3a52-8f5e-4c1e-9a4e-1d2b3c4d5e6f"));
/// assert_eq!(forwarded.to_string(), "5f0c3a52-8f5e-4c1e-9a4e-1d2b3c4d5e6f");
///
/// let fresh = TraceId::adopt_or_generate(Some("not-a-uuid"));
/// assert_ne!(fresh.to_string(), "not-a-uuid");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Random v4 identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse a caller-supplied identifier when it is a UUID, otherwise
    /// start a new one.
    #[must_use]
    pub fn adopt_or_generate(candidate: Option<&str>) -> Self {
        candidate
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request being handled, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[tokio::test]
    async fn scope_sets_and_clears_the_current_id() {
        let expected = TraceId::generate();
        let inside = TraceId::scope(expected, async { TraceId::current() }).await;

        assert_eq!(inside, Some(expected));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("42"))]
    fn unusable_candidates_yield_fresh_ids(#[case] candidate: Option<&str>) {
        let first = TraceId::adopt_or_generate(candidate);
        let second = TraceId::adopt_or_generate(candidate);
        assert_ne!(first, second);
    }

    #[rstest]
    fn padded_uuid_is_adopted() {
        let adopted = TraceId::adopt_or_generate(Some(" 00000000-0000-0000-0000-000000000001 "));
        assert_eq!(adopted.to_string(), "00000000-0000-0000-0000-000000000001");
    }
}
