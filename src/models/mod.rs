//! Domain records and wire schemas.
//!
//! Records mirror rows coming back from the graph store; `*Response` types
//! are what handlers serialize.  All successful responses are wrapped in the
//! shared [`Data`] envelope (`{"data": …}`); failures use `{"error": …}`
//! via [`crate::error::ServerError`].

pub mod character;
pub mod location;
pub mod moment;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

/// Minimal projection of a linked Character or Location.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

/// Fixed-width RFC 3339 UTC rendering (millisecond precision) used for every
/// persisted timestamp, so lexicographic order equals chronological order.
pub fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fmt_ts_is_fixed_width() {
        let a = fmt_ts(&Utc::now());
        let b = fmt_ts(&DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(a.len(), b.len());
        assert!(b.ends_with('Z'));
    }
}
