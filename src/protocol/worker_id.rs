use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of one render job and the worker answering it.
///
/// Ids only ever grow: each new request gets `next()` of the previous one,
/// and responses carrying an older id are stale.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(transparent)]
pub struct WorkerId(u64);

impl WorkerId {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_increments() {
        assert_eq!(WorkerId::default().next(), WorkerId::new(1));
        assert!(WorkerId::new(7).next() > WorkerId::new(7));
    }

    #[test]
    fn test_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&WorkerId::new(42)).unwrap(), "42");
        assert_eq!(serde_json::from_str::<WorkerId>("3").unwrap(), WorkerId::new(3));
        assert!(serde_json::from_str::<WorkerId>("-1").is_err());
    }
}
