use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Kind of normalised market data a computation subscribes to.
///
/// Hosts subscribe upstream to the union of the [`SubKind`]s declared by every active
/// [`Computable`](crate::compute::Computable), and only feed a computable the events of the kinds
/// it declared.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SubKind {
    #[display("derivative_ticker")]
    DerivativeTicker,
    #[display("book_change")]
    BookChange,
}

impl SubKind {
    /// Return the &str representation of this [`SubKind`], matching the data type
    /// discriminator used by downstream filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubKind::DerivativeTicker => "derivative_ticker",
            SubKind::BookChange => "book_change",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_kind_display_matches_serde() {
        for kind in [SubKind::DerivativeTicker, SubKind::BookChange] {
            let serialised = serde_json::to_string(&kind).unwrap();
            assert_eq!(serialised, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
