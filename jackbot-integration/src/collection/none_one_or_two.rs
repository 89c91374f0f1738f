use itertools::Either;
use serde::{Deserialize, Serialize};
use std::iter::{Empty, Once};

/// Ordered collection of at most two `T` items.
///
/// Used as the output of computations that yield a statically bounded number of items per
/// input, avoiding a heap allocation per call.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Deserialize, Serialize)]
pub enum NoneOneOrTwo<T> {
    #[default]
    None,
    One(T),
    Two(T, T),
}

// Utility methods
impl<T> NoneOneOrTwo<T> {
    pub fn map<U, F>(self, mut f: F) -> NoneOneOrTwo<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            Self::None => NoneOneOrTwo::None,
            Self::One(x) => NoneOneOrTwo::One(f(x)),
            Self::Two(x, y) => {
                let x = f(x);
                NoneOneOrTwo::Two(x, f(y))
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::One(_) => 1,
            Self::Two(_, _) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_none()
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn first(&self) -> Option<&T> {
        match self {
            Self::None => None,
            Self::One(x) | Self::Two(x, _) => Some(x),
        }
    }

    pub fn last(&self) -> Option<&T> {
        match self {
            Self::None => None,
            Self::One(x) | Self::Two(_, x) => Some(x),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        match self {
            Self::None => [None, None],
            Self::One(x) => [Some(x), None],
            Self::Two(x, y) => [Some(x), Some(y)],
        }
        .into_iter()
        .flatten()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.into_iter().collect()
    }
}

/// Preserves order, skipping `None` entries.
impl<T> From<(Option<T>, Option<T>)> for NoneOneOrTwo<T> {
    fn from(items: (Option<T>, Option<T>)) -> Self {
        match items {
            (None, None) => Self::None,
            (Some(x), None) | (None, Some(x)) => Self::One(x),
            (Some(x), Some(y)) => Self::Two(x, y),
        }
    }
}

impl<T> From<Option<T>> for NoneOneOrTwo<T> {
    fn from(item: Option<T>) -> Self {
        Self::from((item, None))
    }
}

impl<T> IntoIterator for NoneOneOrTwo<T> {
    type Item = T;
    type IntoIter = Either<Either<Empty<T>, Once<T>>, std::array::IntoIter<T, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Self::None => Either::Left(Either::Left(std::iter::empty())),
            Self::One(x) => Either::Left(Either::Right(std::iter::once(x))),
            Self::Two(x, y) => Either::Right([x, y].into_iter()),
        }
    }
}
