use super::Captures;

/// Outcome of one attempt to match a pattern against a node.
#[derive(Clone, Debug)]
pub enum Match<N> {
    NoMatch,
    Matched { value: N, captures: Captures },
}

impl<N> Match<N> {
    pub fn is_match(&self) -> bool {
        matches!(self, Match::Matched { .. })
    }

    pub fn value(&self) -> Option<&N> {
        match self {
            Match::Matched { value, .. } => Some(value),
            Match::NoMatch => None,
        }
    }

    pub fn captures(&self) -> Option<&Captures> {
        match self {
            Match::Matched { captures, .. } => Some(captures),
            Match::NoMatch => None,
        }
    }

    pub fn into_parts(self) -> Option<(N, Captures)> {
        match self {
            Match::Matched { value, captures } => Some((value, captures)),
            Match::NoMatch => None,
        }
    }
}
