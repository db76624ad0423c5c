//! Ordered-preference resolution.

/// Outcome of resolving a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// A candidate satisfied the predicate.
    Candidate(T),
    /// No candidate did; the fallback was chosen.
    Fallback(T),
}

impl<T> Resolution<T> {
    /// The chosen value, regardless of how it was reached.
    pub fn into_inner(self) -> T {
        match self {
            Self::Candidate(value) | Self::Fallback(value) => value,
        }
    }

    /// Whether the fallback was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Return the first candidate satisfying `exists`, or `fallback`.
///
/// Candidates are tested in order and testing stops at the first hit.
pub fn first_available<T, I, F>(candidates: I, mut exists: F, fallback: T) -> Resolution<T>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> bool,
{
    for candidate in candidates {
        if exists(&candidate) {
            return Resolution::Candidate(candidate);
        }
    }
    Resolution::Fallback(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_first_satisfying_candidate() {
        let available = ["php8.2", "php8.1"];
        let resolved = first_available(
            ["php8.4", "php8.3", "php8.2", "php8.1"],
            |c| available.contains(c),
            "php",
        );
        assert_eq!(resolved, Resolution::Candidate("php8.2"));
    }

    #[test]
    fn falls_back_when_nothing_matches() {
        let resolved = first_available(["php8.4", "php8.3"], |_| false, "php");
        assert!(resolved.is_fallback());
        assert_eq!(resolved.into_inner(), "php");
    }

    #[test]
    fn empty_candidates_fall_back() {
        let resolved = first_available(Vec::<String>::new(), |_| true, "php".to_string());
        assert_eq!(resolved, Resolution::Fallback("php".to_string()));
    }

    #[test]
    fn stops_testing_after_first_hit() {
        let mut tested = Vec::new();
        first_available(
            ["a", "b", "c"],
            |c| {
                tested.push(*c);
                *c == "b"
            },
            "z",
        );
        assert_eq!(tested, vec!["a", "b"]);
    }
}
