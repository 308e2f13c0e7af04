use strsim::levenshtein;

/// Bounded edit-distance comparison of two optional person names.
///
/// True only when both names are present and within `max_edits` Levenshtein
/// distance. An absent side never fuzzy-matches, absent-vs-absent included;
/// the perfect pass compares names by exact equality instead, where
/// `None == None` does hold. Comparison is case-sensitive.
pub fn fuzzy_eq(a: Option<&str>, b: Option<&str>, max_edits: usize) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => levenshtein(a, b) <= max_edits,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
