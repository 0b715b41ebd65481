//! Nearest-name lookups for palette colors and animation loops

/// Levenshtein distance between two strings (insertions, deletions and
/// substitutions each cost 1).
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();

    if a_chars.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a_chars.len();
    }

    // Two rows instead of the full matrix
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for (i, &ca) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for j in 1..=b_len {
            let cost = usize::from(ca != b_chars[j - 1]);
            curr_row[j] = (prev_row[j] + 1)
                .min(curr_row[j - 1] + 1)
                .min(prev_row[j - 1] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// The `limit` candidates closest to `query`, closest first.
///
/// Comparison is case-insensitive. Ties keep candidate order, so callers
/// passing palette names get lower indices first.
pub fn nearest<'a>(query: &str, candidates: &[&'a str], limit: usize) -> Vec<&'a str> {
    let query_lower = query.to_lowercase();

    let mut scored: Vec<(&str, usize)> = candidates
        .iter()
        .map(|&candidate| {
            let distance = levenshtein_distance(&query_lower, &candidate.to_lowercase());
            (candidate, distance)
        })
        .collect();

    // Stable sort keeps candidate order among equal distances
    scored.sort_by_key(|(_, distance)| *distance);
    scored.into_iter().take(limit).map(|(s, _)| s).collect()
}

/// Format a "did you mean?" suggestion string.
/// Returns None if there are no suggestions.
pub fn format_suggestion(suggestions: &[&str]) -> Option<String> {
    match suggestions {
        [] => None,
        [one] => Some(format!("did you mean '{}'?", one)),
        [first, second] => Some(format!("did you mean '{}' or '{}'?", first, second)),
        [first, second, third, ..] => Some(format!(
            "did you mean '{}', '{}', or '{}'?",
            first, second, third
        )),
    }
}
