//! Input validation for identifiers that reach SQL or the filesystem.
//!
//! Table names are validated character-by-character against a fixed
//! grammar before any query text is built with them; nothing here ever
//! touches the database.

/// Check a table name against the allowed grammar.
///
/// Accepts `name` or `schema.name`, where each segment starts with an
/// ASCII letter or underscore and continues with ASCII letters, digits,
/// or underscores. Equivalent to
/// `^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$`.
#[must_use]
pub fn is_valid_table_name(name: &str) -> bool {
    let mut segments = name.split('.');

    let Some(first) = segments.next() else {
        return false;
    };
    if !is_valid_identifier(first) {
        return false;
    }

    // At most one schema qualifier dot.
    match segments.next() {
        None => true,
        Some(second) => is_valid_identifier(second) && segments.next().is_none(),
    }
}

/// One unqualified identifier segment.
fn is_valid_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check a profile name for use as a lookup key and scratch-file stem.
///
/// Keeps the same character set as identifiers plus `-`, so profile
/// names embed cleanly in scratch file names.
#[must_use]
pub fn is_valid_profile_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use single-row optimization (O(min(m,n)) space)
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Find existing names similar to the searched name.
///
/// Returns up to `max` suggestions with edit distance ≤ 3,
/// sorted by distance then alphabetically.
pub fn find_similar_names(searched: &str, existing: &[String], max: usize) -> Vec<String> {
    let mut candidates: Vec<(usize, &str)> = existing
        .iter()
        .map(|name| (levenshtein_distance(searched, name), name.as_str()))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    candidates
        .into_iter()
        .take(max)
        .map(|(_, name)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_table_names() {
        assert!(is_valid_table_name("json_records"));
        assert!(is_valid_table_name("_private"));
        assert!(is_valid_table_name("main.json_records"));
        assert!(is_valid_table_name("T2"));
    }

    #[test]
    fn test_invalid_table_names() {
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2fast"));
        assert!(!is_valid_table_name("json records"));
        assert!(!is_valid_table_name("a.b.c"));
        assert!(!is_valid_table_name(".leading"));
        assert!(!is_valid_table_name("trailing."));
        assert!(!is_valid_table_name("json_records; DROP TABLE x"));
        assert!(!is_valid_table_name("records--"));
    }

    #[test]
    fn test_profile_names() {
        assert!(is_valid_profile_name("cfg"));
        assert!(is_valid_profile_name("app-settings_2"));
        assert!(!is_valid_profile_name(""));
        assert!(!is_valid_profile_name("has space"));
        assert!(!is_valid_profile_name("dot.ted"));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_find_similar_names() {
        let names = vec![
            "cfg".to_string(),
            "config".to_string(),
            "notes".to_string(),
        ];
        let result = find_similar_names("cfh", &names, 3);
        assert!(result.contains(&"cfg".to_string()));
        assert!(!result.contains(&"notes".to_string()));
    }
}
