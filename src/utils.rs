// src/utils.rs

/// Normalize an email for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Split a comma separated form field into trimmed, non-empty entries
pub fn parse_skills(raw: &str) -> Vec<String> {
    clean_list(raw.split(',').map(str::to_string))
}

/// Trim entries and drop the empty ones
pub fn clean_list<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Minimal shape check; deliverability is not our concern
pub fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

/// Case-insensitive substring search over several fields
pub fn matches_search(query: &str, fields: &[Option<&str>]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Anna@Example.COM "), "anna@example.com");
    }

    #[test]
    fn test_parse_skills() {
        assert_eq!(parse_skills("Rust, Go ,, SQL "), vec!["Rust", "Go", "SQL"]);
        assert!(parse_skills(" , ").is_empty());
        assert!(parse_skills("").is_empty());
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("hr@startup.io"));
        assert!(!looks_like_email("hr.startup.io"));
        assert!(!looks_like_email("@startup.io"));
        assert!(!looks_like_email("hr@localhost"));
    }

    #[test]
    fn test_matches_search() {
        let fields = [Some("Giulia Rossi"), None, Some("Backend Engineer")];
        assert!(matches_search("rossi", &fields));
        assert!(matches_search("BACKEND", &fields));
        assert!(matches_search("  ", &fields));
        assert!(!matches_search("frontend", &fields));
    }
}
