/// Derive a URL slug from a display name.
///
/// Lowercases the input, collapses every run of non-alphanumeric
/// characters to a single `-`, and trims leading/trailing separators.
/// Used as the last-resort match key when an upstream item carries no
/// explicit slug.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_separator = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Tour Poster"), "tour-poster");
    }

    #[test]
    fn test_punctuation_runs_collapse() {
        assert_eq!(slugify("Limited Edition Tee!"), "limited-edition-tee");
        assert_eq!(slugify("A -- B"), "a-b");
    }

    #[test]
    fn test_leading_and_trailing_separators_trimmed() {
        assert_eq!(slugify("  (Deluxe) "), "deluxe");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
