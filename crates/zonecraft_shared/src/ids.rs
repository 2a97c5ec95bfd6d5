//! Identifier helpers: slugs and collision-free suffixing.

/// Convert a name to an id slug (lowercase ascii alphanumerics joined by single dashes)
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Slugify `name` and append `-2`, `-3`, ... until `is_taken` accepts it.
/// Empty slugs fall back to `fallback`.
pub fn unique_slug(name: &str, fallback: &str, is_taken: impl Fn(&str) -> bool) -> String {
    let slug = slugify(name);
    let base = if slug.is_empty() { fallback.to_string() } else { slug };

    if !is_taken(&base) {
        return base;
    }

    let mut suffix = 2;
    loop {
        let candidate = format!("{}-{}", base, suffix);
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Keep an id as written, appending `-2`, `-3`, ... only when it collides.
/// Used on import where ids may already be referenced elsewhere in the document.
pub fn dedupe_id(id: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(id) {
        return id.to_string();
    }
    (2u32..)
        .map(|suffix| format!("{}-{}", id, suffix))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| id.to_string())
}

/// Canonical decimal form check used by the export coercion rule.
/// `"12"` qualifies, `"012"`, `"+1"` and `"1.0"` don't.
pub fn as_canonical_number(id: &str) -> Option<u64> {
    let n: u64 = id.parse().ok()?;
    if n.to_string() == id {
        Some(n)
    } else {
        None
    }
}
