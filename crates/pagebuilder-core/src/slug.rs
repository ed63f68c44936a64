//! Slug and display-name helpers.

/// Produces a URL-safe slug from an arbitrary name.
///
/// Lowercases, maps any run of non-alphanumeric characters to a single `-`,
/// and trims leading/trailing separators. `"About Us"` becomes `"about-us"`.
pub fn slugify(source: &str) -> String {
    let mut slug = String::with_capacity(source.len());
    let mut pending_separator = false;

    for ch in source.chars() {
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

/// Turns a raw section key into a human-facing name.
///
/// Underscores become spaces and each word is capitalized:
/// `"call_to_action"` becomes `"Call To Action"`.
pub fn human_name(raw: &str) -> String {
    raw.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
