/// Turn a title into a URL slug: lowercase ASCII alphanumerics separated
/// by single hyphens. Non-ASCII characters are dropped.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppress leading hyphen

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

/// Slug with a numeric suffix to disambiguate duplicates: `{slug}-2`.
pub fn with_suffix(slug: &str, n: u32) -> String {
    format!("{slug}-{n}")
}
