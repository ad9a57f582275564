//! Account name derivation.

/// Derive the lab account name for an email address.
///
/// Transliterates to ASCII (`José` becomes `Jose`), lower-cases,
/// spells out `@` and `&` as `at` and `and`,
/// collapses every other run of characters outside `[a-z0-9]` into a
/// single `-`, and trims separators from both ends.
pub fn username_from_email(email: &str) -> String {
    let ascii = deunicode::deunicode(email);
    let mut slug = String::with_capacity(ascii.len() + 4);
    let mut pending_separator = false;

    for ch in ascii.chars().flat_map(char::to_lowercase) {
        match ch {
            'a'..='z' | '0'..='9' => {
                let mut buf = [0u8; 4];
                push_piece(&mut slug, ch.encode_utf8(&mut buf), &mut pending_separator);
            }
            '@' => push_piece(&mut slug, "at", &mut pending_separator),
            '&' => push_piece(&mut slug, "and", &mut pending_separator),
            _ => pending_separator = true,
        }
    }

    slug
}

/// Separators are only emitted between pieces, never leading or trailing.
fn push_piece(slug: &mut String, piece: &str, pending_separator: &mut bool) {
    if *pending_separator && !slug.is_empty() {
        slug.push('-');
    }
    *pending_separator = false;
    slug.push_str(piece);
}
