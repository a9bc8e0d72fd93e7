/// Whitespace as browsers define it, which also counts the byte order mark.
fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Strip leading and trailing whitespace the way a browser trims form input.
pub fn trim(input: &str) -> &str {
    input.trim_matches(is_space)
}

/// Characters allowed in each part of an address.
fn is_part(part: &str) -> bool {
    !part.is_empty() && !part.chars().any(|c| is_space(c) || c == '@')
}

/// Loose shape check for an email address: `local@domain.tld`, where no part is empty or holds
/// whitespace or `@`. The domain may contain further dots. Not RFC 5322, and not meant to be.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    is_part(local)
        && !domain.contains('@')
        && domain.match_indices('.').any(|(index, _)| {
            let (host, tld) = (&domain[..index], &domain[index + 1..]);
            is_part(host) && is_part(tld)
        })
}
