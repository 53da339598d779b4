//! String literal cooking.

/// Cook a quoted string literal (quotes included) into its value.
///
/// Handles the common single-character escapes; an unknown escape
/// keeps the escaped character, matching how engines treat `"\q"`.
pub fn cook_string(raw: &str) -> String {
    let body = &raw[1..raw.len().saturating_sub(1)];
    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('0') => value.push('\0'),
            Some(other) => value.push(other),
            None => {}
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooks_plain_and_escaped() {
        assert_eq!(cook_string("\"Hello\""), "Hello");
        assert_eq!(cook_string("'a\\nb'"), "a\nb");
        assert_eq!(cook_string("\"say \\\"hi\\\"\""), "say \"hi\"");
        assert_eq!(cook_string("'\\q'"), "q");
    }
}
