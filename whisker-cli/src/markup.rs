//! The `:role:`payload`` markup dialect used in help and error text.

/// SGR sequence starting bold text.
pub const BOLD: &str = "\x1b[1m";
/// SGR sequence ending bold text.
pub const BOLD_OFF: &str = "\x1b[22m";
/// SGR sequence starting italic text.
pub const ITALIC: &str = "\x1b[3m";
/// SGR sequence ending italic text.
pub const ITALIC_OFF: &str = "\x1b[23m";
/// SGR sequence restoring the default foreground color.
pub const FG_DEFAULT: &str = "\x1b[39m";

/// Expands all markup spans in `text`. With `styled` false the payloads
/// are kept and the role annotations dropped.
pub fn expand(text: &str, styled: bool) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some((before, role, payload, after)) = next_span(rest) {
        result.push_str(before);
        if styled {
            let (on, off) = role_style(role);
            result.push_str(on);
            result.push_str(payload);
            result.push_str(off);
        } else {
            result.push_str(payload);
        }
        rest = after;
    }
    result.push_str(rest);
    result
}

/// Removes all markup from `text`, keeping the payloads.
pub fn strip(text: &str) -> String {
    expand(text, false)
}

/// Renders an error message in the `Error:` style.
pub fn format_error(message: &str, styled: bool) -> String {
    let expanded = expand(message, styled);
    if styled {
        std::format!("\x1b[31m{BOLD}Error{BOLD_OFF}{FG_DEFAULT}: {expanded}")
    } else {
        std::format!("Error: {expanded}")
    }
}

/// Locates the next `:role:`payload`` span. Returns the text before it,
/// the role, the payload, and the remaining text.
fn next_span(text: &str) -> Option<(&str, &str, &str, &str)> {
    let mut search_from = 0;
    loop {
        let colon = text[search_from..].find(':')? + search_from;
        let after_colon = &text[colon + 1..];

        let Some(role_end) = after_colon.find(':') else {
            return None;
        };
        let role = &after_colon[..role_end];
        let after_role = &after_colon[role_end + 1..];

        if !role.is_empty()
            && role.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && after_role.starts_with('`')
        {
            if let Some(payload_end) = after_role[1..].find('`') {
                let payload = &after_role[1..=payload_end];
                let rest = &after_role[payload_end + 2..];
                return Some((&text[..colon], role, payload, rest));
            }
        }

        search_from = colon + 1;
    }
}

fn role_style(role: &str) -> (&'static str, &'static str) {
    match role {
        "bold" | "opt" | "option" => (BOLD, BOLD_OFF),
        "italic" | "em" | "env" | "file" => (ITALIC, ITALIC_OFF),
        "code" | "cyan" => ("\x1b[36m", FG_DEFAULT),
        "green" => ("\x1b[32m", FG_DEFAULT),
        "yellow" => ("\x1b[33m", FG_DEFAULT),
        "red" => ("\x1b[31m", FG_DEFAULT),
        "blue" => ("\x1b[34m", FG_DEFAULT),
        "magenta" => ("\x1b[35m", FG_DEFAULT),
        _ => ("", ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_styled() {
        assert_eq!(
            expand("see :bold:`this`", true),
            std::format!("see {BOLD}this{BOLD_OFF}")
        );
        assert_eq!(
            expand(":yellow:`--opt` is unknown", true),
            std::format!("\x1b[33m--opt{FG_DEFAULT} is unknown")
        );
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip("a :green:`b` c :code:`d`"), "a b c d");
        assert_eq!(strip("no markup here"), "no markup here");
    }

    #[test]
    fn test_colons_without_markup_survive() {
        assert_eq!(strip("time: 12:30"), "time: 12:30");
        assert_eq!(strip("ratio 1:2"), "ratio 1:2");
    }

    #[test]
    fn test_unknown_role_keeps_payload() {
        assert_eq!(expand(":frobnicate:`x`", true), "x");
    }

    #[test]
    fn test_format_error_plain() {
        assert_eq!(
            format_error("bad value :yellow:`x`", false),
            "Error: bad value x"
        );
    }
}
