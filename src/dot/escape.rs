use std::fmt::Display;

/// Characters that cannot appear in a dot node identifier and are replaced with `_`.
const REPLACED: &[char] = &[
    ' ', '.', '/', '#', '?', ',', '!', '@', '$', '%', '^', '*', '(', ')', '+', '=', '[', ']', '{',
    '}', ':', ';', '"', '-', '\\', '\'',
];

/// Normalizes a human label into a graph-safe identifier.
///
/// `&` becomes the word `and`; every character in `REPLACED` becomes `_`. Distinct labels can
/// escape to the same identifier, so callers that need unique nodes include numeric ids.
pub fn escape_name(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '&' => escaped.push_str("and"),
            c if REPLACED.contains(&c) => escaped.push('_'),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Builds a node identifier from a name followed by the ids that make it unique.
///
/// The `N` prefix keeps identifiers from starting with a digit.
pub fn node_name(parts: &[&dyn Display]) -> String {
    let joined = parts.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" ");
    escape_name(&format!("N{}", joined))
}

/// Whether `id` can be written unquoted as a dot identifier.
fn is_bare_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Quotes `id` unless it is already a valid bare identifier.
pub fn dot_id(id: &str) -> String {
    if is_bare_id(id) {
        id.to_string()
    } else {
        quote(id)
    }
}

/// Wraps a string in double quotes, escaping backslashes and quotes.
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_label() {
        assert_eq!(
            escape_name("Request Fees & Taxes (2024)"),
            "Request_Fees_and_Taxes__2024_"
        );
    }

    #[test]
    fn test_escape_every_replaced_character() {
        assert_eq!(escape_name(" ./#?,!@$%^*()+=[]{}:;\"-\\'"), "_".repeat(26));
        assert_eq!(escape_name("Plain_Name9"), "Plain_Name9");
        assert_eq!(escape_name(""), "");
    }

    #[test]
    fn test_node_name_includes_ids() {
        assert_eq!(node_name(&[&"TX: Order Survey", &3, &17]), "NTX__Order_Survey_3_17");
        assert_ne!(
            node_name(&[&"Survey", &1, &2]),
            node_name(&[&"Survey", &1, &3])
        );
    }

    #[test]
    fn test_dot_id_quotes_non_bare_ids() {
        assert_eq!(dot_id("N_Order_1_2"), "N_Order_1_2");
        assert_eq!(dot_id("NCafé_1"), "NCafé_1");
        assert_eq!(dot_id("N<b>"), "\"N<b>\"");
        assert_eq!(dot_id("9lives"), "\"9lives\"");
    }
}
