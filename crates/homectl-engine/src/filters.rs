//! Dhall-specific template filters
//!
//! Values interpolated into the resource template must become valid Dhall
//! syntax whatever they contain. These filters do that escaping.

use minijinja::{Error, ErrorKind};

/// Words that cannot appear as bare Dhall labels
const RESERVED: &[&str] = &[
    "if", "then", "else", "let", "in", "as", "using", "merge", "missing", "Infinity", "NaN",
    "Some", "toMap", "assert", "forall", "with", "showConstructor", "Type", "Kind", "Sort",
    "Bool", "True", "False", "Optional", "None", "Natural", "Integer", "Double", "Text", "List",
    "Date", "Time", "TimeZone", "Bytes",
];

/// Render a string as a Dhall double-quoted text literal
///
/// Usage: {{ secret_value | dhall_text }}
#[must_use]
pub fn dhall_text(value: String) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Render a string as a Dhall record label, quoting it with backticks when needed
///
/// Usage: {{ resource | dhall_label }}
pub fn dhall_label(value: String) -> Result<String, Error> {
    if is_simple_label(&value) && !RESERVED.contains(&value.as_str()) {
        return Ok(value);
    }

    if value.is_empty() || !value.chars().all(is_quotable) {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("{:?} cannot be used as a Dhall label", value),
        ));
    }

    Ok(format!("`{}`", value))
}

fn is_simple_label(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '/' | '_'))
}

fn is_quotable(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{5F}' | '\u{61}'..='\u{7E}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dhall_text_plain() {
        assert_eq!(dhall_text("hunter2".to_string()), r#""hunter2""#);
        assert_eq!(dhall_text(String::new()), r#""""#);
    }

    #[test]
    fn test_dhall_text_escapes() {
        assert_eq!(dhall_text(r#"say "hi""#.to_string()), r#""say \"hi\"""#);
        assert_eq!(dhall_text(r"C:\temp".to_string()), r#""C:\\temp""#);
        assert_eq!(dhall_text("${env}".to_string()), r#""\${env}""#);
        assert_eq!(dhall_text("a\nb\tc".to_string()), r#""a\nb\tc""#);
        assert_eq!(dhall_text("\u{1b}".to_string()), r#""\u001B""#);
    }

    #[test]
    fn test_dhall_text_keeps_unicode() {
        assert_eq!(dhall_text("pässwörd✓".to_string()), "\"pässwörd✓\"");
    }

    #[test]
    fn test_dhall_label_simple() {
        assert_eq!(dhall_label("deployment".to_string()).unwrap(), "deployment");
        assert_eq!(dhall_label("deployment-01".to_string()).unwrap(), "deployment-01");
        assert_eq!(dhall_label("DB_PASSWORD".to_string()).unwrap(), "DB_PASSWORD");
    }

    #[test]
    fn test_dhall_label_quotes_when_needed() {
        assert_eq!(dhall_label("01-worker".to_string()).unwrap(), "`01-worker`");
        assert_eq!(dhall_label("db.password".to_string()).unwrap(), "`db.password`");
        assert_eq!(dhall_label("with space".to_string()).unwrap(), "`with space`");
        assert_eq!(dhall_label("let".to_string()).unwrap(), "`let`");
        assert_eq!(dhall_label("Text".to_string()).unwrap(), "`Text`");
    }

    #[test]
    fn test_dhall_label_rejects_unquotable() {
        assert!(dhall_label(String::new()).is_err());
        assert!(dhall_label("back`tick".to_string()).is_err());
        assert!(dhall_label("naïve".to_string()).is_err());
    }
}
