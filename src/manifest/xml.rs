//! Minimal XML text helpers for manifest fragments.

/// One level of indentation.
pub const INDENT: &str = "  ";

/// Escape text for use in element content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

fn attributes(attrs: &[(&str, &str)]) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!(" {}=\"{}\"", key, escape(value)))
        .collect()
}

/// `<tag a="b">`
pub fn open(depth: usize, tag: &str, attrs: &[(&str, &str)]) -> String {
    format!("{}<{}{}>", indent(depth), tag, attributes(attrs))
}

/// `</tag>`
pub fn close(depth: usize, tag: &str) -> String {
    format!("{}</{}>", indent(depth), tag)
}

/// `<tag a="b"/>`
pub fn empty(depth: usize, tag: &str, attrs: &[(&str, &str)]) -> String {
    format!("{}<{}{}/>", indent(depth), tag, attributes(attrs))
}

/// `<tag a="b">text</tag>`
pub fn text(depth: usize, tag: &str, attrs: &[(&str, &str)], content: &str) -> String {
    format!(
        "{}<{}{}>{}</{}>",
        indent(depth),
        tag,
        attributes(attrs),
        escape(content),
        tag
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a < b && c > \"d\""), "a &lt; b &amp;&amp; c &gt; &quot;d&quot;");
    }

    #[test]
    fn test_elements() {
        assert_eq!(empty(1, "depend", &[("package", "roscpp")]), "  <depend package=\"roscpp\"/>");
        assert_eq!(text(1, "run_depend", &[], "nav_msgs"), "  <run_depend>nav_msgs</run_depend>");
        assert_eq!(open(0, "library", &[("path", "lib/x")]), "<library path=\"lib/x\">");
        assert_eq!(close(2, "class"), "    </class>");
    }
}
