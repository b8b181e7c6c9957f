//! HTML escaping for entry-derived text.
//!
//! Maud escapes interpolated values on its own, but leaves `'` alone. Entry
//! data is wrapped in [`Text`] instead, which escapes all five HTML
//! metacharacters and is safe in both element content and quoted attributes.

use maud::Render;

/// Escape `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    push_escaped(&mut out, raw);
    out
}

fn push_escaped(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Untrusted text, escaped on render.
#[derive(Debug, Clone, Copy)]
pub struct Text<'a>(pub &'a str);

impl Render for Text<'_> {
    fn render_to(&self, buffer: &mut String) {
        push_escaped(buffer, self.0);
    }
}
