//! Small HTML building blocks shared by the pages.

use std::fmt::Write as _;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Bytes that cannot appear raw inside one URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'&')
    .add(b'\'');

/// Escape text for element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Encode `text` as a single path segment, safe inside an attribute.
pub fn path_segment(text: &str) -> String {
    escape(&utf8_percent_encode(text, SEGMENT).to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Gray,
}

impl Tone {
    pub fn class(self) -> &'static str {
        match self {
            Self::Blue => "tone-blue",
            Self::Green => "tone-green",
            Self::Purple => "tone-purple",
            Self::Orange => "tone-orange",
            Self::Red => "tone-red",
            Self::Gray => "tone-gray",
        }
    }
}

pub fn stat_card(title: &str, value: &str, tone: Tone, note: Option<&str>) -> String {
    let note = note
        .map(|n| format!(r#"<span class="stat-note">{}</span>"#, escape(n)))
        .unwrap_or_default();
    format!(
        r#"<div class="card stat-card {tone}">
    <div class="stat-head"><span class="stat-dot"></span>{note}</div>
    <h3 class="stat-value">{value}</h3>
    <p class="stat-title">{title}</p>
</div>"#,
        tone = tone.class(),
        value = escape(value),
        title = escape(title),
    )
}

pub fn badge(text: &str, tone: Tone) -> String {
    format!(r#"<span class="badge {}">{}</span>"#, tone.class(), escape(text))
}

/// Inline message. Rendered into `#flash` by fragment handlers.
pub fn alert(tone: Tone, message: &str) -> String {
    let role = if tone == Tone::Red { "alert" } else { "status" };
    format!(
        r#"<div class="alert {}" role="{role}">{}</div>"#,
        tone.class(),
        escape(message)
    )
}

pub fn progress(percent: u32) -> String {
    let percent = percent.min(100);
    format!(r#"<div class="progress"><div class="progress-bar" style="width: {percent}%"></div></div>"#)
}

pub fn empty_state(message: &str) -> String {
    format!(r#"<p class="empty-state">{}</p>"#, escape(message))
}

/// `<option>` list with `selected` on the matching value.
pub fn options<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>, selected: &str) -> String {
    let mut out = String::new();
    for (value, label) in items {
        let mark = if value == selected { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{}"{mark}>{}</option>"#,
            escape(value),
            escape(label)
        );
    }
    out
}

/// Tab strip that swaps `target` with the fragment at `{base}/{id}`.
pub fn tabs(base: &str, target: &str, items: &[(&str, &str)], active: &str) -> String {
    let mut out = String::from(r#"<nav class="tabs" role="tablist">"#);
    for (id, label) in items {
        let class = if *id == active { "tab active" } else { "tab" };
        let _ = write!(
            out,
            r##"<button class="{class}" role="tab" hx-get="{base}/{id}" hx-target="#{target}" hx-swap="innerHTML">{label}</button>"##,
        );
    }
    out.push_str("</nav>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_stay_in_one_segment() {
        assert_eq!(path_segment("1700000000123"), "1700000000123");
        assert_eq!(path_segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(path_segment("50% off"), "50%25%20off");
        assert_eq!(path_segment(r#"x"><script>"#), "x%22%3E%3Cscript%3E");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<b>"Tom" & 'Jerry'</b>"#), "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;");
    }

    #[test]
    fn marks_selected_option() {
        let html = options([("a", "A"), ("b", "B")], "b");
        assert!(html.contains(r#"<option value="b" selected>B</option>"#));
        assert!(html.contains(r#"<option value="a">A</option>"#));
    }
}
