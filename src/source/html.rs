use once_cell::sync::Lazy;
use quick_xml::escape::resolve_html5_entity;
use regex::Regex;

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    // Attribute pairs: key="value" or key='value' (no backreferences in Rust regex)
    Regex::new(r#"(?i)([a-zA-Z_:\-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static DIV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(/?)div\b[^>]*>").unwrap());
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&#?[A-Za-z0-9]+;").unwrap());

/// Visible text of an HTML fragment: tags dropped, entities decoded, whitespace collapsed.
pub fn text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    normalize_ws(&decode_entities(&stripped))
}

/// Value of attribute `name` in a single opening tag, entity-decoded.
pub fn attr(tag: &str, name: &str) -> Option<String> {
    ATTR_RE.captures_iter(tag).find_map(|cap| {
        if !cap[1].eq_ignore_ascii_case(name) {
            return None;
        }
        cap.get(2)
            .or_else(|| cap.get(3))
            .map(|m| decode_entities(m.as_str()))
    })
}

/// Inner HTML of the `<div>` whose opening tag ends at byte `start`, up to its matching `</div>`.
/// An unclosed block runs to the end of the page.
pub fn div_inner(page: &str, start: usize) -> &str {
    let mut depth = 1usize;
    for tag in DIV_RE.captures_iter(&page[start..]) {
        if tag[1].is_empty() {
            depth += 1;
            continue;
        }
        depth -= 1;
        if depth == 0 {
            let end = start + tag.get(0).map_or(0, |m| m.start());
            return &page[start..end];
        }
    }
    &page[start..]
}

/// Decode HTML5 named and numeric references one at a time. A reference that does not resolve is
/// kept as written and does not stop its neighbours from decoding.
pub fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |c: &regex::Captures| {
            let reference = &c[0];
            quick_xml::escape::unescape_with(reference, resolve_html5_entity)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| reference.to_string())
        })
        .into_owned()
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
