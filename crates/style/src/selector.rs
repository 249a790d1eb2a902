use log::warn;
use std::collections::HashSet;

/// A single compound selector: optional tag, optional id, any classes.
/// Combinators, pseudo-classes, and attribute selectors are not modeled;
/// selector parsing rejects them and the rule is skipped for that selector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Selector {
    /// Packed (id, class, tag) specificity; higher wins.
    pub fn specificity(&self) -> u32 {
        let ids = u32::from(self.id.is_some());
        let classes = self.classes.len() as u32;
        let tags = u32::from(self.tag.is_some());
        (ids << 16) | (classes.min(0xFF) << 8) | tags
    }

    /// Match against extracted element facts (lowercased tag, raw id/classes).
    pub fn matches(&self, tag: &str, id: Option<&str>, classes: &HashSet<String>) -> bool {
        if let Some(want) = &self.tag
            && want != tag
        {
            return false;
        }
        if let Some(want) = &self.id
            && id != Some(want.as_str())
        {
            return false;
        }
        self.classes.iter().all(|class| classes.contains(class))
    }
}

/// Parse a comma-separated selector list, dropping selectors that use
/// unsupported syntax (with one warning per dropped selector).
pub fn parse_selector_list(prelude: &str) -> Vec<Selector> {
    let mut out = Vec::new();
    for part in prelude.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match parse_compound(part) {
            Some(selector) => out.push(selector),
            None => warn!("skipping unsupported selector '{part}'"),
        }
    }
    out
}

/// Parse one compound selector (`tag`, `.class`, `#id`, `*`, concatenations).
fn parse_compound(part: &str) -> Option<Selector> {
    if part
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '>' | '+' | '~' | ':' | '[' | '('))
    {
        return None;
    }
    let mut selector = Selector::default();
    let mut rest = part;
    // Leading segment is a tag name or the universal selector.
    if !rest.starts_with(['.', '#']) {
        let end = rest.find(['.', '#']).unwrap_or(rest.len());
        let head = &rest[..end];
        if head != "*" {
            if !is_identifier(head) {
                return None;
            }
            selector.tag = Some(head.to_ascii_lowercase());
        }
        rest = &rest[end..];
    }
    while !rest.is_empty() {
        let marker = rest.chars().next()?;
        rest = &rest[1..];
        let end = rest.find(['.', '#']).unwrap_or(rest.len());
        let name = &rest[..end];
        if !is_identifier(name) {
            return None;
        }
        match marker {
            '.' => selector.classes.push(name.to_owned()),
            '#' => {
                if selector.id.is_some() {
                    return None;
                }
                selector.id = Some(name.to_owned());
            }
            _ => return None,
        }
        rest = &rest[end..];
    }
    if selector.tag.is_none() && selector.id.is_none() && selector.classes.is_empty() && part != "*"
    {
        return None;
    }
    Some(selector)
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
}
