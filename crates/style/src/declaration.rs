/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Lowercased property name.
    pub name: String,
    /// Raw value text (without trailing !important).
    pub value: String,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
}

/// Parse `!important` at the end of a value, returning (`value`, `important`).
pub(crate) fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    if let Some(pos) = trimmed.rfind("!important")
        && let Some(prefix) = trimmed.get(..pos)
        && trimmed.len() - pos == "!important".len()
    {
        return (prefix.trim_end().to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

/// Parse an inline `style` attribute into declarations.
///
/// Follows the forgiving split browsers apply to the attribute: items are
/// separated by `;`, the property name ends at the first `:`, and items
/// without a colon or with an empty name/value are dropped.
pub fn parse_style_attribute(attr: &str) -> Vec<Declaration> {
    let mut out = Vec::new();
    for item in attr.split(';') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let Some(colon) = item.find(':') else {
            continue;
        };
        let name = item[..colon].trim().to_ascii_lowercase();
        let (value, important) = split_important_tail(item[colon + 1..].trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }
        out.push(Declaration {
            name,
            value,
            important,
        });
    }
    out
}

/// Serialize declarations back into attribute text.
pub fn serialize_declarations(decls: &[Declaration]) -> String {
    let mut out = String::new();
    for decl in decls {
        if !out.is_empty() {
            out.push_str("; ");
        }
        out.push_str(&decl.name);
        out.push_str(": ");
        out.push_str(&decl.value);
        if decl.important {
            out.push_str(" !important");
        }
    }
    out
}

/// Read one property from attribute text; the last declaration wins.
pub fn style_attribute_property(attr: &str, name: &str) -> Option<String> {
    let name = name.to_ascii_lowercase();
    parse_style_attribute(attr)
        .into_iter()
        .rev()
        .find(|decl| decl.name == name)
        .map(|decl| decl.value)
}

/// Set or remove one property in attribute text.
///
/// Returns the updated attribute string, or `None` when the edit would not
/// change the property's value (the caller can skip the attribute write, and
/// with it the mutation record). `value: None` or an empty value removes the
/// property. An existing declaration is updated in place; duplicates of the
/// same name are collapsed.
pub fn with_style_property(attr: &str, name: &str, value: Option<&str>) -> Option<String> {
    let name = name.to_ascii_lowercase();
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let decls = parse_style_attribute(attr);
    let current = decls
        .iter()
        .rev()
        .find(|decl| decl.name == name)
        .map(|decl| decl.value.as_str());
    if current == value {
        return None;
    }
    let mut out: Vec<Declaration> = Vec::with_capacity(decls.len() + 1);
    let mut placed = false;
    for decl in decls {
        if decl.name == name {
            if let Some(new_value) = value
                && !placed
            {
                out.push(Declaration {
                    name: name.clone(),
                    value: new_value.to_owned(),
                    important: false,
                });
                placed = true;
            }
            continue;
        }
        out.push(decl);
    }
    if let Some(new_value) = value
        && !placed
    {
        out.push(Declaration {
            name,
            value: new_value.to_owned(),
            important: false,
        });
    }
    Some(serialize_declarations(&out))
}
