use crate::background::{declares_url_layer, shorthand_color};
use crate::color::{Rgba, parse_css_color};
use crate::declaration::parse_style_attribute;
use crate::stylesheet::{Stylesheet, parse_stylesheet};
use dom::{Document, NodeKey};
use std::collections::{HashMap, HashSet};

/// Reference to one selector of one rule.
#[derive(Debug, Clone, Copy)]
struct RuleRef {
    rule: usize,
    selector: usize,
}

/// Cascade position of one declaration: important beats normal, inline beats
/// rules at equal importance, then specificity, source order, and position
/// within the block. Larger keys win.
type CascadeKey = (bool, bool, u32, u32, u32);

/// Answers effective background properties for document elements.
///
/// Rules are bucketed by their most specific simple feature (id, then first
/// class, then tag, then universal) so lookups only touch plausibly matching
/// selectors, and the inline `style` attribute participates as the most
/// specific non-important source.
#[derive(Debug, Default)]
pub struct StyleResolver {
    stylesheet: Stylesheet,
    by_id: HashMap<String, Vec<RuleRef>>,
    by_class: HashMap<String, Vec<RuleRef>>,
    by_tag: HashMap<String, Vec<RuleRef>>,
    universal: Vec<RuleRef>,
}

impl StyleResolver {
    /// Build the bucket index for a parsed stylesheet.
    pub fn new(stylesheet: Stylesheet) -> Self {
        let mut resolver = Self {
            stylesheet,
            ..Self::default()
        };
        for (rule_index, rule) in resolver.stylesheet.rules.iter().enumerate() {
            for (selector_index, selector) in rule.selectors.iter().enumerate() {
                let rule_ref = RuleRef {
                    rule: rule_index,
                    selector: selector_index,
                };
                if let Some(id) = &selector.id {
                    resolver.by_id.entry(id.clone()).or_default().push(rule_ref);
                } else if let Some(class) = selector.classes.first() {
                    resolver
                        .by_class
                        .entry(class.clone())
                        .or_default()
                        .push(rule_ref);
                } else if let Some(tag) = &selector.tag {
                    resolver
                        .by_tag
                        .entry(tag.clone())
                        .or_default()
                        .push(rule_ref);
                } else {
                    resolver.universal.push(rule_ref);
                }
            }
        }
        resolver
    }

    /// Resolver with no author rules; inline styles still apply.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse CSS text and build a resolver over it.
    pub fn from_css(css: &str) -> Self {
        Self::new(parse_stylesheet(css))
    }

    /// Number of indexed author rules.
    pub fn rule_count(&self) -> usize {
        self.stylesheet.rules.len()
    }

    /// Effective value of one property for `node`, after cascade.
    pub fn property(&self, doc: &Document, node: NodeKey, name: &str) -> Option<String> {
        let tag = doc.tag(node)?;
        let id = doc.attribute(node, "id");
        let classes: HashSet<String> = doc
            .attribute(node, "class")
            .map(|value| value.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();

        let mut best: Option<(CascadeKey, String)> = None;
        let mut consider = |key: CascadeKey, value: &str| {
            if best.as_ref().is_none_or(|(top, _)| key >= *top) {
                best = Some((key, value.to_owned()));
            }
        };

        for rule_ref in self.candidates(tag, id, &classes) {
            let rule = &self.stylesheet.rules[rule_ref.rule];
            let selector = &rule.selectors[rule_ref.selector];
            if !selector.matches(tag, id, &classes) {
                continue;
            }
            for (index, decl) in rule.declarations.iter().enumerate() {
                if decl.name == name {
                    consider(
                        (
                            decl.important,
                            false,
                            selector.specificity(),
                            rule.source_order,
                            index as u32,
                        ),
                        &decl.value,
                    );
                }
            }
        }

        if let Some(attr) = doc.attribute(node, "style") {
            for (index, decl) in parse_style_attribute(attr).iter().enumerate() {
                if decl.name == name {
                    consider(
                        (decl.important, true, u32::MAX, u32::MAX, index as u32),
                        &decl.value,
                    );
                }
            }
        }

        best.map(|(_, value)| value)
    }

    /// Effective background color, consulting the `background` shorthand when
    /// the longhand is absent. Unparsable values resolve to `None`.
    pub fn background_color(&self, doc: &Document, node: NodeKey) -> Option<Rgba> {
        if let Some(value) = self.property(doc, node, "background-color") {
            return parse_css_color(&value);
        }
        self.property(doc, node, "background")
            .and_then(|value| shorthand_color(&value))
    }

    /// Effective background-image text: the longhand if declared, otherwise
    /// the shorthand when it carries a `url(...)` layer.
    pub fn background_image(&self, doc: &Document, node: NodeKey) -> Option<String> {
        self.property(doc, node, "background-image").or_else(|| {
            self.property(doc, node, "background")
                .filter(|value| declares_url_layer(value))
        })
    }

    /// Whether the element's effective background declares a raster layer.
    pub fn has_url_background(&self, doc: &Document, node: NodeKey) -> bool {
        self.background_image(doc, node)
            .is_some_and(|value| declares_url_layer(&value))
    }

    fn candidates(
        &self,
        tag: &str,
        id: Option<&str>,
        classes: &HashSet<String>,
    ) -> Vec<RuleRef> {
        let mut out = Vec::new();
        if let Some(id) = id
            && let Some(refs) = self.by_id.get(id)
        {
            out.extend_from_slice(refs);
        }
        for class in classes {
            if let Some(refs) = self.by_class.get(class) {
                out.extend_from_slice(refs);
            }
        }
        if let Some(refs) = self.by_tag.get(tag) {
            out.extend_from_slice(refs);
        }
        out.extend_from_slice(&self.universal);
        out
    }
}
