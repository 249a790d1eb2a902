use darkmode::{DarkModeConfig, Exemption, InvertedRegistry, enforce, evaluate};
use dom::{Document, NodeKey};
use style::StyleResolver;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn skeleton() -> (Document, NodeKey) {
    let mut doc = Document::new();
    let html = doc.create_element("html");
    doc.append_child(NodeKey::DOCUMENT, html).unwrap();
    let body = doc.create_element("body");
    doc.append_child(html, body).unwrap();
    (doc, body)
}

fn filter_of(doc: &Document, node: NodeKey) -> Option<String> {
    style::style_attribute_property(doc.attribute(node, "style").unwrap_or(""), "filter")
}

#[test]
fn media_tags_are_always_exempted() {
    init_logs();
    let (mut doc, body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::empty();

    for tag in ["img", "image", "canvas", "video", "iframe"] {
        let node = doc.create_element(tag);
        doc.append_child(body, node).unwrap();
        assert_eq!(
            evaluate(&doc, &styles, &config, node),
            Some(Exemption::MustRevert),
            "{tag} must always revert"
        );
    }
}

#[test]
fn containers_are_exempted_only_when_already_dark() {
    let (mut doc, body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::empty();

    let dark = doc.create_element("div");
    doc.append_child(body, dark).unwrap();
    doc.set_attribute(dark, "style", "background-color: #111")
        .unwrap();
    assert_eq!(
        evaluate(&doc, &styles, &config, dark),
        Some(Exemption::DarkBackground)
    );

    let light = doc.create_element("div");
    doc.append_child(body, light).unwrap();
    doc.set_attribute(light, "style", "background-color: #fafafa")
        .unwrap();
    assert_eq!(evaluate(&doc, &styles, &config, light), None);

    // Unknown backgrounds classify as light, so no exemption.
    let unknown = doc.create_element("section");
    doc.append_child(body, unknown).unwrap();
    doc.set_attribute(unknown, "style", "background-color: var(--panel)")
        .unwrap();
    assert_eq!(evaluate(&doc, &styles, &config, unknown), None);

    // A dark background on a non-container tag does not qualify.
    let span = doc.create_element("span");
    doc.append_child(body, span).unwrap();
    doc.set_attribute(span, "style", "background-color: #111")
        .unwrap();
    assert_eq!(evaluate(&doc, &styles, &config, span), None);
}

#[test]
fn url_backgrounds_exempt_any_tag() {
    let (mut doc, body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::empty();

    let span = doc.create_element("span");
    doc.append_child(body, span).unwrap();
    doc.set_attribute(span, "style", "background-image: url(tile.png)")
        .unwrap();
    assert_eq!(
        evaluate(&doc, &styles, &config, span),
        Some(Exemption::UrlBackground)
    );

    // A light container with an image background still needs exempting.
    let hero = doc.create_element("div");
    doc.append_child(body, hero).unwrap();
    doc.set_attribute(
        hero,
        "style",
        "background-color: #fff; background-image: url(hero.jpg)",
    )
    .unwrap();
    assert_eq!(
        evaluate(&doc, &styles, &config, hero),
        Some(Exemption::UrlBackground)
    );
}

#[test]
fn stylesheet_rules_feed_the_policy() {
    let (mut doc, body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::from_css(
        ".panel { background-color: #1b1b1b }
         .texture { background: #eee url(paper.png) repeat }",
    );

    let panel = doc.create_element("div");
    doc.append_child(body, panel).unwrap();
    doc.set_attribute(panel, "class", "panel").unwrap();
    assert_eq!(
        evaluate(&doc, &styles, &config, panel),
        Some(Exemption::DarkBackground)
    );

    let textured = doc.create_element("p");
    doc.append_child(body, textured).unwrap();
    doc.set_attribute(textured, "class", "texture").unwrap();
    assert_eq!(
        evaluate(&doc, &styles, &config, textured),
        Some(Exemption::UrlBackground)
    );
}

#[test]
fn the_root_element_is_never_exempted() {
    let (mut doc, _body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::empty();
    let root = doc.document_element().unwrap();
    // Even an image background on the root stays untouched; the page filter
    // lives there.
    doc.set_attribute(root, "style", "background-image: url(bg.png)")
        .unwrap();
    assert_eq!(evaluate(&doc, &styles, &config, root), None);
}

#[test]
fn enforce_applies_and_withdraws_the_exemption() {
    init_logs();
    let (mut doc, body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::from_css(".dark { background-color: #101418 }");
    let mut registry = InvertedRegistry::new();

    let div = doc.create_element("div");
    doc.append_child(body, div).unwrap();
    doc.set_attribute(div, "class", "dark").unwrap();

    let verdict = enforce(&mut doc, &styles, &mut registry, &config, true, div).unwrap();
    assert_eq!(verdict, Some(Exemption::DarkBackground));
    assert_eq!(filter_of(&doc, div).as_deref(), Some(config.counter_filter.as_str()));
    assert!(registry.contains(div));

    // Losing the dark class loses the exemption.
    doc.set_attribute(div, "class", "").unwrap();
    let verdict = enforce(&mut doc, &styles, &mut registry, &config, true, div).unwrap();
    assert_eq!(verdict, None);
    assert_eq!(filter_of(&doc, div), None);
    assert!(!registry.contains(div));
}

#[test]
fn enforce_is_idempotent_on_unchanged_elements() {
    let (mut doc, body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::empty();
    let mut registry = InvertedRegistry::new();

    let nav = doc.create_element("nav");
    doc.append_child(body, nav).unwrap();
    doc.set_attribute(nav, "style", "background-color: rgb(10, 10, 10)")
        .unwrap();

    let first = enforce(&mut doc, &styles, &mut registry, &config, true, nav).unwrap();
    assert_eq!(first, Some(Exemption::DarkBackground));
    let style_after_first = doc.attribute(nav, "style").map(str::to_owned);

    let second = enforce(&mut doc, &styles, &mut registry, &config, true, nav).unwrap();
    assert_eq!(second, first);
    assert_eq!(doc.attribute(nav, "style").map(str::to_owned), style_after_first);
    assert_eq!(registry.len(), 1);
    assert!(registry.contains(nav));
}

#[test]
fn enforce_leaves_author_filters_on_untracked_elements() {
    let (mut doc, body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::empty();
    let mut registry = InvertedRegistry::new();

    let span = doc.create_element("span");
    doc.append_child(body, span).unwrap();
    doc.set_attribute(span, "style", "filter: blur(2px)").unwrap();

    let verdict = enforce(&mut doc, &styles, &mut registry, &config, true, span).unwrap();
    assert_eq!(verdict, None);
    assert_eq!(filter_of(&doc, span).as_deref(), Some("blur(2px)"));
}

#[test]
fn enforce_skips_dead_and_detached_nodes() {
    let (mut doc, body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::empty();
    let mut registry = InvertedRegistry::new();

    let floating = doc.create_element("img");
    let verdict = enforce(&mut doc, &styles, &mut registry, &config, true, floating).unwrap();
    assert_eq!(verdict, None);
    assert!(registry.is_empty());

    let img = doc.create_element("img");
    doc.append_child(body, img).unwrap();
    doc.remove_node(img).unwrap();
    let verdict = enforce(&mut doc, &styles, &mut registry, &config, true, img).unwrap();
    assert_eq!(verdict, None);
    assert!(registry.is_empty());
}

#[test]
fn enforce_while_disabled_tracks_without_writing_filters() {
    let (mut doc, body) = skeleton();
    let config = DarkModeConfig::default();
    let styles = StyleResolver::empty();
    let mut registry = InvertedRegistry::new();

    let img = doc.create_element("img");
    doc.append_child(body, img).unwrap();
    let verdict = enforce(&mut doc, &styles, &mut registry, &config, false, img).unwrap();
    assert_eq!(verdict, Some(Exemption::MustRevert));
    assert!(registry.contains(img));
    assert_eq!(filter_of(&doc, img), None);
}
