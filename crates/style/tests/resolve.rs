use dom::{Document, NodeKey};
use style::{Rgba, StyleResolver};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn doc_with_div(attrs: &[(&str, &str)]) -> (Document, NodeKey) {
    let mut doc = Document::new();
    let html = doc.create_element("html");
    let body = doc.create_element("body");
    let div = doc.create_element("div");
    doc.append_child(NodeKey::DOCUMENT, html).unwrap();
    doc.append_child(html, body).unwrap();
    doc.append_child(body, div).unwrap();
    for (name, value) in attrs {
        doc.set_attribute(div, name, value).unwrap();
    }
    (doc, div)
}

#[test]
fn inline_beats_rules() {
    init_logs();
    let resolver = StyleResolver::from_css("div { background-color: white }");
    let (doc, div) = doc_with_div(&[("style", "background-color: #101010")]);
    assert_eq!(
        resolver.background_color(&doc, div),
        Some(Rgba::opaque(0x10, 0x10, 0x10))
    );
}

#[test]
fn important_rules_beat_inline() {
    init_logs();
    let resolver = StyleResolver::from_css(".panel { background-color: #202020 !important }");
    let (doc, div) = doc_with_div(&[
        ("class", "panel"),
        ("style", "background-color: white"),
    ]);
    assert_eq!(
        resolver.background_color(&doc, div),
        Some(Rgba::opaque(0x20, 0x20, 0x20))
    );
}

#[test]
fn specificity_orders_the_cascade() {
    init_logs();
    let resolver = StyleResolver::from_css(
        "div { background-color: red }\n\
         .panel { background-color: green }\n\
         #main { background-color: #030303 }",
    );
    let (doc, div) = doc_with_div(&[("class", "panel"), ("id", "main")]);
    assert_eq!(
        resolver.background_color(&doc, div),
        Some(Rgba::opaque(3, 3, 3))
    );
}

#[test]
fn source_order_breaks_ties() {
    init_logs();
    let resolver = StyleResolver::from_css(
        ".a { background-color: red }\n.b { background-color: #040404 }",
    );
    let (doc, div) = doc_with_div(&[("class", "a b")]);
    assert_eq!(
        resolver.background_color(&doc, div),
        Some(Rgba::opaque(4, 4, 4))
    );
}

#[test]
fn shorthand_fallback_for_color_and_image() {
    init_logs();
    let resolver = StyleResolver::from_css("div { background: #111 url(texture.png) no-repeat }");
    let (doc, div) = doc_with_div(&[]);
    assert_eq!(
        resolver.background_color(&doc, div),
        Some(Rgba::opaque(0x11, 0x11, 0x11))
    );
    assert!(resolver.has_url_background(&doc, div));

    let longhand = StyleResolver::from_css(
        "div { background: #111 url(texture.png) } div { background-image: none }",
    );
    assert!(
        !longhand.has_url_background(&doc, div),
        "the background-image longhand shadows the shorthand"
    );
}

#[test]
fn unparsable_backgrounds_resolve_to_none() {
    init_logs();
    let resolver = StyleResolver::empty();
    let (doc, div) = doc_with_div(&[("style", "background-color: var(--panel)")]);
    assert_eq!(resolver.background_color(&doc, div), None);

    let (doc, div) = doc_with_div(&[]);
    assert_eq!(resolver.background_color(&doc, div), None);
    assert!(!resolver.has_url_background(&doc, div));
}

#[test]
fn non_elements_have_no_style() {
    init_logs();
    let resolver = StyleResolver::empty();
    let mut doc = Document::new();
    let text = doc.create_text("plain");
    assert_eq!(resolver.property(&doc, text, "background-color"), None);
    assert_eq!(resolver.property(&doc, NodeKey::DOCUMENT, "color"), None);
}
