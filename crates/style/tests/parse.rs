use style::{
    Rgba, declares_url_layer, parse_css_color, parse_selector_list, parse_style_attribute,
    parse_stylesheet, shorthand_color, split_layers, style_attribute_property,
    with_style_property,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn style_attribute_parsing_is_forgiving() {
    init_logs();
    let decls = parse_style_attribute("color: red; ;broken; Background-Color:#222 !important ;");
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].name, "color");
    assert_eq!(decls[0].value, "red");
    assert!(!decls[0].important);
    assert_eq!(decls[1].name, "background-color");
    assert_eq!(decls[1].value, "#222");
    assert!(decls[1].important);
}

#[test]
fn property_reads_take_the_last_declaration() {
    init_logs();
    let attr = "filter: invert(1); color: red; filter: none";
    assert_eq!(
        style_attribute_property(attr, "filter"),
        Some("none".to_string())
    );
    assert_eq!(style_attribute_property(attr, "display"), None);
}

#[test]
fn property_writes_suppress_no_ops() {
    init_logs();
    let updated = with_style_property("color: red", "filter", Some("invert(1)")).unwrap();
    assert_eq!(updated, "color: red; filter: invert(1)");

    assert_eq!(
        with_style_property(&updated, "filter", Some("invert(1)")),
        None,
        "re-writing the same value changes nothing"
    );
    assert_eq!(
        with_style_property("color: red", "filter", None),
        None,
        "removing an absent property changes nothing"
    );

    let cleared = with_style_property(&updated, "filter", None).unwrap();
    assert_eq!(cleared, "color: red");
}

#[test]
fn property_writes_update_in_place_and_collapse_duplicates() {
    init_logs();
    let attr = "filter: invert(1); color: red; filter: blur(1px)";
    let updated = with_style_property(attr, "filter", Some("none")).unwrap();
    assert_eq!(updated, "filter: none; color: red");
}

#[test]
fn selector_parsing_supports_compounds_only() {
    init_logs();
    let selectors = parse_selector_list("div, .dark, #main, *, nav.top.wide, body > div, a:hover");
    assert_eq!(selectors.len(), 5, "combinators and pseudos are dropped");
    assert_eq!(selectors[0].tag.as_deref(), Some("div"));
    assert_eq!(selectors[1].classes, vec!["dark".to_string()]);
    assert_eq!(selectors[2].id.as_deref(), Some("main"));
    assert!(selectors[3].tag.is_none() && selectors[3].classes.is_empty());
    assert_eq!(selectors[4].tag.as_deref(), Some("nav"));
    assert_eq!(selectors[4].classes.len(), 2);

    assert!(selectors[2].specificity() > selectors[1].specificity());
    assert!(selectors[1].specificity() > selectors[0].specificity());
    assert!(selectors[0].specificity() > selectors[3].specificity());
}

#[test]
fn stylesheet_parsing_skips_at_rules() {
    init_logs();
    let sheet = parse_stylesheet(
        "@media (min-width: 10px) { div { color: red } }\n\
         .panel { background-color: #111; color: white !important }\n\
         badrule;;\n\
         img { display: block }",
    );
    assert_eq!(sheet.rules.len(), 2);
    assert_eq!(sheet.rules[0].declarations.len(), 2);
    assert_eq!(sheet.rules[0].declarations[0].name, "background-color");
    assert_eq!(sheet.rules[0].declarations[0].value, "#111");
    assert!(sheet.rules[0].declarations[1].important);
    assert_eq!(sheet.rules[1].source_order, 1);
}

#[test]
fn color_parsing_covers_css_syntaxes() {
    init_logs();
    assert_eq!(
        parse_css_color("#102030"),
        Some(Rgba::opaque(0x10, 0x20, 0x30))
    );
    let rgba = parse_css_color("rgba(10, 10, 10, 0.5)").unwrap();
    assert!((rgba.red - 10.0).abs() < 0.5);
    assert!((rgba.alpha - 0.5).abs() < 0.01);
    let transparent = parse_css_color("transparent").unwrap();
    assert_eq!(transparent.alpha, 0.0);
    assert!(parse_css_color("inherit").is_none());
    assert!(parse_css_color("var(--bg)").is_none());
    assert!(parse_css_color("").is_none());
}

#[test]
fn background_layers_and_url_detection() {
    init_logs();
    let layers = split_layers("url(a.png), linear-gradient(rgb(0, 0, 0), white)");
    assert_eq!(layers.len(), 2, "function commas do not split layers");
    assert!(declares_url_layer("url(sprite.png)"));
    assert!(declares_url_layer("linear-gradient(red, blue), url(x)"));
    assert!(!declares_url_layer("none"));
    assert!(!declares_url_layer("linear-gradient(red, blue)"));
}

#[test]
fn shorthand_color_extraction() {
    init_logs();
    let color = shorthand_color("#161616 url(bg.png) no-repeat").unwrap();
    assert_eq!(color, Rgba::opaque(0x16, 0x16, 0x16));
    let color = shorthand_color("no-repeat center rgb(250, 250, 250)").unwrap();
    assert!((color.red - 250.0).abs() < 0.5);
    assert!(shorthand_color("url(bg.png) no-repeat").is_none());
}
