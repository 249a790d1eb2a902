//! CSS-side parsing and background resolution.
//! Covers the slice of CSS the inversion engine needs: inline style
//! attributes, a compact stylesheet/selector model, color values, and the
//! background properties that drive the light/dark decision.

mod background;
mod color;
mod declaration;
mod resolve;
mod selector;
mod stylesheet;

pub use background::{declares_url_layer, shorthand_color, split_layers};
pub use color::{Rgba, parse_css_color};
pub use declaration::{
    Declaration, parse_style_attribute, serialize_declarations, style_attribute_property,
    with_style_property,
};
pub use resolve::StyleResolver;
pub use selector::{Selector, parse_selector_list};
pub use stylesheet::{Rule, Stylesheet, parse_stylesheet};
