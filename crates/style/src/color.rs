use csscolorparser::Color as CssColor;

/// A resolved color: channels in [0,255], alpha in [0,1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Rgba {
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Fully opaque color from byte channels.
    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red as f32, green as f32, blue as f32, 1.0)
    }
}

/// Parse any CSS color syntax (+names) into an [`Rgba`].
///
/// Returns `None` for values the color parser rejects (`inherit`, `var()`
/// references, malformed functions); callers treat that as "no usable color".
pub fn parse_css_color(input: &str) -> Option<Rgba> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed: CssColor = trimmed.parse().ok()?;
    Some(Rgba::new(
        parsed.r * 255.0,
        parsed.g * 255.0,
        parsed.b * 255.0,
        parsed.a,
    ))
}
