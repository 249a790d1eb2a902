//! Background color classification. Colors are composited over a white page
//! backdrop first, so translucent darks read as the light pixels a viewer
//! would actually see.

use style::Rgba;

/// Classification threshold on the perceived-luminance scale (0..255).
pub const LIGHT_THRESHOLD: f32 = 127.5;

/// Composite a color over an opaque white backdrop:
/// `channel' = (1 - a) * 255 + a * channel`.
pub fn composite_over_white(color: Rgba) -> (f32, f32, f32) {
    let alpha = color.alpha.clamp(0.0, 1.0);
    let blend = |channel: f32| (1.0 - alpha) * 255.0 + alpha * channel;
    (blend(color.red), blend(color.green), blend(color.blue))
}

/// Weighted perceived luminance of composited channels.
pub fn perceived_luminance(red: f32, green: f32, blue: f32) -> f32 {
    (0.299 * red * red + 0.587 * green * green + 0.114 * blue * blue).sqrt()
}

/// Whether a background counts as "light". An absent or unparsable color
/// classifies as light: when the background cannot be determined the global
/// invert is assumed tolerable, so no counter-filter is applied.
pub fn classify_light(color: Option<Rgba>) -> bool {
    let Some(color) = color else {
        return true;
    };
    let (red, green, blue) = composite_over_white(color);
    perceived_luminance(red, green, blue) > LIGHT_THRESHOLD
}
