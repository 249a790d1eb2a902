use std::collections::HashSet;

/// Fixed configuration data for the inversion engine: filter strings, tag
/// categories, and the persisted preference key. The defaults are the tuned
/// values the engine ships with; hosts may substitute their own sets.
#[derive(Debug, Clone)]
pub struct DarkModeConfig {
    /// Filter applied to the document root element while the effect is on.
    pub page_filter: String,
    /// Local compensation filter applied to exempted elements.
    pub counter_filter: String,
    /// Tags that are always exempted, regardless of background. Visual media
    /// must never be color-inverted.
    pub must_revert_tags: HashSet<String>,
    /// Container tags whose composited background color decides exemption.
    pub background_bearing_tags: HashSet<String>,
    /// Preference key read once at initialize and written on every toggle.
    pub preference_key: String,
}

impl Default for DarkModeConfig {
    fn default() -> Self {
        Self {
            page_filter: "invert(0.92) brightness(0.9) contrast(1.1)".to_string(),
            counter_filter: "invert(1) contrast(1.15) saturate(1.05)".to_string(),
            must_revert_tags: tag_set(&["img", "image", "canvas", "video", "iframe"]),
            background_bearing_tags: tag_set(&["div", "header", "footer", "nav", "section", "main"]),
            preference_key: "darkmode-toggle".to_string(),
        }
    }
}

impl DarkModeConfig {
    /// Union of both tag categories; this is the tag filter for the targeted
    /// subtree query over freshly inserted subtrees.
    pub fn category_tags(&self) -> HashSet<String> {
        self.must_revert_tags
            .union(&self.background_bearing_tags)
            .cloned()
            .collect()
    }
}

fn tag_set(tags: &[&str]) -> HashSet<String> {
    tags.iter().map(|tag| (*tag).to_string()).collect()
}
