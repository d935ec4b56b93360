use serde::{Deserialize, Serialize};

use scorefill_core::document::HighlightColor;

/// Knobs for filling a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillOptions {
    /// Marker color for tokens that survive filling.
    #[serde(default)]
    pub highlight: HighlightColor,

    /// Split "73rd" into "73" and a superscript "rd".
    #[serde(default = "default_true")]
    pub superscript_ordinals: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            highlight: HighlightColor::Yellow,
            superscript_ordinals: true,
        }
    }
}
