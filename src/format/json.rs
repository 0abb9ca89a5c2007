//! JSON renderer

use crate::error::Result;
use crate::format::ViewRenderer;
use crate::view::View;

/// JSON renderer - outputs the full view as pretty-printed JSON
pub struct JsonRenderer;

impl ViewRenderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full view as JSON"
    }

    fn render(&self, view: &View) -> Result<String> {
        Ok(serde_json::to_string_pretty(view)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Suggestion;
    use crate::resolve::Resolution;
    use crate::widget::{WidgetOptions, WidgetState};

    #[test]
    fn test_json_render() {
        let state = WidgetState {
            input_text: "Par".to_string(),
            suggestions: vec![Suggestion::new("p3", "Paris, France").with_tags(["locality"])],
            interested: true,
            ..WidgetState::new()
        };
        let view = View::project(&state, Resolution::Unset, &WidgetOptions::default());

        let output = JsonRenderer.render(&view).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["input_text"], "Par");
        assert_eq!(parsed["dropdown_visible"], true);
        assert_eq!(parsed["rows"][0]["label"], "Paris, France");
        assert_eq!(parsed["location"]["state"], "unset");
    }

    #[test]
    fn test_json_renderer_info() {
        assert_eq!(JsonRenderer.name(), "json");
        assert!(!JsonRenderer.description().is_empty());
    }
}
