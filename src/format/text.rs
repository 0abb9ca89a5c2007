//! Human-readable text renderer

use crate::error::Result;
use crate::format::ViewRenderer;
use crate::view::View;

/// Text renderer - the field on one line, then the open dropdown rows
pub struct TextRenderer;

impl ViewRenderer for TextRenderer {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Text field and dropdown, human readable"
    }

    fn render(&self, view: &View) -> Result<String> {
        let mut output = String::new();

        if view.display_value.is_empty() {
            output.push_str(&format!("[ ({}) ]\n", view.placeholder));
        } else {
            output.push_str(&format!("[ {} ]\n", view.display_value));
        }

        if view.dropdown_visible {
            for row in &view.rows {
                let marker = if row.active { '>' } else { ' ' };
                output.push_str(&format!("{} {}. {}", marker, row.index + 1, row.label));
                if !row.classes.is_empty() {
                    output.push_str(&format!("  ({})", row.classes.join(" ")));
                }
                output.push('\n');
            }
        }

        output.push_str(&format!("location: {}\n", view.location));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::geo::Suggestion;
    use crate::resolve::Resolution;
    use crate::widget::{WidgetOptions, WidgetState};

    fn state() -> WidgetState {
        WidgetState {
            input_text: "10 Down".to_string(),
            suggestions: vec![
                Suggestion::new("p1", "10 Downing Street, London").with_tags(["route"]),
                Suggestion::new("p6", "Downtown, Los Angeles"),
            ],
            active: Some(0),
            interested: true,
            ..WidgetState::new()
        }
    }

    #[test]
    fn test_text_render_open() {
        let view = View::project(&state(), Resolution::Unset, &WidgetOptions::default());
        let output = TextRenderer.render(&view).unwrap();

        assert_eq!(
            output,
            "[ 10 Downing Street, London ]\n\
             > 1. 10 Downing Street, London  (route active)\n\
             \x20 2. Downtown, Los Angeles\n\
             location: unset\n"
        );
    }

    #[test]
    fn test_text_render_closed_with_placeholder() {
        let mut state = WidgetState::new();
        state.suggestions = self::state().suggestions;
        let location = Resolution::Resolved(Coordinates::new(51.5034, -0.1276));
        let view = View::project(&state, location, &WidgetOptions::default());
        let output = TextRenderer.render(&view).unwrap();

        assert_eq!(output, "[ (Which place?) ]\nlocation: 51.503400, -0.127600\n");
    }

    #[test]
    fn test_text_renderer_info() {
        assert_eq!(TextRenderer.name(), "text");
        assert!(!TextRenderer.description().is_empty());
    }
}
