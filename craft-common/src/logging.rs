//! Log formatting for structured values.

use serde::Serialize;
use std::fmt;

/// Renders a serializable value as indented YAML on the lines after the
/// message, so resolved criteria and definitions stay readable in logs:
///
/// ```ignore
/// use craft_common::Pretty;
/// use tracing::trace;
///
/// trace!("resolved criteria: {}", Pretty(&criteria));
/// ```
///
/// Falls back to `{:#?}` when the value cannot be serialized.
pub struct Pretty<T>(pub T);

impl<T: Serialize + fmt::Debug> fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yaml = match serde_yaml::to_string(&self.0) {
            Ok(yaml) => yaml,
            Err(_) => return write!(f, "\n{:#?}", self.0),
        };
        for line in yaml.lines() {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

impl<T: Serialize + fmt::Debug> fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn criteria_render_as_indented_yaml() {
        let criteria = json!({
            "constraints": [
                {"attribute": "section", "comparison": {"op": "eq", "value": "news"}}
            ],
            "limit": 10
        });
        let rendered = Pretty(&criteria).to_string();

        assert!(rendered.starts_with('\n'));
        assert!(!rendered.ends_with('\n'));
        assert!(rendered.contains("\n  limit: 10"));
        assert!(rendered.contains("attribute: section"));
        assert!(rendered.lines().skip(1).all(|line| line.starts_with("  ")));
    }

    #[test]
    fn debug_matches_display() {
        let window = json!({"offset": 20, "limit": 10});
        assert_eq!(format!("{:?}", Pretty(&window)), Pretty(&window).to_string());
    }
}
