//! Render directives and the renderer they are handed to

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppResult;

/// A named template plus the data bag it is rendered with
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub template: String,
    pub data: Map<String, Value>,
}

impl View {
    pub fn new(template: impl Into<String>, title: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert("title".to_string(), Value::String(title.into()));
        Self {
            template: template.into(),
            data,
        }
    }

    /// Add a named value to the data bag
    pub fn with<T: Serialize + ?Sized>(mut self, key: impl Into<String>, value: &T) -> AppResult<Self> {
        self.data.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Merge a prepared set of values into the data bag
    pub fn extend(mut self, values: Map<String, Value>) -> Self {
        self.data.extend(values);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

/// Turns a template name and data bag into a response body
pub trait Renderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn render(&self, template: &str, data: &Map<String, Value>) -> AppResult<String>;
}

/// Renders views as `{"template": ..., "data": {...}}` for API clients and
/// client-side templating
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, template: &str, data: &Map<String, Value>) -> AppResult<String> {
        let body = serde_json::json!({
            "template": template,
            "data": data,
        });
        Ok(serde_json::to_string(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_data_bag() {
        let view = View::new("author_list", "Author List")
            .with("author_list", &vec!["Austen, Jane"])
            .unwrap();
        assert_eq!(view.get("title"), Some(&Value::from("Author List")));
        assert_eq!(view.get("author_list").unwrap()[0], "Austen, Jane");
    }

    #[test]
    fn test_json_renderer() {
        let view = View::new("genre_form", "Create Genre");
        let body = JsonRenderer.render(&view.template, &view.data).unwrap();
        let parsed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(parsed["template"], "genre_form");
        assert_eq!(parsed["data"]["title"], "Create Genre");
    }
}
