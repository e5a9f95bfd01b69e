use super::lenient::{blank_as_none, default_on_empty};
use super::name_map::Named;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_visible_in_header() -> bool {
    true
}

/// A state a subject can occupy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub color_inverted: bool,
    #[serde(default = "default_visible_in_header")]
    pub visible_in_header: bool,
    #[serde(default, deserialize_with = "default_on_empty")]
    pub permissions: Vec<PermissionRule>,
    #[serde(default, deserialize_with = "default_on_empty")]
    pub metadata: Map<String, Value>,
    /// Editor layout hint only.
    #[serde(default)]
    pub position_x: Option<f64>,
    /// Editor layout hint only.
    #[serde(default)]
    pub position_y: Option<f64>,
}

impl Place {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            title: None,
            color: None,
            color_inverted: false,
            visible_in_header: default_visible_in_header(),
            permissions: Vec::new(),
            metadata: Map::new(),
            position_x: None,
            position_y: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position_x = Some(x);
        self.position_y = Some(y);
        self
    }

    /// Same place with layout hints stripped.
    pub(crate) fn without_layout(&self) -> Self {
        Self {
            position_x: None,
            position_y: None,
            ..self.clone()
        }
    }
}

impl Named for Place {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// One entry of a place's permission table. Unset flags inherit Pimcore's defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modify: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unpublish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_layout: Option<Value>,
}
