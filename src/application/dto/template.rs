use serde::Serialize;
use serde_json::Value;

use crate::domain::entities::Template;
use crate::domain::value_objects::ItemType;

#[derive(Debug, Serialize)]
pub struct TemplateDto {
    pub id: ItemType,
    pub title: String,
    pub fields: Vec<String>,
    pub skeleton: Value,
}

impl From<Template> for TemplateDto {
    fn from(template: Template) -> Self {
        Self {
            id: template.kind,
            title: template.title.to_string(),
            fields: template.fields(),
            skeleton: template.skeleton(),
        }
    }
}
