use super::error::ModelError;
use super::projection::Projection;
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateType {
    File,   // Path to an mmCIF file
    Inline, // mmCIF text embedded in the document
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::File => "mmcifPath",
            TemplateType::Inline => "mmcif",
        }
    }
}

impl FromStr for TemplateType {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mmcifPath" => Ok(TemplateType::File),
            "mmcif" => Ok(TemplateType::Inline),
            _ => Err(ModelError::ParseTemplateType(s.to_string())),
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural template for a protein sequence.
///
/// `query_indices[i]` of the query maps onto `template_indices[i]` of the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub template_type: TemplateType,
    pub mmcif: String,
    pub query_indices: Vec<u32>,
    pub template_indices: Vec<u32>,
}

impl Template {
    pub fn new(
        template_type: TemplateType,
        mmcif: impl Into<String>,
        query_indices: Vec<u32>,
        template_indices: Vec<u32>,
    ) -> Self {
        Self {
            template_type,
            mmcif: mmcif.into(),
            query_indices,
            template_indices,
        }
    }
}

impl Projection for Template {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            self.template_type.as_str().to_string(),
            Value::String(self.mmcif.clone()),
        );
        map.insert("queryIndices".to_string(), json!(self.query_indices));
        map.insert("templateIndices".to_string(), json!(self.template_indices));
        Value::Object(map)
    }
}
