use serde::{Deserialize, Serialize};

use crate::{
    FlowtrackError, Result,
    model::{ElementModel, RelationModel},
};

/// Template record as stored by the persistence layer: loosely typed, with
/// `elements` and `relations` allowed to be absent or null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_element_id: Option<String>,
    #[serde(default)]
    pub elements: Option<Vec<ElementModel>>,
    #[serde(default)]
    pub relations: Option<Vec<RelationModel>>,
}

impl TemplateModel {
    pub fn from_json(s: &str) -> Result<Self> {
        let template = serde_json::from_str::<TemplateModel>(s);
        match template {
            Ok(v) => Ok(v),
            Err(e) => Err(FlowtrackError::Template(format!("{}", e))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
