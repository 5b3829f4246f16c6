use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionModel {
    pub from_element_id: String,
    pub to_element_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationModel {
    pub id: String,
    #[serde(rename = "type")]
    pub relation_type: String,
    #[serde(default)]
    pub connections: Option<Vec<ConnectionModel>>,
}
