//! Relations: typed groups of directed connections between elements.
//!
//! Connection handles are opaque anchor names from the diagram editor. Apart
//! from the "upward arrow" convention (see [`Connection::is_upward`]) they
//! only matter for rendering and are carried through untouched.

use std::{collections::HashSet, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    FlowtrackError, Result,
    model::{ConnectionModel, RelationModel},
    template::element::ElementId,
};

/// relation id
pub type RelationId = String;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RelationType {
    /// Unconditional sequential edge.
    #[default]
    Flow,
    /// Exclusive alternative branch point.
    Or,
    /// Parallel fork or join point.
    And,
    /// Artefact consumed by an element.
    In,
    /// Artefact produced by an element.
    Out,
}

impl RelationType {
    /// Only `or` and `and` relations are ever merged together.
    pub fn is_groupable(&self) -> bool {
        matches!(self, RelationType::Or | RelationType::And)
    }

    /// Artefact markers carry no ordering information.
    pub fn is_artefact_marker(&self) -> bool {
        matches!(self, RelationType::In | RelationType::Out)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from_element_id: ElementId,
    pub to_element_id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(
        from: impl Into<ElementId>,
        to: impl Into<ElementId>,
    ) -> Self {
        Self {
            from_element_id: from.into(),
            to_element_id: to.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_handles(
        mut self,
        source_handle: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.source_handle = Some(source_handle.into());
        self.target_handle = Some(target_handle.into());
        self
    }

    /// An edge drawn from a top anchor to a bottom anchor points upwards in
    /// the editor, so the logical dependency runs `to -> from`.
    ///
    /// This is a convention of the diagram editor, not a graph property.
    pub fn is_upward(&self) -> bool {
        let source_top = self.source_handle.as_deref().is_some_and(|h| h.contains("top"));
        let target_bottom = self.target_handle.as_deref().is_some_and(|h| h.contains("bottom"));
        source_top && target_bottom
    }

    /// Endpoints in logical dependency order `(predecessor, successor)`.
    pub fn logical_endpoints(&self) -> (&ElementId, &ElementId) {
        if self.is_upward() {
            (&self.to_element_id, &self.from_element_id)
        } else {
            (&self.from_element_id, &self.to_element_id)
        }
    }

    /// Swap endpoints together with their handles.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.from_element_id, &mut self.to_element_id);
        std::mem::swap(&mut self.source_handle, &mut self.target_handle);
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub id: RelationId,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Relation {
    pub fn new(
        id: impl Into<RelationId>,
        relation_type: RelationType,
        connections: Vec<Connection>,
    ) -> Self {
        Self {
            id: id.into(),
            relation_type,
            connections,
        }
    }

    /// Distinct source element ids, in first-appearance order.
    pub fn sources(&self) -> Vec<&ElementId> {
        let mut seen = HashSet::new();
        self.connections.iter().map(|c| &c.from_element_id).filter(|id| seen.insert(*id)).collect()
    }

    /// Distinct target element ids, in first-appearance order.
    pub fn targets(&self) -> Vec<&ElementId> {
        let mut seen = HashSet::new();
        self.connections.iter().map(|c| &c.to_element_id).filter(|id| seen.insert(*id)).collect()
    }

    pub fn source_set(&self) -> HashSet<&ElementId> {
        self.connections.iter().map(|c| &c.from_element_id).collect()
    }

    pub fn target_set(&self) -> HashSet<&ElementId> {
        self.connections.iter().map(|c| &c.to_element_id).collect()
    }
}

impl TryFrom<&ConnectionModel> for Connection {
    type Error = FlowtrackError;

    fn try_from(model: &ConnectionModel) -> Result<Self> {
        if model.from_element_id.is_empty() || model.to_element_id.is_empty() {
            return Err(FlowtrackError::Connection(format!(
                "connection {} -> {} has an empty endpoint",
                model.from_element_id, model.to_element_id
            )));
        }
        Ok(Self {
            from_element_id: model.from_element_id.clone(),
            to_element_id: model.to_element_id.clone(),
            source_handle: model.source_handle.clone(),
            target_handle: model.target_handle.clone(),
        })
    }
}

impl TryFrom<&RelationModel> for Relation {
    type Error = FlowtrackError;

    fn try_from(model: &RelationModel) -> Result<Self> {
        let relation_type = RelationType::from_str(&model.relation_type)
            .map_err(|_| FlowtrackError::Relation(format!("relation {} has invalid type '{}'", model.id, model.relation_type)))?;
        let connections = model.connections.iter().flatten().map(Connection::try_from).collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: model.id.clone(),
            relation_type,
            connections,
        })
    }
}

impl From<&Connection> for ConnectionModel {
    fn from(connection: &Connection) -> Self {
        Self {
            from_element_id: connection.from_element_id.clone(),
            to_element_id: connection.to_element_id.clone(),
            source_handle: connection.source_handle.clone(),
            target_handle: connection.target_handle.clone(),
        }
    }
}

impl From<&Relation> for RelationModel {
    fn from(relation: &Relation) -> Self {
        Self {
            id: relation.id.clone(),
            relation_type: relation.relation_type.as_ref().to_string(),
            connections: Some(relation.connections.iter().map(ConnectionModel::from).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_relation_type_names() {
        assert_eq!(RelationType::from_str("or").unwrap(), RelationType::Or);
        assert_eq!(RelationType::And.as_ref(), "and");
        assert!(RelationType::from_str("xor").is_err());
    }

    #[test]
    fn test_groupable_types() {
        assert!(RelationType::Or.is_groupable());
        assert!(RelationType::And.is_groupable());
        assert!(!RelationType::Flow.is_groupable());
        assert!(!RelationType::In.is_groupable());
        assert!(!RelationType::Out.is_groupable());
    }

    #[test]
    fn test_upward_connection() {
        let up = Connection::new("a", "b").with_handles("top-source", "bottom-target");
        assert!(up.is_upward());
        assert_eq!(up.logical_endpoints(), (&"b".to_string(), &"a".to_string()));

        let down = Connection::new("a", "b").with_handles("bottom-source", "top-target");
        assert!(!down.is_upward());
        assert!(!Connection::new("a", "b").is_upward());
    }

    #[test]
    fn test_reverse_swaps_handles() {
        let mut conn = Connection::new("a", "b").with_handles("right-source", "left-target");
        conn.reverse();
        assert_eq!(conn.from_element_id, "b");
        assert_eq!(conn.to_element_id, "a");
        assert_eq!(conn.source_handle.as_deref(), Some("left-target"));
        assert_eq!(conn.target_handle.as_deref(), Some("right-source"));
    }

    #[test]
    fn test_sources_keep_first_appearance_order() {
        let relation = Relation::new(
            "r1",
            RelationType::Or,
            vec![Connection::new("b", "x"), Connection::new("a", "x"), Connection::new("b", "y")],
        );
        assert_eq!(relation.sources(), vec!["b", "a"]);
        assert_eq!(relation.targets(), vec!["x", "y"]);
    }

    #[test]
    fn test_relation_from_model() {
        let model: RelationModel = serde_json::from_value(json!({
            "id": "r1",
            "type": "or",
            "connections": [{"fromElementId": "a", "toElementId": "b", "sourceHandle": "top-source"}]
        }))
        .unwrap();
        let relation = Relation::try_from(&model).unwrap();
        assert_eq!(relation.relation_type, RelationType::Or);
        assert_eq!(relation.connections[0].source_handle.as_deref(), Some("top-source"));
        assert_eq!(relation.connections[0].target_handle, None);
    }

    #[test]
    fn test_relation_from_model_null_connections() {
        let model: RelationModel = serde_json::from_value(json!({"id": "r1", "type": "flow", "connections": null})).unwrap();
        let relation = Relation::try_from(&model).unwrap();
        assert!(relation.connections.is_empty());
    }

    #[test]
    fn test_relation_from_model_invalid_type() {
        let model: RelationModel = serde_json::from_value(json!({"id": "r1", "type": "xor"})).unwrap();
        let err = Relation::try_from(&model).unwrap_err();
        assert!(matches!(err, FlowtrackError::Relation(_)));
    }

    #[test]
    fn test_connection_from_model_empty_endpoint() {
        let model = ConnectionModel {
            from_element_id: "a".to_string(),
            ..Default::default()
        };
        assert!(Connection::try_from(&model).is_err());
    }

    #[test]
    fn test_relation_serde_shape() {
        let relation = Relation::new("r1", RelationType::And, vec![Connection::new("a", "b").with_handles("s", "t")]);
        let value = serde_json::to_value(&relation).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "r1",
                "type": "and",
                "connections": [{"fromElementId": "a", "toElementId": "b", "sourceHandle": "s", "targetHandle": "t"}]
            })
        );
    }
}
