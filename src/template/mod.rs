pub mod element;
pub mod relation;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    FlowtrackError, Result,
    model::{ElementModel, RelationModel, TemplateModel},
};

pub use element::{Element, ElementId, ElementType, MAX_DURATION_DAYS};
pub use relation::{Connection, Relation, RelationId, RelationType};

/// A flow template (or a running flow's copy of one) as seen by the
/// normalization and scheduling code.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlowTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_element_id: Option<ElementId>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl FlowTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_starting_element(
        mut self,
        id: impl Into<ElementId>,
    ) -> Self {
        self.starting_element_id = Some(id.into());
        self
    }

    pub fn with_elements(
        mut self,
        elements: Vec<Element>,
    ) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_relations(
        mut self,
        relations: Vec<Relation>,
    ) -> Self {
        self.relations = relations;
        self
    }

    pub fn element(
        &self,
        id: &str,
    ) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// All connections across relations, in relation order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.relations.iter().flat_map(|r| r.connections.iter())
    }
}

impl TryFrom<&TemplateModel> for FlowTemplate {
    type Error = FlowtrackError;

    fn try_from(model: &TemplateModel) -> Result<Self> {
        let elements = model.elements.iter().flatten().map(Element::try_from).collect::<Result<Vec<_>>>()?;

        let mut ids = HashSet::new();
        for element in elements.iter() {
            if !ids.insert(element.id.as_str()) {
                return Err(FlowtrackError::Template(format!("template {} has duplicate element {}", model.id, element.id)));
            }
        }

        let relations = model.relations.iter().flatten().map(Relation::try_from).collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: model.id.clone(),
            name: model.name.clone(),
            starting_element_id: model.starting_element_id.clone().filter(|id| !id.is_empty()),
            elements,
            relations,
        })
    }
}

impl TryFrom<TemplateModel> for FlowTemplate {
    type Error = FlowtrackError;

    fn try_from(model: TemplateModel) -> Result<Self> {
        FlowTemplate::try_from(&model)
    }
}

impl From<&FlowTemplate> for TemplateModel {
    fn from(template: &FlowTemplate) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            starting_element_id: template.starting_element_id.clone(),
            elements: Some(template.elements.iter().map(ElementModel::from).collect()),
            relations: Some(template.relations.iter().map(RelationModel::from).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE_JSON: &str = r#"{
        "id": "tpl-1",
        "name": "Onboarding",
        "startingElementId": "start",
        "elements": [
            {"id": "start", "name": "Start", "type": "state"},
            {"id": "a", "name": "Prepare", "type": "action", "durationDays": 3},
            {"id": "doc", "name": "Contract", "type": "artefact", "durationDays": 5}
        ],
        "relations": [
            {"id": "r1", "type": "flow", "connections": [{"fromElementId": "start", "toElementId": "a"}]},
            {"id": "r2", "type": "out", "connections": [{"fromElementId": "a", "toElementId": "doc"}]}
        ]
    }"#;

    #[test]
    fn test_template_from_json() {
        let model = TemplateModel::from_json(TEMPLATE_JSON).unwrap();
        let template = FlowTemplate::try_from(&model).unwrap();

        assert_eq!(template.starting_element_id.as_deref(), Some("start"));
        assert_eq!(template.elements.len(), 3);
        assert_eq!(template.element("a").unwrap().duration_days, 3);
        // artefacts never carry a duration
        assert_eq!(template.element("doc").unwrap().duration_days, 0);
        assert_eq!(template.relations[1].relation_type, RelationType::Out);
        assert_eq!(template.connections().count(), 2);
    }

    #[test]
    fn test_template_missing_collections() {
        let model = TemplateModel::from_json(r#"{"id": "tpl-1", "elements": null}"#).unwrap();
        let template = FlowTemplate::try_from(model).unwrap();
        assert!(template.elements.is_empty());
        assert!(template.relations.is_empty());
        assert_eq!(template.starting_element_id, None);
    }

    #[test]
    fn test_template_empty_starting_element() {
        let model = TemplateModel::from_json(r#"{"id": "tpl-1", "startingElementId": ""}"#).unwrap();
        let template = FlowTemplate::try_from(model).unwrap();
        assert_eq!(template.starting_element_id, None);
    }

    #[test]
    fn test_template_invalid_element_type() {
        let json = r#"{"id": "tpl-1", "elements": [{"id": "a", "name": "A", "type": "gateway"}]}"#;
        let model = TemplateModel::from_json(json).unwrap();
        let err = FlowTemplate::try_from(model).unwrap_err();
        assert!(matches!(err, FlowtrackError::Element(_)));
    }

    #[test]
    fn test_template_negative_duration() {
        let json = r#"{"id": "tpl-1", "elements": [{"id": "a", "name": "A", "type": "action", "durationDays": -2}]}"#;
        let model = TemplateModel::from_json(json).unwrap();
        assert!(FlowTemplate::try_from(model).is_err());
    }

    #[test]
    fn test_template_duplicate_element() {
        let json = r#"{"id": "tpl-1", "elements": [
            {"id": "a", "name": "A", "type": "state"},
            {"id": "a", "name": "B", "type": "state"}
        ]}"#;
        let model = TemplateModel::from_json(json).unwrap();
        let err = FlowTemplate::try_from(model).unwrap_err();
        assert!(matches!(err, FlowtrackError::Template(_)));
    }

    #[test]
    fn test_template_malformed_json() {
        let err = TemplateModel::from_json("{\"id\": ").unwrap_err();
        assert!(matches!(err, FlowtrackError::Template(_)));
    }

    #[test]
    fn test_template_model_round_trip() {
        let model = TemplateModel::from_json(TEMPLATE_JSON).unwrap();
        let template = FlowTemplate::try_from(&model).unwrap();
        let back = TemplateModel::from(&template);
        assert_eq!(FlowTemplate::try_from(&back).unwrap(), template);
        assert!(back.to_json().unwrap().contains("\"fromElementId\":\"start\""));
    }
}
