//! Flow elements: the nodes of a template graph.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{FlowtrackError, Result, model::ElementModel};

/// element id
pub type ElementId = String;

/// Longest accepted action duration, roughly forty years of workdays.
pub const MAX_DURATION_DAYS: u32 = 10_000;

/// Kind of a flow element. Only actions take time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ElementType {
    #[default]
    Action,
    State,
    Artefact,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// element id
    pub id: ElementId,
    /// display name
    pub name: String,
    /// element kind
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// duration in workdays, only meaningful for actions
    #[serde(default)]
    pub duration_days: u32,
}

impl Element {
    pub fn new(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        element_type: ElementType,
        duration_days: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            element_type,
            duration_days,
        }
    }

    pub fn action(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        duration_days: u32,
    ) -> Self {
        Self::new(id, name, ElementType::Action, duration_days)
    }

    pub fn state(
        id: impl Into<ElementId>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(id, name, ElementType::State, 0)
    }

    pub fn artefact(
        id: impl Into<ElementId>,
        name: impl Into<String>,
    ) -> Self {
        Self::new(id, name, ElementType::Artefact, 0)
    }

    pub fn is_action(&self) -> bool {
        self.element_type == ElementType::Action
    }

    /// Scheduling duration: states and artefacts are instantaneous.
    pub fn effective_duration(&self) -> u32 {
        if self.is_action() { self.duration_days } else { 0 }
    }
}

impl TryFrom<&ElementModel> for Element {
    type Error = FlowtrackError;

    fn try_from(model: &ElementModel) -> Result<Self> {
        if model.id.is_empty() {
            return Err(FlowtrackError::Element(format!("element '{}' has an empty id", model.name)));
        }
        let element_type = ElementType::from_str(&model.element_type)
            .map_err(|_| FlowtrackError::Element(format!("element {} has invalid type '{}'", model.id, model.element_type)))?;

        let duration_days = match model.duration_days {
            None => 0,
            Some(d) if d < 0 => {
                return Err(FlowtrackError::Element(format!("element {} has negative duration {}", model.id, d)));
            }
            Some(d) if d > i64::from(MAX_DURATION_DAYS) => {
                return Err(FlowtrackError::Element(format!("element {} duration {} exceeds {} days", model.id, d, MAX_DURATION_DAYS)));
            }
            Some(d) => u32::try_from(d).map_err(|_| FlowtrackError::Element(format!("element {} duration {} is out of range", model.id, d)))?,
        };

        Ok(Self {
            id: model.id.clone(),
            name: model.name.clone(),
            element_type,
            duration_days: if element_type == ElementType::Action { duration_days } else { 0 },
        })
    }
}

impl From<&Element> for ElementModel {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.clone(),
            name: element.name.clone(),
            element_type: element.element_type.as_ref().to_string(),
            duration_days: element.is_action().then_some(i64::from(element.duration_days)),
        }
    }
}
