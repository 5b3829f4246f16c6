mod element;
mod relation;
mod template;

pub use element::ElementModel;
pub use relation::{ConnectionModel, RelationModel};
pub use template::TemplateModel;
