use crate::stream::{PatternNodeError, PatternResult, SchemaNode};

/// Separator between components of a schema path such as `loadout__primary`.
pub const PATH_SEPARATOR: &str = "__";

impl SchemaNode {
	/// Address a descendant by the external names of its ancestors joined with `__`.
	pub fn resolve(&self, path: &str) -> PatternResult<&SchemaNode> {
		let components: Vec<&str> = path.split(PATH_SEPARATOR).collect();
		if path.is_empty() || components.iter().any(|component| component.is_empty()) {
			return Err(PatternNodeError::InvalidPath { path: path.to_owned() });
		}

		let mut node = self;
		let mut parent: Option<&str> = None;
		for component in components {
			let Some(fields) = node.fields() else {
				return Err(PatternNodeError::NotAStructure {
					path: path.to_owned(),
					component: parent.unwrap_or_default().to_owned(),
				});
			};
			node = fields.by_name(component).ok_or_else(|| PatternNodeError::NoSuchField {
				path: path.to_owned(),
				component: component.to_owned(),
			})?;
			parent = Some(component);
		}
		Ok(node)
	}
}
