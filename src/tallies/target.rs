use crate::error::{ModelError, ModelResult};
use serde_json::Value;
use std::fmt;

/// What a tally is restricted to, decided once from the declared target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// No target: the tally spans the whole geometry
    Geometry,
    /// A material, by tag
    Material(String),
    /// A cell (volume) of the geometry, by id
    Cell(u32),
}

impl Target {
    /// Type a declared target: `null` is the whole geometry, a string is a
    /// material tag and a non-negative integer is a cell id.
    ///
    /// # Errors
    /// * `ModelError::Validation` for a negative cell id
    /// * `ModelError::TypeKind` for any other JSON value
    pub fn from_value(value: &Value) -> ModelResult<Self> {
        match value {
            Value::Null => Ok(Target::Geometry),
            Value::String(tag) => Ok(Target::Material(tag.clone())),
            Value::Number(n) => {
                if let Some(id) = n.as_u64() {
                    u32::try_from(id).map(Target::Cell).map_err(|_| {
                        ModelError::Validation(format!("cell id {} is out of range", id))
                    })
                } else if n.as_i64().is_some() {
                    Err(ModelError::Validation(format!(
                        "cell id {} must not be negative",
                        n
                    )))
                } else {
                    Err(ModelError::TypeKind(format!(
                        "tally target {} is not an integer cell id",
                        n
                    )))
                }
            }
            other => Err(ModelError::TypeKind(format!(
                "tally target must be a material tag, a cell id or null, got {}",
                other
            ))),
        }
    }

    /// Prefix used in tally names, `None` for the whole geometry.
    pub fn name_prefix(&self) -> Option<String> {
        match self {
            Target::Geometry => None,
            Target::Material(tag) => Some(tag.clone()),
            Target::Cell(id) => Some(id.to_string()),
        }
    }
}

impl From<&str> for Target {
    fn from(tag: &str) -> Self {
        Target::Material(tag.to_string())
    }
}

impl From<u32> for Target {
    fn from(cell_id: u32) -> Self {
        Target::Cell(cell_id)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Geometry => f.write_str("whole geometry"),
            Target::Material(tag) => write!(f, "material '{}'", tag),
            Target::Cell(id) => write!(f, "cell {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typing_of_targets() {
        assert_eq!(Target::from_value(&Value::Null).unwrap(), Target::Geometry);
        assert_eq!(
            Target::from_value(&json!("tungsten")).unwrap(),
            Target::Material("tungsten".to_string())
        );
        assert_eq!(Target::from_value(&json!(2)).unwrap(), Target::Cell(2));
    }

    #[test]
    fn test_negative_cell_id_rejected() {
        let err = Target::from_value(&json!(-3)).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn test_other_kinds_rejected() {
        for value in [json!(1.5), json!(true), json!([1]), json!({"cell": 1})] {
            let err = Target::from_value(&value).unwrap_err();
            assert!(matches!(err, ModelError::TypeKind(_)), "{}", value);
        }
    }

    #[test]
    fn test_name_prefix() {
        assert_eq!(Target::Geometry.name_prefix(), None);
        assert_eq!(Target::Cell(2).name_prefix().as_deref(), Some("2"));
        assert_eq!(Target::from("lead").name_prefix().as_deref(), Some("lead"));
    }
}
