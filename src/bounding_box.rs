use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Axis-aligned box given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundingBoxCorners")]
pub struct BoundingBox {
    pub lower_left: [f64; 3],
    pub upper_right: [f64; 3],
}

impl BoundingBox {
    /// Build a box, rejecting corners with `lower_left >= upper_right` on any axis.
    pub fn new(lower_left: [f64; 3], upper_right: [f64; 3]) -> ModelResult<Self> {
        for axis in 0..3 {
            if !(lower_left[axis] < upper_right[axis]) {
                return Err(ModelError::Validation(format!(
                    "lower corner {:?} must be below upper corner {:?} on every axis (axis {} fails)",
                    lower_left, upper_right, axis
                )));
            }
        }
        Ok(BoundingBox {
            lower_left,
            upper_right,
        })
    }
}

#[derive(Deserialize)]
struct BoundingBoxCorners {
    lower_left: [f64; 3],
    upper_right: [f64; 3],
}

impl TryFrom<BoundingBoxCorners> for BoundingBox {
    type Error = ModelError;

    fn try_from(corners: BoundingBoxCorners) -> ModelResult<Self> {
        BoundingBox::new(corners.lower_left, corners.upper_right)
    }
}

/// Anything that can hand out the bounding box of the model geometry.
///
/// Implemented by a fixed [`BoundingBox`] and by the engine-backed
/// [`crate::geometry::GeometryBounds`] used during assembly.
pub trait BoundingBoxSource {
    fn bounding_box(&mut self) -> ModelResult<BoundingBox>;
}

impl BoundingBoxSource for BoundingBox {
    fn bounding_box(&mut self) -> ModelResult<BoundingBox> {
        Ok(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_checks_corners() {
        let bbox: BoundingBox = serde_json::from_value(serde_json::json!({
            "lower_left": [0.0, 0.0, 0.0],
            "upper_right": [1.0, 2.0, 3.0]
        }))
        .unwrap();
        assert_eq!(bbox.upper_right, [1.0, 2.0, 3.0]);

        let inverted = serde_json::from_value::<BoundingBox>(serde_json::json!({
            "lower_left": [1.0, 0.0, 0.0],
            "upper_right": [0.0, 2.0, 3.0]
        }));
        assert!(inverted.is_err());
    }

    #[test]
    fn test_inverted_corners_rejected() {
        let err = BoundingBox::new([10.0, 10.0, 10.0], [-10.0, -10.0, -10.0]).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }

    #[test]
    fn test_flat_axis_rejected() {
        assert!(BoundingBox::new([0.0, 0.0, 0.0], [1.0, 0.0, 1.0]).is_err());
    }

    #[test]
    fn test_fixed_box_is_a_source() {
        let mut bbox = BoundingBox::new([-1.0, -2.0, -3.0], [1.0, 2.0, 3.0]).unwrap();
        assert_eq!(bbox.bounding_box().unwrap(), bbox);
    }
}
