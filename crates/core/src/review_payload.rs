//! Parsing of the reviewer editor's save payload.
//!
//! The editor posts `{ "anomalies": [ ... ] }`. The document shape is
//! validated strictly; individual fields are read leniently, so a field with
//! an unexpected type is treated as absent rather than rejecting the item.

use serde_json::{Map, Value};

use crate::annotation::ReviewerAnnotation;
use crate::error::CoreError;
use crate::geometry::PartialBoundingBox;

/// Maximum number of annotation items accepted in one save.
pub const MAX_ANNOTATIONS_PER_IMAGE: usize = 500;

/// Top-level key holding the annotation array.
pub const ANOMALIES_KEY: &str = "anomalies";

/// Parse a save payload into reviewer annotations, preserving item order.
pub fn parse_review_payload(json: &Value) -> Result<Vec<ReviewerAnnotation>, CoreError> {
    let root = json.as_object().ok_or_else(|| {
        CoreError::Validation("annotation payload must be a JSON object".to_string())
    })?;

    let items = root
        .get(ANOMALIES_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "annotation payload is missing the '{ANOMALIES_KEY}' array"
            ))
        })?;

    if items.len() > MAX_ANNOTATIONS_PER_IMAGE {
        return Err(CoreError::Validation(format!(
            "{ANOMALIES_KEY} has {} elements, maximum is {MAX_ANNOTATIONS_PER_IMAGE}",
            items.len()
        )));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_object().map(parse_item).ok_or_else(|| {
                CoreError::Validation(format!("{ANOMALIES_KEY}[{i}] must be a JSON object"))
            })
        })
        .collect()
}

fn parse_item(obj: &Map<String, Value>) -> ReviewerAnnotation {
    ReviewerAnnotation {
        detection_id: obj.get("detectionId").and_then(Value::as_i64),
        bbox: obj.get("bbox").and_then(Value::as_object).and_then(parse_bbox),
        label: read_string(obj, "label"),
        category: read_string(obj, "category"),
        severity: read_string(obj, "severity"),
        confidence: obj
            .get("confidence")
            .and_then(Value::as_f64)
            .filter(|c| (0.0..=1.0).contains(c)),
        is_user_added: read_flag(obj, "isUserAdded"),
        is_deleted: read_flag(obj, "isDeleted"),
        edited: read_flag(obj, "edited") || read_flag(obj, "userEdited"),
        edited_at: read_string(obj, "editedAt"),
        edited_by: read_string(obj, "editedBy"),
        edit_reason: read_string(obj, "editReason"),
    }
}

/// `None` when no coordinate could be read.
fn parse_bbox(obj: &Map<String, Value>) -> Option<PartialBoundingBox> {
    let bbox = PartialBoundingBox {
        x: read_coord(obj.get("x")),
        y: read_coord(obj.get("y")),
        width: read_coord(obj.get("width")),
        height: read_coord(obj.get("height")),
    };
    (!bbox.is_empty()).then_some(bbox)
}

/// Integer coordinate. Fractional editor coordinates are truncated toward
/// zero; anything outside `i32` is treated as absent.
fn read_coord(value: Option<&Value>) -> Option<i32> {
    let value = value?;
    if let Some(n) = value.as_i64() {
        return i32::try_from(n).ok();
    }
    let f = value.as_f64()?.trunc();
    (f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX)).then_some(f as i32)
}

fn read_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn read_flag(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_item() {
        let json = json!({
            "anomalies": [{
                "detectionId": 12,
                "bbox": {"x": 10, "y": 20, "width": 30, "height": 40},
                "label": "hotspot",
                "category": "anomaly",
                "severity": "Critical",
                "confidence": 0.87,
                "isUserAdded": false,
                "isDeleted": false,
                "edited": true,
                "editedAt": "2025-10-02T09:14:00Z",
                "editedBy": "reviewer-1",
                "editReason": "box too small"
            }]
        });

        let items = parse_review_payload(&json).unwrap();
        assert_eq!(items.len(), 1);
        let ann = &items[0];
        assert_eq!(ann.detection_id, Some(12));
        assert_eq!(
            ann.bbox,
            Some(PartialBoundingBox {
                x: Some(10),
                y: Some(20),
                width: Some(30),
                height: Some(40),
            })
        );
        assert_eq!(ann.severity.as_deref(), Some("Critical"));
        assert_eq!(ann.confidence, Some(0.87));
        assert!(ann.is_edited());
        assert_eq!(ann.edited_by.as_deref(), Some("reviewer-1"));
        assert_eq!(ann.edit_reason.as_deref(), Some("box too small"));
    }

    #[test]
    fn empty_anomalies_array_accepted() {
        let items = parse_review_payload(&json!({"anomalies": []})).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn payload_must_be_an_object() {
        let err = parse_review_payload(&json!([])).unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[test]
    fn missing_anomalies_rejected() {
        let err = parse_review_payload(&json!({"status": "Anomalies"})).unwrap_err();
        assert!(err.to_string().contains("missing the 'anomalies' array"));
    }

    #[test]
    fn non_object_item_rejected() {
        let err = parse_review_payload(&json!({"anomalies": [1]})).unwrap_err();
        assert!(err.to_string().contains("anomalies[0] must be a JSON object"));
    }

    #[test]
    fn oversized_batch_rejected() {
        let items: Vec<Value> = (0..MAX_ANNOTATIONS_PER_IMAGE + 1).map(|_| json!({})).collect();
        let err = parse_review_payload(&json!({ "anomalies": items })).unwrap_err();
        assert!(err.to_string().contains("maximum is"));
    }

    #[test]
    fn fractional_coordinates_truncate() {
        let json = json!({"anomalies": [{
            "bbox": {"x": 10.9, "y": -3.7, "width": 50.0, "height": 49.99}
        }]});
        let bbox = parse_review_payload(&json).unwrap()[0].bbox.unwrap();
        assert_eq!(bbox.x, Some(10));
        assert_eq!(bbox.y, Some(-3));
        assert_eq!(bbox.width, Some(50));
        assert_eq!(bbox.height, Some(49));
    }

    #[test]
    fn malformed_fields_become_absent() {
        let json = json!({"anomalies": [{
            "detectionId": "12",
            "bbox": {"x": "ten", "y": 5, "width": 1e12, "height": null},
            "label": 42,
            "confidence": 3.5,
            "isDeleted": "yes"
        }]});

        let ann = &parse_review_payload(&json).unwrap()[0];
        assert_eq!(ann.detection_id, None);
        assert_eq!(
            ann.bbox,
            Some(PartialBoundingBox {
                x: None,
                y: Some(5),
                width: None,
                height: None,
            })
        );
        assert_eq!(ann.label, None);
        assert_eq!(ann.confidence, None);
        assert!(!ann.is_deleted);
    }

    #[test]
    fn bbox_without_readable_coordinates_is_absent() {
        let json = json!({"anomalies": [{"bbox": {"left": 1}}, {"bbox": "10,10,5,5"}]});
        let items = parse_review_payload(&json).unwrap();
        assert_eq!(items[0].bbox, None);
        assert_eq!(items[1].bbox, None);
    }

    #[test]
    fn user_edited_flag_is_an_edit_marker() {
        let json = json!({"anomalies": [{"userEdited": true}, {"editedAt": "2025-10-02"}, {}]});
        let items = parse_review_payload(&json).unwrap();
        assert!(items[0].is_edited());
        assert!(items[1].is_edited());
        assert!(!items[2].is_edited());
    }

    #[test]
    fn flags_default_to_false() {
        let ann = &parse_review_payload(&json!({"anomalies": [{}]})).unwrap()[0];
        assert!(!ann.is_user_added);
        assert!(!ann.is_deleted);
    }
}
