//! End-to-end reconciliation: editor payload in, audit actions out.

use chrono::Utc;
use serde_json::json;

use flarenet_core::action::{ActionFields, ActionType};
use flarenet_core::aggregation::{summarize, STATUS_ANOMALIES, STATUS_NORMAL};
use flarenet_core::detection::MachineDetection;
use flarenet_core::geometry::BoundingBox;
use flarenet_core::policy::ReconcilePolicy;
use flarenet_core::reconcile::{reconcile, ReconcileReport};
use flarenet_core::review_payload::parse_review_payload;

fn hotspot() -> MachineDetection {
    MachineDetection {
        id: 1,
        label: "hotspot".to_string(),
        category: "anomaly".to_string(),
        severity: "Critical".to_string(),
        confidence: 0.9,
        bbox: BoundingBox::new(10, 10, 20, 20),
    }
}

fn run(detections: &[MachineDetection], payload: serde_json::Value) -> ReconcileReport {
    let annotations = parse_review_payload(&payload).unwrap();
    reconcile(
        42,
        Some(detections),
        &annotations,
        &ReconcilePolicy::default(),
        Utc::now(),
    )
    .unwrap()
}

#[test]
fn unchanged_detection_is_confirmed() {
    let detection = hotspot();
    let report = run(
        std::slice::from_ref(&detection),
        json!({"anomalies": [{
            "detectionId": 1,
            "bbox": {"x": 10, "y": 10, "width": 20, "height": 20},
            "severity": "Critical",
            "label": "hotspot",
            "edited": false
        }]}),
    );

    assert_eq!(report.actions.len(), 1);
    let action = &report.actions[0];
    assert_eq!(action.action_type, ActionType::Confirmed);
    assert_eq!(action.detection_id, Some(1));
    assert_eq!(action.original, Some(ActionFields::from_detection(&detection)));
    assert_eq!(action.new, None);
}

#[test]
fn severity_change_is_an_edit() {
    let report = run(
        &[hotspot()],
        json!({"anomalies": [{
            "detectionId": 1,
            "bbox": {"x": 10, "y": 10, "width": 20, "height": 20},
            "severity": "Potentially Faulty",
            "edited": true
        }]}),
    );

    assert_eq!(report.actions.len(), 1);
    let action = &report.actions[0];
    assert_eq!(action.action_type, ActionType::Edited);

    let original = action.original.as_ref().unwrap();
    let new = action.new.as_ref().unwrap();
    assert_eq!(original.severity.as_deref(), Some("Critical"));
    assert_eq!(new.severity.as_deref(), Some("Potentially Faulty"));
    assert_eq!(new.confidence, Some(1.0));
    assert_eq!(new.bbox, original.bbox);
    assert_eq!(new.label.as_deref(), Some("hotspot"));
}

#[test]
fn stray_box_produces_no_actions() {
    let report = run(
        &[hotspot()],
        json!({"anomalies": [{
            "bbox": {"x": 500, "y": 500, "width": 5, "height": 5},
            "isUserAdded": false,
            "isDeleted": false,
            "edited": false
        }]}),
    );

    assert!(report.actions.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.counts().total(), 0);
}

#[test]
fn mixed_session() {
    let detections = vec![
        hotspot(),
        MachineDetection {
            id: 2,
            severity: "Potentially Faulty".to_string(),
            bbox: BoundingBox::new(200, 200, 40, 40),
            ..hotspot()
        },
    ];

    let report = run(
        &detections,
        json!({"anomalies": [
            // Only the moved corner is sent; size comes from the detection.
            {"detectionId": 1, "bbox": {"x": 12.4, "y": 11.9}, "userEdited": true},
            {"detectionId": 2, "isDeleted": true},
            {"bbox": {"x": 300, "y": 40, "width": 15, "height": 15},
             "isUserAdded": true, "confidence": 0.3, "label": "joint"}
        ]}),
    );

    let types: Vec<ActionType> = report.actions.iter().map(|a| a.action_type).collect();
    assert_eq!(
        types,
        vec![ActionType::Edited, ActionType::Deleted, ActionType::Added]
    );

    let edited = report.actions[0].new.as_ref().unwrap();
    assert_eq!(edited.bbox.x, Some(12));
    assert_eq!(edited.bbox.y, Some(11));
    assert_eq!(edited.bbox.width, Some(20));
    assert_eq!(edited.bbox.height, Some(20));

    let added = report.actions[2].new.as_ref().unwrap();
    assert_eq!(added.confidence, Some(1.0));
    assert_eq!(added.label.as_deref(), Some("joint"));
    assert_eq!(report.actions[2].detection_id, None);
}

#[test]
fn summary_reflects_detections_only() {
    let empty = summarize(&[]);
    assert_eq!(empty.status, STATUS_NORMAL);
    assert_eq!(empty.total_detections, 0);

    let detections = vec![
        hotspot(),
        MachineDetection {
            id: 2,
            severity: "Potentially Faulty".to_string(),
            ..hotspot()
        },
        MachineDetection {
            id: 3,
            severity: "Normal".to_string(),
            ..hotspot()
        },
    ];
    let summary = summarize(&detections);
    assert_eq!(summary.status, STATUS_ANOMALIES);
    assert_eq!(summary.total_detections, 3);
    assert_eq!(summary.critical_count, 1);
    assert_eq!(summary.potentially_faulty_count, 1);
}
