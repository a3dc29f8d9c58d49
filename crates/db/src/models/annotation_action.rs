//! Annotation action model.
//!
//! Rows are written once per reconciled annotation and never updated.

use flarenet_core::action::{ActionFields, ActionType, AnnotationAction};
use flarenet_core::error::CoreError;
use flarenet_core::geometry::PartialBoundingBox;
use flarenet_core::types::{DbId, ImageId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `annotation_actions` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnnotationActionRow {
    pub id: DbId,
    pub review_session_id: DbId,
    pub image_id: ImageId,
    pub detection_id: Option<DbId>,
    pub action_type: String,

    pub original_label: Option<String>,
    pub original_category: Option<String>,
    pub original_severity: Option<String>,
    pub original_confidence: Option<f64>,
    pub original_bbox_x: Option<i32>,
    pub original_bbox_y: Option<i32>,
    pub original_bbox_width: Option<i32>,
    pub original_bbox_height: Option<i32>,

    pub new_label: Option<String>,
    pub new_category: Option<String>,
    pub new_severity: Option<String>,
    pub new_confidence: Option<f64>,
    pub new_bbox_x: Option<i32>,
    pub new_bbox_y: Option<i32>,
    pub new_bbox_width: Option<i32>,
    pub new_bbox_height: Option<i32>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AnnotationActionRow {
    fn original_fields(&self) -> Option<ActionFields> {
        let fields = ActionFields {
            label: self.original_label.clone(),
            category: self.original_category.clone(),
            severity: self.original_severity.clone(),
            confidence: self.original_confidence,
            bbox: PartialBoundingBox {
                x: self.original_bbox_x,
                y: self.original_bbox_y,
                width: self.original_bbox_width,
                height: self.original_bbox_height,
            },
        };
        (!fields.is_empty()).then_some(fields)
    }

    fn new_fields(&self) -> Option<ActionFields> {
        let fields = ActionFields {
            label: self.new_label.clone(),
            category: self.new_category.clone(),
            severity: self.new_severity.clone(),
            confidence: self.new_confidence,
            bbox: PartialBoundingBox {
                x: self.new_bbox_x,
                y: self.new_bbox_y,
                width: self.new_bbox_width,
                height: self.new_bbox_height,
            },
        };
        (!fields.is_empty()).then_some(fields)
    }
}

impl TryFrom<AnnotationActionRow> for AnnotationAction {
    type Error = CoreError;

    fn try_from(row: AnnotationActionRow) -> Result<Self, Self::Error> {
        Ok(AnnotationAction {
            action_type: ActionType::from_str(&row.action_type)?,
            detection_id: row.detection_id,
            original: row.original_fields(),
            new: row.new_fields(),
            created_at: row.created_at,
        })
    }
}

/// Number of stored actions of one type for an image.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ActionTypeCount {
    pub action_type: String,
    pub count: i64,
}
