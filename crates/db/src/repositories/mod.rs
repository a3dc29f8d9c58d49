//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods suffixed `_in_tx` take an
//! open transaction so callers can compose several writes atomically.

pub mod analysis_result_repo;
pub mod annotation_action_repo;
pub mod detection_repo;
pub mod review_session_repo;

pub use analysis_result_repo::AnalysisResultRepo;
pub use annotation_action_repo::AnnotationActionRepo;
pub use detection_repo::DetectionRepo;
pub use review_session_repo::ReviewSessionRepo;
