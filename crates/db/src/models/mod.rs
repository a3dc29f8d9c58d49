//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! database row, plus the `Deserialize` DTOs used to insert it.

pub mod analysis_result;
pub mod annotation_action;
pub mod detection;
pub mod review_session;
