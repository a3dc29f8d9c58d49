pub mod analysis;
pub mod annotation;
