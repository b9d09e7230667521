//! Request extractors that reject with [`crate::AppError`].

pub mod validated_json;

pub use validated_json::ValidatedJson;
