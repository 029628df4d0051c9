//! Extractors that reject bad input with the shared [`crate::ErrorResponse`] body.

pub mod object_id_path;
pub mod validated_json;

pub use object_id_path::ObjectIdPath;
pub use validated_json::ValidatedJson;
