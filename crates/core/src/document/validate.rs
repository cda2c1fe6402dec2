/// Validation of raw documents before they enter the offline store.
use serde_json::Value;
use thiserror::Error;

use super::model::{ContentKind, SlugField};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("document must be a JSON object")]
    NotAnObject,
    #[error("document _id is required")]
    MissingId,
    #[error("document _type is required")]
    MissingType,
    #[error("document _id cannot be empty")]
    EmptyId,
    #[error("document _type cannot be empty")]
    EmptyType,
    #[error("{kind} document {id} has no slug")]
    MissingSlug { id: String, kind: ContentKind },
}

/// Validate that a document has the minimum required fields.
pub fn validate_document_fields(
    id: Option<&str>,
    doc_type: Option<&str>,
) -> Result<(), ValidationError> {
    match id {
        None => return Err(ValidationError::MissingId),
        Some("") => return Err(ValidationError::EmptyId),
        _ => {}
    }
    match doc_type {
        None => return Err(ValidationError::MissingType),
        Some("") => return Err(ValidationError::EmptyType),
        _ => {}
    }
    Ok(())
}

/// Validate a raw document. Documents of a site content kind must also
/// carry a usable slug, since slugs are their lookup key.
pub fn validate_document(doc: &Value) -> Result<(), ValidationError> {
    let obj = doc.as_object().ok_or(ValidationError::NotAnObject)?;
    let id = obj.get("_id").and_then(Value::as_str);
    let doc_type = obj.get("_type").and_then(Value::as_str);
    validate_document_fields(id, doc_type)?;

    let Some(kind) = doc_type.and_then(ContentKind::from_type_name) else {
        return Ok(());
    };

    let has_slug = obj
        .get("slug")
        .cloned()
        .and_then(|raw| serde_json::from_value::<SlugField>(raw).ok())
        .is_some_and(|slug| slug.resolve().is_some());

    if has_slug {
        Ok(())
    } else {
        Err(ValidationError::MissingSlug {
            id: id.unwrap_or_default().to_string(),
            kind,
        })
    }
}
