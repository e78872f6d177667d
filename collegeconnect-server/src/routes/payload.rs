//! Body extractor for `/add-update`, which accepts JSON, form posts from the
//! listing page, and JSON sent without a content type.
//!
//! | declared content type                | body                     | result                         |
//! |--------------------------------------|--------------------------|--------------------------------|
//! | contains `application/json`          | valid JSON object        | `Json`                         |
//! | contains `application/json`          | anything else            | 400 `Invalid JSON ...`         |
//! | `application/x-www-form-urlencoded`  | at least one field       | `Form`                         |
//! | `multipart/form-data`                | at least one field       | `Form`                         |
//! | other / none (or an empty form)      | empty                    | 400 `Empty request body`       |
//! | other / none                         | valid JSON object        | `Json`                         |
//! | other / none                         | not JSON                 | 415 `Invalid request format`   |

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use crate::error::ServerError;

const INVALID_JSON: &str = "Invalid JSON in request body";
const EMPTY_BODY: &str = "Empty request body";
const NOT_AN_OBJECT: &str = "Request body must be a JSON object";

/// How the body should be read, decided from the `Content-Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    DeclaredJson,
    Form,
    Multipart,
    Undeclared,
}

impl BodyKind {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
        if content_type.contains("application/json") {
            BodyKind::DeclaredJson
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            BodyKind::Form
        } else if content_type.starts_with("multipart/form-data") {
            BodyKind::Multipart
        } else {
            BodyKind::Undeclared
        }
    }
}

/// A submitted payload, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmittedPayload {
    Json(Map<String, Value>),
    /// Form fields, every value a JSON string.
    Form(Map<String, Value>),
}

impl SubmittedPayload {
    /// Form submissions come from the listing page and are answered with a
    /// redirect back to it.
    pub fn is_form(&self) -> bool {
        matches!(self, SubmittedPayload::Form(_))
    }

    pub fn into_fields(self) -> Map<String, Value> {
        match self {
            SubmittedPayload::Json(fields) | SubmittedPayload::Form(fields) => fields,
        }
    }
}

impl<S> FromRequest<S> for SubmittedPayload
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = BodyKind::from_content_type(
            req.headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        );

        match kind {
            BodyKind::DeclaredJson => {
                let bytes = read_body(req, state).await?;
                let value = serde_json::from_slice(&bytes)
                    .map_err(|_| ServerError::BadRequest(INVALID_JSON.to_owned()))?;
                Ok(SubmittedPayload::Json(expect_object(value)?))
            }
            BodyKind::Form => {
                let Form(fields) = Form::<BTreeMap<String, String>>::from_request(req, state)
                    .await
                    .map_err(|e| ServerError::BadRequest(e.body_text()))?;
                if fields.is_empty() {
                    return Err(ServerError::BadRequest(EMPTY_BODY.to_owned()));
                }
                Ok(SubmittedPayload::Form(
                    fields
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect(),
                ))
            }
            BodyKind::Multipart => {
                let fields = read_multipart(req, state).await?;
                if fields.is_empty() {
                    return Err(ServerError::BadRequest(EMPTY_BODY.to_owned()));
                }
                Ok(SubmittedPayload::Form(fields))
            }
            BodyKind::Undeclared => {
                let bytes = read_body(req, state).await?;
                if bytes.is_empty() {
                    return Err(ServerError::BadRequest(EMPTY_BODY.to_owned()));
                }
                let value =
                    serde_json::from_slice(&bytes).map_err(|_| ServerError::UnsupportedFormat)?;
                Ok(SubmittedPayload::Json(expect_object(value)?))
            }
        }
    }
}

async fn read_body<S: Send + Sync>(req: Request, state: &S) -> Result<Bytes, ServerError> {
    Bytes::from_request(req, state)
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))
}

/// Text of every named part. File uploads are read as text too.
async fn read_multipart<S: Send + Sync>(
    req: Request,
    state: &S,
) -> Result<Map<String, Value>, ServerError> {
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let mut fields = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let text = field
            .text()
            .await
            .map_err(|e| ServerError::BadRequest(e.body_text()))?;
        fields.insert(name, Value::String(text));
    }
    Ok(fields)
}

fn expect_object(value: Value) -> Result<Map<String, Value>, ServerError> {
    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(ServerError::BadRequest(NOT_AN_OBJECT.to_owned())),
    }
}
