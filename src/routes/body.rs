//! Body extractors that pick a decoder from the `Content-Type` header.

use crate::error::AppError;
use crate::models::SavePageRequest;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form, Json,
};
use serde::de::DeserializeOwned;

fn content_type_contains(headers: &HeaderMap, needle: &str) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains(needle))
        .unwrap_or(false)
}

/// JSON when the request says so, form-encoded otherwise.
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if content_type_contains(req.headers(), "application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(JsonOrForm(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(JsonOrForm(value))
        }
    }
}

/// JSON body decoded whatever the `Content-Type` says.
///
/// Unlike [`Json`], a missing header or an undecodable body is an
/// [`AppError::BadRequest`].
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let Json(value) =
            Json::<T>::from_bytes(&bytes).map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Body of a save request: JSON, form-encoded, or the raw text of any other
/// content type (saved to the default page).
pub struct SaveBody(pub SavePageRequest);

impl<S> FromRequest<S> for SaveBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers();
        if content_type_contains(headers, "application/json")
            || content_type_contains(headers, "application/x-www-form-urlencoded")
        {
            let JsonOrForm(body) = JsonOrForm::<SavePageRequest>::from_request(req, state).await?;
            return Ok(SaveBody(body));
        }

        let text = String::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok(SaveBody(SavePageRequest {
            page_id: None,
            content: Some(text),
        }))
    }
}
