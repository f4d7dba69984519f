//! Urlencoded form extractor that reports rejections as [`AppError`].

use crate::errors::AppError;
use axum::{
    extract::{Form, FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

/// Form extractor whose rejections use the standard error body.
///
/// A missing field, a body that is not `application/x-www-form-urlencoded`,
/// or a body that fails to deserialize all produce `400 INVALID_FORM`.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::post;
/// use axum_helpers::extractors::FormFields;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Signup {
///     name: String,
///     email: String,
/// }
///
/// async fn signup(FormFields(form): FormFields<Signup>) -> String {
///     format!("Welcome {}", form.name)
/// }
///
/// let app = Router::new().route("/signup", post(signup));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FormFields<T>(pub T);

impl<T, S> FromRequest<S> for FormFields<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(FormFields(value))
    }
}
