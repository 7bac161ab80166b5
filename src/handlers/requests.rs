use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize};

use crate::error::ApiError;
use crate::validation::{parse_date, Fields};

/// `Json<T>` with malformed bodies reported as a plain-text 400
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Body of `POST /users` and `PUT /users/:Name`
#[derive(Debug, Default, Deserialize)]
pub struct UserBody {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Password")]
    pub password: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Birthday")]
    pub birthday: Option<String>,
}

impl UserBody {
    /// Only meaningful after validation has accepted the Birthday field
    pub fn birthday(&self) -> Option<NaiveDate> {
        self.birthday.as_deref().and_then(parse_date)
    }
}

impl Fields for UserBody {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "Name" => self.name.as_deref(),
            "Password" => self.password.as_deref(),
            "Email" => self.email.as_deref(),
            "Birthday" => self.birthday.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Password")]
    pub password: String,
}
