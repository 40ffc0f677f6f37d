use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::auth::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::auth::repo::{PublicUser, Role};
use crate::client::session::Session;
use crate::error::{Envelope, FieldError};
use crate::movies::dto::{MoviePayload, MovieWithCreator};

/// Failure surfaced to the UI. Every failed call is terminal; there is no
/// retry or queueing layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success envelope.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("response envelope carried no data")]
    MissingData,
}

/// Thin client over the catalog's HTTP API. The session travels with the
/// client; the request layer attaches the bearer token whenever one is
/// installed.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    pub session: Session,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_session(base_url, Session::new())
    }

    /// Bootstrap with a persisted session, e.g. a token cached from a
    /// previous run. Follow up with [`refresh_profile`](Self::refresh_profile).
    pub fn with_session(base_url: impl Into<String>, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        self.send_envelope(req).await?.data.ok_or(ClientError::MissingData)
    }

    /// For endpoints whose success payload is `null` (delete).
    async fn send_unit(&self, req: RequestBuilder) -> Result<(), ClientError> {
        self.send_envelope::<serde_json::Value>(req).await.map(|_| ())
    }

    async fn send_envelope<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let response = self.authorize(req).send().await?;
        let status = response.status().as_u16();
        let envelope: Envelope<T> = response.json().await?;
        if envelope.success {
            Ok(envelope)
        } else {
            Err(ClientError::Api {
                status,
                message: envelope.message,
                errors: envelope.errors.unwrap_or_default(),
            })
        }
    }

    // --- auth ---

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<PublicUser, ClientError> {
        let body = RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role,
        };
        let auth: AuthResponse = self
            .send(self.http.post(self.url("/api/auth/register")).json(&body))
            .await?;
        self.session.install(auth.token, auth.user.clone());
        Ok(auth.user)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<PublicUser, ClientError> {
        let body = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let auth: AuthResponse = self
            .send(self.http.post(self.url("/api/auth/login")).json(&body))
            .await?;
        self.session.install(auth.token, auth.user.clone());
        Ok(auth.user)
    }

    pub fn logout(&mut self) {
        self.session.clear();
    }

    /// Re-fetches the caller's profile; on failure the cached profile is
    /// kept so the UI can keep rendering the last known identity.
    pub async fn refresh_profile(&mut self) {
        let refreshed: Result<PublicUser, ClientError> =
            self.send(self.http.get(self.url("/api/auth/me"))).await;
        self.session.apply_refresh(refreshed);
    }

    // --- movies ---

    pub async fn movies(&self) -> Result<Vec<MovieWithCreator>, ClientError> {
        self.send(self.http.get(self.url("/api/movies"))).await
    }

    pub async fn movies_sorted(
        &self,
        sort_by: &str,
        order: &str,
    ) -> Result<Vec<MovieWithCreator>, ClientError> {
        let req = self
            .http
            .get(self.url("/api/movies/sorted"))
            .query(&[("sortBy", sort_by), ("order", order)]);
        self.send(req).await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<MovieWithCreator>, ClientError> {
        let req = self
            .http
            .get(self.url("/api/movies/search"))
            .query(&[("query", query)]);
        self.send(req).await
    }

    pub async fn movie(&self, id: Uuid) -> Result<MovieWithCreator, ClientError> {
        self.send(self.http.get(self.url(&format!("/api/movies/{id}"))))
            .await
    }

    pub async fn create_movie(
        &self,
        payload: &MoviePayload,
    ) -> Result<MovieWithCreator, ClientError> {
        self.send(self.http.post(self.url("/api/movies")).json(payload))
            .await
    }

    pub async fn update_movie(
        &self,
        id: Uuid,
        payload: &MoviePayload,
    ) -> Result<MovieWithCreator, ClientError> {
        self.send(
            self.http
                .put(self.url(&format!("/api/movies/{id}")))
                .json(payload),
        )
        .await
    }

    pub async fn delete_movie(&self, id: Uuid) -> Result<(), ClientError> {
        self.send_unit(self.http.delete(self.url(&format!("/api/movies/{id}"))))
            .await
    }
}
