use reqwest::{multipart, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::models::{
    Artist, ArtistProfile, AuthResponse, Booking, Event, ImageUploaded, LoginRequest,
    MessageResponse, MyBooking, NewCatalogBooking, NewDirectRequest, NewEvent, ProfileUpdate,
    RegisterRequest,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Login required")]
    NotAuthenticated,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|status| status.as_u16()),
            ClientError::NotAuthenticated => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// HTTP client bound to one API origin. Holds the session token once
/// logged in and attaches it to protected calls.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(Client::new(), base_url)
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub fn auth(&mut self) -> AuthRepository<'_> {
        AuthRepository { client: self }
    }

    pub fn artists(&self) -> ArtistRepository<'_> {
        ArtistRepository { client: self }
    }

    pub fn events(&self) -> EventRepository<'_> {
        EventRepository { client: self }
    }

    pub fn bookings(&self) -> BookingRepository<'_> {
        BookingRepository { client: self }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

pub struct AuthRepository<'a> {
    client: &'a mut ApiClient,
}

impl AuthRepository<'_> {
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let builder = self
            .client
            .request(Method::POST, "/api/auth/register")
            .json(request);
        let response: AuthResponse = ApiClient::send(builder).await?;
        self.client.set_token(response.token.clone());
        Ok(response)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let builder = self
            .client
            .request(Method::POST, "/api/auth/login")
            .json(&body);
        let response: AuthResponse = ApiClient::send(builder).await?;
        self.client.set_token(response.token.clone());
        Ok(response)
    }
}

pub struct ArtistRepository<'a> {
    client: &'a ApiClient,
}

impl ArtistRepository<'_> {
    pub async fn list(&self) -> Result<Vec<Artist>, ClientError> {
        ApiClient::send(self.client.request(Method::GET, "/api/artists")).await
    }

    pub async fn get(&self, id: i64) -> Result<Artist, ClientError> {
        ApiClient::send(self.client.request(Method::GET, &format!("/api/artists/{id}"))).await
    }

    pub async fn events(&self, id: i64) -> Result<Vec<Event>, ClientError> {
        ApiClient::send(
            self.client
                .request(Method::GET, &format!("/api/artists/{id}/events")),
        )
        .await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<ArtistProfile, ClientError> {
        let builder = self
            .client
            .authorized(Method::PUT, "/api/artists/profile")?
            .json(update);
        ApiClient::send(builder).await
    }

    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<ImageUploaded, ClientError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new().part("image", part);
        let builder = self
            .client
            .authorized(Method::POST, "/api/artists/upload-image")?
            .multipart(form);
        ApiClient::send(builder).await
    }
}

pub struct EventRepository<'a> {
    client: &'a ApiClient,
}

impl EventRepository<'_> {
    pub async fn list(&self) -> Result<Vec<Event>, ClientError> {
        ApiClient::send(self.client.request(Method::GET, "/api/events")).await
    }

    pub async fn create(&self, event: &NewEvent) -> Result<Event, ClientError> {
        let builder = self.client.authorized(Method::POST, "/api/events")?.json(event);
        ApiClient::send(builder).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
        let builder = self
            .client
            .authorized(Method::DELETE, &format!("/api/events/{id}"))?;
        ApiClient::send(builder).await
    }
}

pub struct BookingRepository<'a> {
    client: &'a ApiClient,
}

impl BookingRepository<'_> {
    pub async fn create(&self, booking: &NewCatalogBooking) -> Result<Booking, ClientError> {
        let builder = self
            .client
            .authorized(Method::POST, "/api/bookings")?
            .json(booking);
        ApiClient::send(builder).await
    }

    pub async fn request(&self, request: &NewDirectRequest) -> Result<Booking, ClientError> {
        let builder = self
            .client
            .authorized(Method::POST, "/api/bookings/requests")?
            .json(request);
        ApiClient::send(builder).await
    }

    pub async fn mine(&self) -> Result<Vec<MyBooking>, ClientError> {
        ApiClient::send(
            self.client
                .authorized(Method::GET, "/api/bookings/my-bookings")?,
        )
        .await
    }
}
