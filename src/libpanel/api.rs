use crate::config::{ApiRoutes, ClientConfig};
use crate::libpanel::error::{Error, Result};
use crate::libpanel::model::{ContentBlock, Entity, ResourceKind};
use log::{debug, error};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Unencoded path segments; the transport encodes each one.
    pub segments: Vec<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can carry a request to the backend.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        (**self).send(request)
    }
}

pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("oge-admin/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn url_for(&self, segments: &[String]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.segments)?;
        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };
        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(ApiResponse { status, body })
    }
}

/// Typed operations over the REST routes.
pub struct ApiClient<T: Transport> {
    transport: T,
    routes: ApiRoutes,
}

impl ApiClient<HttpTransport> {
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(config)?, config.routes.clone()))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, routes: ApiRoutes) -> Self {
        Self { transport, routes }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn routes(&self) -> &ApiRoutes {
        &self.routes
    }

    fn segments(&self, kind: ResourceKind, id: Option<&str>) -> Vec<String> {
        let mut segments = self.routes.segments(kind);
        if let Some(id) = id {
            segments.push(id.to_string());
        }
        segments
    }

    fn request(&self, method: Method, segments: Vec<String>, body: Option<Value>) -> Result<ApiResponse> {
        let request = ApiRequest {
            method,
            segments,
            body,
        };
        let now = Instant::now();
        let response = self.transport.send(&request).inspect_err(|err| {
            error!("[API] {} {} failed: {}", method, request.path(), err);
        })?;
        debug!(
            "[API] {} {} -> {} in {} ms",
            method,
            request.path(),
            response.status,
            now.elapsed().as_millis()
        );
        if response.is_success() {
            Ok(response)
        } else {
            Err(Error::Status {
                method: method.to_string(),
                path: request.path(),
                status: response.status,
            })
        }
    }

    pub fn fetch<E: Entity>(&self) -> Result<E::Snapshot> {
        let response = self.request(Method::Get, self.segments(E::KIND, None), None)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub fn create<E: Entity, B: Serialize>(&self, body: &B) -> Result<()> {
        let body = serde_json::to_value(body)?;
        self.request(Method::Post, self.segments(E::KIND, None), Some(body))?;
        Ok(())
    }

    /// Full-document replace of one entity.
    pub fn replace<E: Entity>(&self, id: &str, entity: &E) -> Result<()> {
        let body = serde_json::to_value(entity)?;
        self.request(Method::Put, self.segments(E::KIND, Some(id)), Some(body))?;
        Ok(())
    }

    pub fn delete<E: Entity>(&self, id: &str) -> Result<()> {
        self.request(Method::Delete, self.segments(E::KIND, Some(id)), None)?;
        Ok(())
    }

    pub fn fetch_content(&self) -> Result<ContentBlock> {
        let response = self.request(Method::Get, self.segments(ResourceKind::Content, None), None)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub fn replace_content(&self, content: &ContentBlock) -> Result<()> {
        let body = serde_json::to_value(content)?;
        self.request(Method::Put, self.segments(ResourceKind::Content, None), Some(body))?;
        Ok(())
    }
}
