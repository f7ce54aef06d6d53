// Client configuration: where the backend lives and how its routes are laid out.

use crate::libpanel::error::Result;
use crate::libpanel::model::ResourceKind;
use clap::Args;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoutes {
    pub tests: String,
    pub news: String,
    pub content: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self {
            tests: "/api/tests".to_string(),
            news: "/api/news".to_string(),
            content: "/api/content".to_string(),
        }
    }
}

impl ApiRoutes {
    pub fn route(&self, kind: ResourceKind) -> &str {
        match kind {
            ResourceKind::Tests => &self.tests,
            ResourceKind::News => &self.news,
            ResourceKind::Content => &self.content,
        }
    }

    /// Path segments of the collection route, without empty parts.
    pub fn segments(&self, kind: ResourceKind) -> Vec<String> {
        self.route(kind)
            .split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub routes: ApiRoutes,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            routes: ApiRoutes::default(),
            timeout: None,
        })
    }
}

/// Backend options shared by both binaries.
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(short, long, env = "OGE_ADMIN_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    #[arg(long, default_value = "/api/tests")]
    pub tests_route: String,
    #[arg(long, default_value = "/api/news")]
    pub news_route: String,
    #[arg(long, default_value = "/api/content")]
    pub content_route: String,
    #[arg(long, value_name = "SECONDS")]
    pub timeout_secs: Option<u64>,
}

impl ServerArgs {
    pub fn into_config(self) -> Result<ClientConfig> {
        Ok(ClientConfig {
            base_url: Url::parse(&self.base_url)?,
            routes: ApiRoutes {
                tests: self.tests_route,
                news: self.news_route,
                content: self.content_route,
            },
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}
