pub mod cli;
pub mod config;
pub mod libpanel;

pub use libpanel::api::{ApiClient, HttpTransport, Transport};
pub use libpanel::error::{Error, Result};
pub use libpanel::sync::AdminPanel;
