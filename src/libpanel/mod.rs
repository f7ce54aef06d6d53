pub mod api;
pub mod duplicate;
pub mod error;
pub mod form;
pub mod model;
pub mod prompt;
pub mod sync;
pub mod transfer;
