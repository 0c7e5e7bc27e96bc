pub mod api;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod multipart;
pub mod record;
pub mod resource;
pub mod response;

pub use client::{ApiClient, Auth, ClientConfig};
pub use error::ApiError;
pub use record::Record;
pub use resource::{ResourceDescriptor, ResourceKind};
pub use response::Page;
