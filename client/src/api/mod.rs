//! Typed calls per backend area, implemented as `ApiClient` methods.

pub mod admin;
pub mod auth;
pub mod hotels;
pub mod tickets;
pub mod visa;
pub mod worldcup;
