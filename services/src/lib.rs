pub mod admin;
pub mod app;
pub mod edit_form;
pub mod error;
pub mod guard;
pub mod hotels;
pub mod list;
pub mod modal;
pub mod payment;
pub mod redeem;
pub mod session;
pub mod tab;
pub mod visa;
pub mod worldcup;

pub use error::FlowError;
