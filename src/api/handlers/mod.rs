//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod links;
pub mod qr;
pub mod redirect;
pub mod shorten;

pub use auth::{login_handler, logout_handler, me_handler, register_handler};
pub use health::health_handler;
pub use links::{delete_link_handler, list_links_handler};
pub use qr::{qr_download_handler, qr_image_handler, qr_info_handler};
pub use redirect::redirect_handler;
pub use shorten::create_link_handler;
