pub mod health;
pub mod thumbnail_get;
pub mod thumbnail_upload;
