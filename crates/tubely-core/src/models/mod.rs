pub mod thumbnail;
pub mod video;

pub use thumbnail::UploadedImage;
pub use video::{Video, VideoResponse};
