use axum_test::multipart::{MultipartForm, Part};

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// PNG-signed payload of exactly `size` bytes. The service never decodes images,
/// so only the declared media type matters.
pub fn create_png(size: usize) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend((0..size.saturating_sub(PNG_SIGNATURE.len())).map(|i| (i % 251) as u8));
    data.truncate(size);
    data
}

/// JPEG-marked payload of exactly `size` bytes.
pub fn create_jpeg(size: usize) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
    data.resize(size.max(4), 0x42);
    data.truncate(size);
    data
}

/// Multipart form with a single part under `field`
pub fn form_with(field: &str, data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        field.to_string(),
        Part::bytes(data).file_name(file_name).mime_type(mime_type),
    )
}

/// Multipart form carrying `data` as the `thumbnail` part
pub fn thumbnail_form(data: Vec<u8>, mime_type: &str) -> MultipartForm {
    let file_name = match mime_type {
        "image/png" => "thumbnail.png",
        "image/jpeg" => "thumbnail.jpg",
        _ => "thumbnail.bin",
    };
    form_with("thumbnail", data, file_name, mime_type)
}
