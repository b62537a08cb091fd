/// Multipart field carrying the uploaded image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Route prefix for thumbnail uploads; the video id follows.
pub const THUMBNAIL_UPLOAD_ROUTE: &str = "/api/thumbnail_upload";

/// Route prefix under which the in-memory table is served.
pub const THUMBNAILS_ROUTE: &str = "/api/thumbnails";

/// Route prefix under which the assets directory is served.
pub const ASSETS_ROUTE: &str = "/assets";

/// Issuer claim stamped on and required from access tokens.
pub const TOKEN_ISSUER: &str = "tubely-access";

pub const DEFAULT_PORT: u16 = 8091;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;
pub const DEFAULT_ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png";
