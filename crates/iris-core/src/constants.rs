/// Prefix for every object key written by the image store.
pub const IMAGE_KEY_PREFIX: &str = "images";

/// Filename used by presigned uploads when the client omits one.
pub const DEFAULT_PRESIGN_FILENAME: &str = "upload.jpg";

/// Content type used by presigned uploads when the client omits one.
pub const DEFAULT_PRESIGN_CONTENT_TYPE: &str = "image/jpeg";

/// Number of top label names copied onto an image record after analysis.
pub const MAX_AI_TAGS: usize = 5;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD_NAME: &str = "image";
