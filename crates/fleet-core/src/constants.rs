//! Fixed values of the evidence capture pipeline.

/// Maximum width of a normalized image, in pixels.
pub const MAX_IMAGE_WIDTH: u32 = 1200;

/// Maximum height of a normalized image, in pixels.
pub const MAX_IMAGE_HEIGHT: u32 = 1600;

/// Lossy quality factor used when re-encoding evidence photos (0.0 - 1.0).
pub const JPEG_QUALITY: f32 = 0.70;

/// MIME type of every normalized image.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Logical bucket holding evidence photos.
pub const EVIDENCE_BUCKET: &str = "fleet-evidence-photos";

/// Prefix under which evidence objects are stored inside the bucket.
pub const PUBLIC_KEY_PREFIX: &str = "public/";

/// Length of the random base36 suffix appended to storage keys.
pub const KEY_SUFFIX_LEN: usize = 7;

/// Placeholder tokens an update endpoint may carry for the record id.
pub const RECORD_ID_PLACEHOLDERS: [&str; 2] = ["{id}", ":id"];

/// Default raw photo size limit (phone cameras regularly exceed 10 MB).
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 25;
