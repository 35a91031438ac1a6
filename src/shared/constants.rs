/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// UPLOAD CONSTANTS
// =============================================================================

/// Maximum accepted size for a single uploaded image (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Content types accepted for issue images and profile pictures
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Storage folder for issue images
pub const ISSUE_IMAGE_FOLDER: &str = "issue_images";

/// Storage folder for profile pictures
pub const PROFILE_PICTURE_FOLDER: &str = "profile_pictures";

// =============================================================================
// LISTING CONSTANTS
// =============================================================================

/// Number of issues returned by the recent activity feed
pub const RECENT_ACTIVITY_LIMIT: i64 = 5;

/// Number of comments listed by the my-comments endpoint
pub const MY_COMMENTS_LIMIT: i64 = 10;
