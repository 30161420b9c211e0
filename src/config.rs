//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and fixed backend identifiers used throughout the data layer.

// ===== Backend Collections =====

/// Collection holding rescue reports submitted by the public
pub const RESCUE_COLLECTION: &str = "rescues";
/// Collection holding adoption requests
pub const ADOPTION_COLLECTION: &str = "adoptions";
/// Collection holding donations
pub const DONATION_COLLECTION: &str = "donations";
/// Collection holding FAQ questions and their answers
pub const FAQ_COLLECTION: &str = "faqs";
/// Collection holding animals listed for adoption
pub const ANIMALS_COLLECTION: &str = "animals";
/// Collection holding per-account user profiles, keyed by auth uid
pub const USERS_COLLECTION: &str = "users";

// ===== Local Session Storage =====

/// Storage key for the single current-user JSON record
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Admin allow-list. An account whose email appears here is treated as
/// staff even when its profile document carries no `isAdmin` flag.
pub const ADMIN_EMAILS: &[&str] = &["admin@rescue.com", "admin@animalrescue.com"];

// ===== Image Attachments =====

/// Practical ceiling for inline image attachments (10 MB).
/// Encoded data URLs above this make documents unwieldy to fetch.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

// ===== Geolocation =====

/// How long to wait for a high-accuracy device position before giving up
pub const LOCATION_TIMEOUT_SECS: u64 = 15;

/// Reverse-geocoding endpoint (OpenStreetMap Nominatim)
pub const GEOCODE_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";

/// Zoom level requested from the geocoder; 18 resolves to building level
pub const GEOCODE_ZOOM: u8 = 18;

/// Client identifier header required by the Nominatim usage policy
pub const GEOCODE_USER_AGENT: &str = "AnimalRescueApp/1.0";

/// Decimal places used when rendering raw coordinates as text
pub const COORDINATE_PRECISION: usize = 8;
