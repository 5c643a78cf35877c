/// Collection holding every notification document.
pub const NOTIFICATIONS_COLLECTION: &str = "notifications";

/// Collection holding per-user notification preferences.
pub const NOTIFICATION_PREFERENCES_COLLECTION: &str = "notification_preferences";

/// Database the notification service reads and writes.
pub const NOTIFICATION_SERVICE_DATABASE: &str = "sm_notification_service_db";

/// Database that stores root principals.
pub const ADMIN_DATABASE: &str = "admin";

/// Name of the index MongoDB creates on `_id` for every collection.
pub const DEFAULT_ID_INDEX: &str = "_id_";

/// Notifications older than 7 days are swept by the TTL monitor.
pub const NOTIFICATION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Server error codes the provisioner reacts to.
pub mod error_code {
    pub const UNAUTHORIZED: i32 = 13;
    pub const AUTHENTICATION_FAILED: i32 = 18;
    pub const NAMESPACE_NOT_FOUND: i32 = 26;
    pub const NAMESPACE_EXISTS: i32 = 48;
    pub const INDEX_OPTIONS_CONFLICT: i32 = 85;
    pub const INDEX_KEY_SPECS_CONFLICT: i32 = 86;
    pub const USER_ALREADY_EXISTS: i32 = 51003;
}
