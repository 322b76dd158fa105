// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - full read access and may change request status
pub const ROLE_ADMIN: &str = "admin";

/// Volunteer role - helps coordinate donations, same request rights as donors
pub const ROLE_VOLUNTEER: &str = "volunteer";

/// Donor role - can browse open requests and submit new ones
pub const ROLE_DONOR: &str = "donor";

// =============================================================================
// DISPLAY FALLBACKS
// =============================================================================

/// Shown when a request has no patient name
pub const UNKNOWN_PATIENT: &str = "Unknown patient";

/// Shown when a request has no (or an unrecognized) blood group
pub const UNKNOWN_BLOOD_GROUP: &str = "Unknown";

/// Filter value that disables the donor "open requests" default
pub const STATUS_FILTER_ALL: &str = "all";
