//! API paths, relative to the configured API root.

pub const LOGIN: &str = "/auth/token/";
pub const TOKEN_REFRESH: &str = "/auth/token/refresh/";
pub const REGISTER: &str = "/auth/register/";
pub const USER: &str = "/auth/user/";
pub const PASSWORD_RESET_CONFIRM: &str = "/auth/password/reset/confirm/";

pub const PROPERTIES: &str = "/properties/";
pub const BOOKINGS: &str = "/bookings/";
pub const MY_BOOKINGS: &str = "/bookings/my-bookings/";
pub const HOST_BOOKINGS: &str = "/host/dashboard/my_bookings/";
pub const REVIEW_CREATE: &str = "/reviews/create/";
pub const HOST_REVIEWS: &str = "/host/dashboard/my_reviews/";
pub const HOST_DASHBOARD: &str = "/host/dashboard/";
pub const HOST_UNITS: &str = "/host/units/";

pub fn property(id: i64) -> String {
    format!("/properties/{id}/")
}

pub fn property_reviews(id: i64) -> String {
    format!("/properties/{id}/reviews/")
}

pub fn unit_availability(unit_id: i64) -> String {
    format!("/units/{unit_id}/availability/")
}

pub fn host_unit(unit_id: i64) -> String {
    format!("/host/units/{unit_id}/")
}

pub fn manage_booking(booking_id: i64) -> String {
    format!("/host/manage-bookings/{booking_id}/")
}

pub fn mark_review_read(review_id: i64) -> String {
    format!("/host/reviews/{review_id}/mark_as_read/")
}

/// Endpoints whose 401 means "bad credentials", never "stale token".
pub fn is_credential_endpoint(path: &str) -> bool {
    matches!(path, LOGIN | TOKEN_REFRESH | REGISTER | PASSWORD_RESET_CONFIRM)
}
