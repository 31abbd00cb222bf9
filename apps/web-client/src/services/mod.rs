//! Typed calls for each API endpoint the client uses.

pub mod bookings;
pub mod host;
pub mod models;
pub mod profile;
pub mod properties;
pub mod reviews;

pub use models::{
    Booking, BookingUnit, HostProperties, HostSummary, Listing, Owner, PasswordResetConfirm,
    Property, PropertyDraft, PropertyRef, PropertySearch, PropertySummary, ProfileUpdate,
    Registration, Review, ReviewDraft, Unit, UnitDraft, UnitRef, UserProfile,
};
