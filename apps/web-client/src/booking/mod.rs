//! Booking draft, price/night arithmetic, availability and status rules.

pub mod availability;
pub mod draft;
pub mod pricing;
pub mod status;

pub use availability::{fetch_unavailable_dates, AvailabilityCalendar};
pub use draft::{BookingDraft, BookingRejection, BookingSubmission};
pub use pricing::{compute_nights, compute_total, Amount, ParseAmountError};
pub use status::BookingStatus;
