use tracing::info;

use super::models::{Booking, Listing, Property, Unit};
use super::properties::is_owner;
use crate::booking::{BookingDraft, BookingRejection};
use crate::error::ClientError;
use crate::http::endpoints;
use crate::http::AuthPipeline;
use crate::session::SessionContext;

/// Fallback shown when the API rejects a booking without a readable reason.
pub const BOOKING_FAILED_MESSAGE: &str = "Booking failed. Please check your selections.";

/// Validate `draft` locally, then `POST /bookings/`.
///
/// Every local rejection happens before any request is sent.
pub async fn create_booking(
    session: &SessionContext,
    property: &Property,
    unit: &Unit,
    draft: &BookingDraft,
) -> Result<Booking, ClientError> {
    let Some(user) = session.user() else {
        return Err(ClientError::Unauthorized {
            detail: Some("Please log in to book this unit.".to_string()),
        });
    };
    if is_owner(Some(&user), property) {
        return Err(BookingRejection::OwnUnit.into());
    }
    let submission = draft.validate(unit.price_per_night, unit.max_guests)?;

    let booking: Booking = session
        .api()
        .post_json(endpoints::BOOKINGS, &submission)
        .await?;
    info!(
        booking_id = booking.id,
        unit_id = submission.unit_id,
        nights = submission.nights,
        total = %submission.total,
        "booking created"
    );
    Ok(booking)
}

/// Bookings made by the signed-in user.
pub async fn my_bookings(api: &AuthPipeline) -> Result<Vec<Booking>, ClientError> {
    let listing: Listing<Booking> = api.get_json(endpoints::MY_BOOKINGS).await?;
    Ok(listing.into_items())
}
