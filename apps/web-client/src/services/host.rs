//! Host dashboard: listings, units, incoming bookings and guest reviews.

use serde_json::json;
use tracing::info;

use super::models::{
    Booking, HostProperties, HostSummary, Listing, Property, Review, Unit, UnitDraft,
};
use crate::booking::BookingStatus;
use crate::error::ClientError;
use crate::http::endpoints;
use crate::http::{ApiRequest, AuthPipeline};

/// Properties owned by the signed-in host.
pub async fn host_properties(api: &AuthPipeline) -> Result<Vec<Property>, ClientError> {
    let body: HostProperties = api.get_json(endpoints::HOST_DASHBOARD).await?;
    Ok(body.into_items())
}

/// Properties plus active-booking count and confirmed revenue.
pub async fn host_dashboard(api: &AuthPipeline) -> Result<HostSummary, ClientError> {
    let (properties, bookings) = futures::try_join!(host_properties(api), host_bookings(api))?;
    Ok(HostSummary::new(properties, &bookings))
}

impl UnitDraft {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.unit_name_or_number.trim().is_empty() {
            return Err(ClientError::invalid_listing("Unit name is required.".to_string()));
        }
        if !self.price_per_night.is_positive() {
            return Err(ClientError::invalid_listing(
                "Price per night must be greater than zero.".to_string(),
            ));
        }
        if self.max_guests == 0 {
            return Err(ClientError::invalid_listing("A unit must sleep at least one guest.".to_string()));
        }
        Ok(())
    }
}

pub async fn create_unit(api: &AuthPipeline, draft: &UnitDraft) -> Result<Unit, ClientError> {
    draft.validate()?;
    let unit: Unit = api.post_json(endpoints::HOST_UNITS, draft).await?;
    info!(unit_id = unit.id, property_id = draft.property, "unit created");
    Ok(unit)
}

pub async fn update_unit(
    api: &AuthPipeline,
    unit_id: i64,
    draft: &UnitDraft,
) -> Result<Unit, ClientError> {
    draft.validate()?;
    api.patch_json(&endpoints::host_unit(unit_id), draft).await
}

pub async fn delete_unit(api: &AuthPipeline, unit_id: i64) -> Result<(), ClientError> {
    api.send_no_content(ApiRequest::delete(endpoints::host_unit(unit_id)))
        .await?;
    info!(unit_id, "unit deleted");
    Ok(())
}

pub async fn host_bookings(api: &AuthPipeline) -> Result<Vec<Booking>, ClientError> {
    let listing: Listing<Booking> = api.get_json(endpoints::HOST_BOOKINGS).await?;
    Ok(listing.into_items())
}

/// Move `booking` to `next`. Disallowed transitions are rejected locally.
pub async fn update_booking_status(
    api: &AuthPipeline,
    booking: &Booking,
    next: BookingStatus,
) -> Result<(), ClientError> {
    if !booking.status.can_transition_to(next) {
        return Err(ClientError::InvalidStatusTransition {
            from: booking.status,
            to: next,
        });
    }
    let request = ApiRequest::patch(endpoints::manage_booking(booking.id))
        .body(json!({ "status": next }));
    api.send_no_content(request).await?;
    info!(booking_id = booking.id, from = %booking.status, to = %next, "booking status updated");
    Ok(())
}

pub async fn host_reviews(api: &AuthPipeline) -> Result<Vec<Review>, ClientError> {
    let listing: Listing<Review> = api.get_json(endpoints::HOST_REVIEWS).await?;
    Ok(listing.into_items())
}

pub async fn mark_review_read(api: &AuthPipeline, review_id: i64) -> Result<(), ClientError> {
    api.send_no_content(ApiRequest::patch(endpoints::mark_review_read(review_id)))
        .await
}
