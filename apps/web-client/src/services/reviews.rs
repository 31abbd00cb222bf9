use super::models::{Listing, Review, ReviewDraft};
use crate::error::ClientError;
use crate::http::endpoints;
use crate::http::{ApiRequest, AuthPipeline};

/// Fallback when the API rejects a review without a `detail`.
pub const REVIEW_FAILED_MESSAGE: &str =
    "Failed to submit review. You may have already reviewed this stay.";

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

impl ReviewDraft {
    pub fn validate(&self) -> Result<(), ClientError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ClientError::invalid_review(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}."
            )));
        }
        Ok(())
    }
}

pub async fn submit_review(api: &AuthPipeline, draft: &ReviewDraft) -> Result<(), ClientError> {
    draft.validate()?;
    api.send_no_content(ApiRequest::post(endpoints::REVIEW_CREATE).json(draft)?)
        .await
}

pub async fn property_reviews(
    api: &AuthPipeline,
    property_id: i64,
) -> Result<Vec<Review>, ClientError> {
    let listing: Listing<Review> = api.get_json(&endpoints::property_reviews(property_id)).await?;
    Ok(listing.into_items())
}
