use tracing::{debug, info};

use super::models::{Listing, Property, PropertyDraft, PropertySearch};
use crate::auth::SessionClaims;
use crate::error::ClientError;
use crate::http::endpoints;
use crate::http::{ApiRequest, AuthPipeline};

pub async fn list_properties(api: &AuthPipeline) -> Result<Vec<Property>, ClientError> {
    let listing: Listing<Property> = api.get_json(endpoints::PROPERTIES).await?;
    Ok(listing.into_items())
}

pub async fn search_properties(
    api: &AuthPipeline,
    search: &PropertySearch,
) -> Result<Vec<Property>, ClientError> {
    let request = search
        .query_pairs()
        .into_iter()
        .fold(ApiRequest::get(endpoints::PROPERTIES), |req, (key, value)| {
            req.query(key, value)
        });
    debug!(filters = request.query.len(), "searching properties");
    let listing: Listing<Property> = api.fetch_json(request).await?;
    Ok(listing.into_items())
}

/// Property detail; a missing property surfaces as `NotFound`.
pub async fn get_property(api: &AuthPipeline, property_id: i64) -> Result<Property, ClientError> {
    api.get_json(&endpoints::property(property_id)).await
}

impl PropertyDraft {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.title.trim().is_empty() {
            return Err(ClientError::invalid_listing("Property title is required.".to_string()));
        }
        Ok(())
    }
}

/// List a new property owned by the signed-in host.
pub async fn create_property(
    api: &AuthPipeline,
    draft: &PropertyDraft,
) -> Result<Property, ClientError> {
    draft.validate()?;
    let property: Property = api.post_json(endpoints::PROPERTIES, draft).await?;
    info!(property_id = property.id, "property created");
    Ok(property)
}

pub async fn update_property(
    api: &AuthPipeline,
    property_id: i64,
    draft: &PropertyDraft,
) -> Result<Property, ClientError> {
    draft.validate()?;
    api.patch_json(&endpoints::property(property_id), draft).await
}

/// Whether `user` owns `property` (hosts cannot book their own units).
pub fn is_owner(user: Option<&SessionClaims>, property: &Property) -> bool {
    match (user, &property.owner) {
        (Some(user), Some(owner)) => user.user_id == owner.id.to_string(),
        _ => false,
    }
}
