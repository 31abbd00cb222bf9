use super::models::{PasswordResetConfirm, ProfileUpdate, Registration, UserProfile};
use crate::error::ClientError;
use crate::http::endpoints;
use crate::http::{ApiRequest, AuthPipeline};

/// Registration errors list one field per segment, separated by this.
pub const REGISTRATION_SEPARATOR: &str = " | ";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

pub async fn get_profile(api: &AuthPipeline) -> Result<UserProfile, ClientError> {
    api.get_json(endpoints::USER).await
}

/// PATCH only the fields present in `update`.
pub async fn update_profile(
    api: &AuthPipeline,
    update: &ProfileUpdate,
) -> Result<UserProfile, ClientError> {
    if update.is_empty() {
        return get_profile(api).await;
    }
    api.patch_json(endpoints::USER, update).await
}

impl Registration {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.username.trim().is_empty() {
            return Err(ClientError::invalid_registration("Username is required.".to_string()));
        }
        if self.password.is_empty() {
            return Err(ClientError::invalid_registration("Password is required.".to_string()));
        }
        if self.password != self.password_confirm {
            return Err(ClientError::invalid_registration("Passwords do not match.".to_string()));
        }
        Ok(())
    }
}

/// Create an account. Sent without credentials; does not sign in.
pub async fn register(api: &AuthPipeline, registration: &Registration) -> Result<(), ClientError> {
    registration.validate()?;
    let request = ApiRequest::post(endpoints::REGISTER)
        .json(registration)?
        .anonymous();
    api.send_no_content(request).await
}

impl PasswordResetConfirm {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.uid.trim().is_empty() || self.token.trim().is_empty() {
            return Err(ClientError::invalid_password_reset(
                "Invalid password reset link.".to_string(),
            ));
        }
        if self.new_password1.is_empty() {
            return Err(ClientError::invalid_password_reset("Password is required.".to_string()));
        }
        if self.new_password1 != self.new_password2 {
            return Err(ClientError::invalid_password_reset("Passwords do not match.".to_string()));
        }
        Ok(())
    }
}

/// Set a new password from an emailed reset link. Sent without credentials.
pub async fn confirm_password_reset(
    api: &AuthPipeline,
    form: &PasswordResetConfirm,
) -> Result<(), ClientError> {
    form.validate()?;
    let request = ApiRequest::post(endpoints::PASSWORD_RESET_CONFIRM)
        .json(form)?
        .anonymous();
    api.send_no_content(request).await
}

/// Registration failure text, one `field: messages` segment per field.
pub fn registration_message(error: &ClientError) -> String {
    match error {
        ClientError::Validation { body, .. } => {
            body.flatten_with(REGISTRATION_SEPARATOR, REGISTRATION_FAILED_MESSAGE)
        }
        ClientError::InvalidRegistration { detail } => detail.clone(),
        ClientError::Network(_) => REGISTRATION_FAILED_MESSAGE.to_string(),
        other => other.user_message(),
    }
}
