//! Pending booking draft and its local validation.
//!
//! A draft is checked before anything is sent; a rejected draft never reaches
//! the network. The server stays authoritative on conflicts.

use serde::Serialize;
use thiserror::Error;
use time::Date;

use super::pricing::{compute_nights, compute_total, Amount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingRejection {
    #[error("Please select both a check-in and check-out date.")]
    MissingDates,
    #[error("Check-out date must be after the check-in date.")]
    CheckOutNotAfterCheckIn,
    #[error("At least one guest is required.")]
    NoGuests,
    #[error("This unit accepts at most {max} guests.")]
    TooManyGuests { guests: u32, max: u32 },
    #[error("The total price must be greater than zero.")]
    NothingToPay,
    #[error("You cannot book a unit in your own property.")]
    OwnUnit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub unit_id: i64,
    pub check_in: Option<Date>,
    pub check_out: Option<Date>,
    pub guests: u32,
}

impl BookingDraft {
    pub fn new(unit_id: i64) -> Self {
        Self {
            unit_id,
            check_in: None,
            check_out: None,
            guests: 1,
        }
    }

    pub fn dates(mut self, check_in: Date, check_out: Date) -> Self {
        self.check_in = Some(check_in);
        self.check_out = Some(check_out);
        self
    }

    pub fn guests(mut self, guests: u32) -> Self {
        self.guests = guests;
        self
    }

    pub fn nights(&self) -> u32 {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => compute_nights(check_in, check_out),
            _ => 0,
        }
    }

    pub fn total(&self, nightly_rate: Amount) -> Amount {
        compute_total(self.nights(), nightly_rate)
    }

    /// Whether the submit action should be enabled.
    pub fn is_submittable(&self, nightly_rate: Amount) -> bool {
        self.total(nightly_rate).is_positive()
    }

    /// Check the draft against the unit's terms and produce the request body.
    pub fn validate(
        &self,
        nightly_rate: Amount,
        max_guests: Option<u32>,
    ) -> Result<BookingSubmission, BookingRejection> {
        let (Some(check_in), Some(check_out)) = (self.check_in, self.check_out) else {
            return Err(BookingRejection::MissingDates);
        };
        if check_out <= check_in {
            return Err(BookingRejection::CheckOutNotAfterCheckIn);
        }
        if self.guests == 0 {
            return Err(BookingRejection::NoGuests);
        }
        if let Some(max) = max_guests.filter(|max| self.guests > *max) {
            return Err(BookingRejection::TooManyGuests {
                guests: self.guests,
                max,
            });
        }
        let total = self.total(nightly_rate);
        if !total.is_positive() {
            return Err(BookingRejection::NothingToPay);
        }
        Ok(BookingSubmission {
            unit_id: self.unit_id,
            check_in,
            check_out,
            guests: self.guests,
            nights: self.nights(),
            total,
        })
    }
}

/// Validated draft; serializes to the `POST /bookings/` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingSubmission {
    pub unit_id: i64,
    #[serde(with = "crate::dates::iso")]
    pub check_in: Date,
    #[serde(with = "crate::dates::iso")]
    pub check_out: Date,
    pub guests: u32,
    #[serde(skip)]
    pub nights: u32,
    #[serde(skip)]
    pub total: Amount,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::*;

    const RATE: Amount = Amount::from_major(1000);

    #[test]
    fn valid_draft_becomes_submission() {
        let draft = BookingDraft::new(4)
            .dates(date!(2025 - 01 - 01), date!(2025 - 01 - 04))
            .guests(2);
        let submission = draft.validate(RATE, Some(4)).unwrap();
        assert_eq!(submission.nights, 3);
        assert_eq!(submission.total, Amount::from_major(3000));
        assert_eq!(
            serde_json::to_value(&submission).unwrap(),
            json!({"unit_id": 4, "check_in": "2025-01-01", "check_out": "2025-01-04", "guests": 2})
        );
    }

    #[test]
    fn rejections() {
        let base = BookingDraft::new(4);
        assert_eq!(base.validate(RATE, None), Err(BookingRejection::MissingDates));

        let same_day = base.clone().dates(date!(2025 - 02 - 01), date!(2025 - 02 - 01));
        assert_eq!(
            same_day.validate(RATE, None),
            Err(BookingRejection::CheckOutNotAfterCheckIn)
        );
        assert!(!same_day.is_submittable(RATE));

        let ok_dates = base.dates(date!(2025 - 02 - 01), date!(2025 - 02 - 03));
        assert_eq!(
            ok_dates.clone().guests(0).validate(RATE, None),
            Err(BookingRejection::NoGuests)
        );
        assert_eq!(
            ok_dates.clone().guests(5).validate(RATE, Some(4)),
            Err(BookingRejection::TooManyGuests { guests: 5, max: 4 })
        );
        assert_eq!(
            ok_dates.validate(Amount::ZERO, None),
            Err(BookingRejection::NothingToPay)
        );
    }

    #[test]
    fn messages_match_form_copy() {
        assert_eq!(
            BookingRejection::MissingDates.to_string(),
            "Please select both a check-in and check-out date."
        );
        assert_eq!(
            BookingRejection::CheckOutNotAfterCheckIn.to_string(),
            "Check-out date must be after the check-in date."
        );
    }
}
