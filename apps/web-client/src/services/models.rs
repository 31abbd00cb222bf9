//! Wire shapes. Decoding is lenient: optional fields default, prices arrive as
//! numbers or decimal strings, and nested references may be ids or objects.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use time::Date;

use crate::booking::{Amount, BookingStatus};
use crate::dates::format_iso_date;

/// List body: either a bare array or a paginated `{"results": [...]}` page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
    },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page { results, .. } => results,
            Listing::Bare(items) => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub id: Option<i64>,
    pub image: String,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    #[serde(default)]
    pub unit_name_or_number: Option<String>,
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub price_per_night: Amount,
    #[serde(default)]
    pub max_guests: Option<u32>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Unit {
    pub fn label(&self) -> String {
        self.unit_name_or_number
            .clone()
            .unwrap_or_else(|| format!("Unit {}", self.id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl Property {
    pub fn unit(&self, unit_id: i64) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == unit_id)
    }

    /// "address, city" with whichever parts are present.
    pub fn location(&self) -> String {
        [self.address.as_deref(), self.city.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Body of `POST /properties/` and `PATCH /properties/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDraft {
    pub title: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

impl PropertyDraft {
    pub const DEFAULT_COUNTRY: &'static str = "Kenya";

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            address: String::new(),
            city: String::new(),
            country: Self::DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl From<&Property> for PropertyDraft {
    fn from(property: &Property) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        Self {
            title: property.title.clone(),
            description: text(&property.description),
            address: text(&property.address),
            city: text(&property.city),
            country: text(&property.country),
        }
    }
}

/// Body of `POST /host/units/` and `PATCH /host/units/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitDraft {
    pub property: i64,
    pub unit_name_or_number: String,
    pub price_per_night: Amount,
    pub max_guests: u32,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub amenities: Vec<String>,
}

impl UnitDraft {
    pub fn new(property: i64, name: impl Into<String>, price_per_night: Amount) -> Self {
        Self {
            property,
            unit_name_or_number: name.into(),
            price_per_night,
            max_guests: 1,
            bedrooms: 1,
            bathrooms: 1,
            amenities: Vec::new(),
        }
    }

    /// Amenities from a comma-separated list; blanks are dropped.
    pub fn amenities_from_list(mut self, list: &str) -> Self {
        self.amenities = list
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect();
        self
    }

    /// Draft pre-filled from an existing unit of `property`.
    pub fn from_unit(property: i64, unit: &Unit) -> Self {
        Self {
            property,
            unit_name_or_number: unit.unit_name_or_number.clone().unwrap_or_default(),
            price_per_night: unit.price_per_night,
            max_guests: unit.max_guests.unwrap_or(1),
            bedrooms: unit.bedrooms.unwrap_or(1),
            bathrooms: unit.bathrooms.unwrap_or(1),
            amenities: unit.amenities.clone(),
        }
    }
}

/// `GET /host/dashboard/` body: the host's properties, bare, paginated or
/// under a `properties` key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HostProperties {
    Page { results: Vec<Property> },
    Keyed { properties: Vec<Property> },
    Bare(Vec<Property>),
}

impl HostProperties {
    pub fn into_items(self) -> Vec<Property> {
        match self {
            HostProperties::Page { results } => results,
            HostProperties::Keyed { properties } => properties,
            HostProperties::Bare(items) => items,
        }
    }
}

/// Host overview: listed properties plus figures derived from bookings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSummary {
    pub properties: Vec<Property>,
    /// Confirmed bookings.
    pub active_bookings: usize,
    /// Sum of `total_price` over confirmed bookings.
    pub confirmed_revenue: Amount,
}

impl HostSummary {
    pub fn new(properties: Vec<Property>, bookings: &[Booking]) -> Self {
        let confirmed = || {
            bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Confirmed)
        };
        Self {
            properties,
            active_bookings: confirmed().count(),
            confirmed_revenue: confirmed().filter_map(|b| b.total_price).sum(),
        }
    }
}

/// Property as embedded in bookings and reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySummary {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, alias = "name")]
    pub title: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyRef {
    Id(i64),
    Summary(PropertySummary),
}

impl PropertyRef {
    pub fn title(&self) -> Option<&str> {
        match self {
            PropertyRef::Summary(summary) => summary.title.as_deref(),
            PropertyRef::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingUnit {
    pub id: i64,
    #[serde(default)]
    pub unit_name_or_number: Option<String>,
    #[serde(default)]
    pub property: Option<PropertySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitRef {
    Id(i64),
    Detail(BookingUnit),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    #[serde(default)]
    pub unit: Option<UnitRef>,
    #[serde(default)]
    pub user: Option<Guest>,
    #[serde(with = "crate::dates::iso")]
    pub check_in: Date,
    #[serde(with = "crate::dates::iso")]
    pub check_out: Date,
    #[serde(default)]
    pub guests: Option<u32>,
    pub status: BookingStatus,
    #[serde_as(as = "Option<PickFirst<(DisplayFromStr, _)>>")]
    pub total_price: Option<Amount>,
}

impl Booking {
    pub fn property_title(&self) -> Option<&str> {
        match &self.unit {
            Some(UnitRef::Detail(unit)) => unit.property.as_ref()?.title.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub user: Option<ReviewAuthor>,
    #[serde(default)]
    pub property: Option<PropertyRef>,
    #[serde(default, alias = "is_read")]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /reviews/create/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewDraft {
    pub booking_id: i64,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Partial profile update; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone_number.is_none()
    }
}

/// Sign-up form. `password_confirm` is checked locally and never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub password: String,
    #[serde(skip)]
    pub password_confirm: String,
}

/// Body of `POST /auth/password/reset/confirm/`; `uid` and `token` come from
/// the emailed link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordResetConfirm {
    pub uid: String,
    pub token: String,
    pub new_password1: String,
    pub new_password2: String,
}

/// Query for `GET /properties/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySearch {
    pub search: Option<String>,
    pub check_in: Option<Date>,
    pub check_out: Option<Date>,
}

impl PropertySearch {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            pairs.push(("search", term.to_string()));
        }
        if let Some(date) = self.check_in {
            pairs.push(("check_in", format_iso_date(date)));
        }
        if let Some(date) = self.check_out {
            pairs.push(("check_out", format_iso_date(date)));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use super::*;

    #[test]
    fn property_with_string_and_number_prices() {
        let property: Property = serde_json::from_value(json!({
            "id": 3,
            "title": "Diani Beach House",
            "city": "Diani",
            "owner": {"id": 9, "username": "host9"},
            "units": [
                {"id": 1, "unit_name_or_number": "A1", "price_per_night": "1000.00", "max_guests": 2},
                {"id": 2, "price_per_night": 850}
            ]
        }))
        .unwrap();
        assert_eq!(property.units[0].price_per_night, Amount::from_major(1000));
        assert_eq!(property.units[1].price_per_night, Amount::from_major(850));
        assert_eq!(property.unit(2).map(Unit::label), Some("Unit 2".to_string()));
        assert_eq!(property.location(), "Diani");
    }

    #[test]
    fn listing_accepts_both_shapes() {
        let bare: Listing<Owner> = serde_json::from_value(json!([{"id": 1}])).unwrap();
        let page: Listing<Owner> =
            serde_json::from_value(json!({"count": 1, "next": null, "results": [{"id": 1}]})).unwrap();
        assert_eq!(bare.into_items(), page.into_items());
    }

    #[test]
    fn booking_with_nested_unit() {
        let booking: Booking = serde_json::from_value(json!({
            "id": 11,
            "unit": {"id": 1, "property": {"title": "Diani Beach House"}},
            "user": {"username": "otieno", "email": "otieno@example.test"},
            "check_in": "2025-01-01",
            "check_out": "2025-01-04",
            "guests": 2,
            "status": "pending",
            "total_price": "3000.00"
        }))
        .unwrap();
        assert_eq!(booking.property_title(), Some("Diani Beach House"));
        assert_eq!(booking.total_price, Some(Amount::from_major(3000)));
        assert_eq!(booking.status, BookingStatus::Pending);

        let bare: Booking = serde_json::from_value(json!({
            "id": 12, "unit": 1, "check_in": "2025-01-01", "check_out": "2025-01-02", "status": "confirmed"
        }))
        .unwrap();
        assert_eq!(bare.unit, Some(UnitRef::Id(1)));
        assert_eq!(bare.total_price, None);
    }

    #[test]
    fn review_property_may_be_id() {
        let review: Review = serde_json::from_value(json!({
            "id": 1, "rating": 4, "comment": "Lovely", "property": 3, "is_read": true
        }))
        .unwrap();
        assert_eq!(review.property, Some(PropertyRef::Id(3)));
        assert!(review.read);
    }

    #[test]
    fn search_query_skips_blanks() {
        let search = PropertySearch {
            search: Some("  ".into()),
            check_in: Some(date!(2025 - 03 - 01)),
            check_out: None,
        };
        assert_eq!(search.query_pairs(), vec![("check_in", "2025-03-01".to_string())]);
    }

    #[test]
    fn unit_draft_body() {
        let draft = UnitDraft::new(3, "Garden Room", Amount::from_minor(125_050))
            .amenities_from_list(" wifi, ,parking ,");
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({
                "property": 3,
                "unit_name_or_number": "Garden Room",
                "price_per_night": "1250.50",
                "max_guests": 1,
                "bedrooms": 1,
                "bathrooms": 1,
                "amenities": ["wifi", "parking"]
            })
        );
    }

    #[test]
    fn host_properties_accept_every_shape() {
        let property = json!({"id": 3, "title": "Diani Beach House"});
        for body in [
            json!([property]),
            json!({"results": [property]}),
            json!({"properties": [property]}),
        ] {
            let parsed: HostProperties = serde_json::from_value(body.clone()).unwrap();
            assert_eq!(parsed.into_items().len(), 1, "{body}");
        }
    }

    #[test]
    fn summary_counts_confirmed_only() {
        let booking = |id: i64, status: &str, total: Option<&str>| -> Booking {
            serde_json::from_value(json!({
                "id": id, "check_in": "2025-01-01", "check_out": "2025-01-03",
                "status": status, "total_price": total
            }))
            .unwrap()
        };
        let bookings = [
            booking(1, "confirmed", Some("2000.00")),
            booking(2, "pending", Some("900.00")),
            booking(3, "confirmed", Some("1500.50")),
            booking(4, "confirmed", None),
            booking(5, "cancelled", Some("700.00")),
        ];
        let summary = HostSummary::new(vec![], &bookings);
        assert_eq!(summary.active_bookings, 3);
        assert_eq!(summary.confirmed_revenue, Amount::from_minor(350_050));
        assert_eq!(HostSummary::new(vec![], &[]).confirmed_revenue, Amount::ZERO);
    }

    #[test]
    fn registration_never_sends_confirmation() {
        let reg = Registration {
            username: "amina".into(),
            email: "amina@example.test".into(),
            first_name: "Amina".into(),
            last_name: "Njeri".into(),
            phone_number: "".into(),
            password: "pw".into(),
            password_confirm: "pw".into(),
        };
        let body = serde_json::to_value(&reg).unwrap();
        assert!(body.get("password_confirm").is_none());
    }
}
