mod common;
mod support;

use serde_json::json;
use support::fixtures::{booking_json, property_json, PROPERTY_ID, UNIT_ID};
use support::Harness;
use web_client::http::endpoints;
use web_client::http::{Method, StatusCode};
use web_client::services::host::{
    create_unit, delete_unit, host_bookings, host_dashboard, host_reviews, mark_review_read,
    update_booking_status, update_unit,
};
use web_client::services::properties::{create_property, get_property, update_property};
use web_client::services::reviews::{submit_review, REVIEW_FAILED_MESSAGE};
use web_client::services::{PropertyDraft, ReviewDraft, UnitDraft};
use web_client::{Amount, BookingStatus, ClientError};

#[tokio::test]
async fn dashboard_summarises_confirmed_bookings() {
    let h = Harness::signed_in(9, "host9", "HOST");
    h.transport
        .reply(
            Method::GET,
            endpoints::HOST_DASHBOARD,
            StatusCode::OK,
            json!({"properties": [property_json()]}),
        )
        .reply(
            Method::GET,
            endpoints::HOST_BOOKINGS,
            StatusCode::OK,
            json!({"count": 3, "next": null, "results": [
                booking_json(40, "confirmed"),
                booking_json(41, "pending"),
                booking_json(42, "confirmed"),
            ]}),
        );

    let summary = host_dashboard(h.session.api()).await.unwrap();
    assert_eq!(summary.properties.len(), 1);
    assert_eq!(summary.properties[0].id, PROPERTY_ID);
    assert_eq!(summary.active_bookings, 2);
    assert_eq!(summary.confirmed_revenue, Amount::from_major(6000));
}

#[tokio::test]
async fn dashboard_fails_when_either_call_fails() {
    let h = Harness::signed_in(2, "achieng", "CUSTOMER");
    h.transport
        .reply(Method::GET, endpoints::HOST_DASHBOARD, StatusCode::FORBIDDEN, json!({"detail": "Hosts only."}))
        .reply(Method::GET, endpoints::HOST_BOOKINGS, StatusCode::OK, json!([]));

    let err = host_dashboard(h.session.api()).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden { .. }));
}

#[tokio::test]
async fn create_then_edit_property() {
    let h = Harness::signed_in(9, "host9", "HOST");
    h.transport
        .reply(Method::POST, endpoints::PROPERTIES, StatusCode::CREATED, property_json())
        .reply(Method::PATCH, &endpoints::property(PROPERTY_ID), StatusCode::OK, property_json());

    let mut draft = PropertyDraft::new("Diani Beach House");
    draft.address = "Beach Road".into();
    draft.city = "Diani".into();
    let created = create_property(h.session.api(), &draft).await.unwrap();
    assert_eq!(created.id, PROPERTY_ID);

    let mut edit = PropertyDraft::from(&created);
    edit.description = "Steps from the sand.".into();
    update_property(h.session.api(), created.id, &edit).await.unwrap();

    let sent = h.transport.requests();
    assert_eq!(sent[0].method, Method::POST);
    assert_eq!(
        sent[0].body,
        Some(json!({
            "title": "Diani Beach House",
            "description": "",
            "address": "Beach Road",
            "city": "Diani",
            "country": "Kenya"
        }))
    );
    assert_eq!(sent[1].method, Method::PATCH);
    assert_eq!(sent[1].body.as_ref().unwrap()["description"], "Steps from the sand.");
}

#[tokio::test]
async fn untitled_property_is_not_sent() {
    let h = Harness::signed_in(9, "host9", "HOST");
    let err = create_property(h.session.api(), &PropertyDraft::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidListing { .. }));
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn unit_lifecycle() {
    let h = Harness::signed_in(9, "host9", "HOST");
    let created_unit = json!({
        "id": 32, "unit_name_or_number": "Garden Room", "price_per_night": "750.00",
        "max_guests": 2, "bedrooms": 1, "bathrooms": 1, "amenities": ["wifi"]
    });
    h.transport
        .reply(Method::GET, &endpoints::property(PROPERTY_ID), StatusCode::OK, property_json())
        .reply(Method::POST, endpoints::HOST_UNITS, StatusCode::CREATED, created_unit)
        .reply(Method::PATCH, &endpoints::host_unit(UNIT_ID), StatusCode::OK, property_json()["units"][0].clone())
        .reply(Method::DELETE, &endpoints::host_unit(UNIT_ID), StatusCode::NO_CONTENT, json!(null));

    let mut draft = UnitDraft::new(PROPERTY_ID, "Garden Room", Amount::from_major(750))
        .amenities_from_list("wifi");
    draft.max_guests = 2;
    let unit = create_unit(h.session.api(), &draft).await.unwrap();
    assert_eq!(unit.id, 32);
    assert_eq!(unit.amenities, vec!["wifi".to_string()]);

    let property = get_property(h.session.api(), PROPERTY_ID).await.unwrap();
    let existing = property.unit(UNIT_ID).unwrap();
    let mut edit = UnitDraft::from_unit(PROPERTY_ID, existing);
    edit.bathrooms = 2;
    update_unit(h.session.api(), UNIT_ID, &edit).await.unwrap();

    delete_unit(h.session.api(), UNIT_ID).await.unwrap();

    let sent = h.transport.requests();
    assert_eq!(sent[0].body.as_ref().unwrap()["price_per_night"], "750.00");
    assert_eq!(sent[0].body.as_ref().unwrap()["property"], PROPERTY_ID);
    let patch = sent[2].body.as_ref().unwrap();
    assert_eq!(patch["unit_name_or_number"], "Sea View Suite");
    assert_eq!(patch["price_per_night"], "1000.00");
    assert_eq!(patch["bathrooms"], 2);
    assert_eq!(h.transport.count(&Method::DELETE, &endpoints::host_unit(UNIT_ID)), 1);
}

#[tokio::test]
async fn invalid_unit_is_rejected_locally() {
    let h = Harness::signed_in(9, "host9", "HOST");
    let free = UnitDraft::new(PROPERTY_ID, "Loft", Amount::ZERO);
    let mut empty = UnitDraft::new(PROPERTY_ID, "Loft", Amount::from_major(500));
    empty.max_guests = 0;
    let unnamed = UnitDraft::new(PROPERTY_ID, " ", Amount::from_major(500));

    for draft in [free, empty, unnamed] {
        let err = create_unit(h.session.api(), &draft).await.unwrap_err();
        assert!(err.is_local(), "{draft:?}");
    }
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn confirm_pending_booking() {
    let h = Harness::signed_in(9, "host9", "HOST");
    h.transport
        .reply(Method::GET, endpoints::HOST_BOOKINGS, StatusCode::OK, json!([booking_json(40, "pending")]))
        .reply(Method::PATCH, &endpoints::manage_booking(40), StatusCode::OK, booking_json(40, "confirmed"));

    let bookings = host_bookings(h.session.api()).await.unwrap();
    update_booking_status(h.session.api(), &bookings[0], BookingStatus::Confirmed)
        .await
        .unwrap();

    let sent = h.transport.requests();
    assert_eq!(sent[1].method, Method::PATCH);
    assert_eq!(sent[1].body, Some(json!({"status": "confirmed"})));
}

#[tokio::test]
async fn terminal_booking_cannot_move() {
    let h = Harness::signed_in(9, "host9", "HOST");
    h.transport.reply(
        Method::GET,
        endpoints::HOST_BOOKINGS,
        StatusCode::OK,
        json!([booking_json(41, "cancelled")]),
    );
    let bookings = host_bookings(h.session.api()).await.unwrap();
    h.transport.clear_log();

    let err = update_booking_status(h.session.api(), &bookings[0], BookingStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::InvalidStatusTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Confirmed
        }
    ));
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn reviews_and_read_flag() {
    let h = Harness::signed_in(9, "host9", "HOST");
    h.transport
        .reply(
            Method::GET,
            endpoints::HOST_REVIEWS,
            StatusCode::OK,
            json!([
                {"id": 1, "rating": 5, "comment": "Lovely", "user": {"username": "otieno"}, "is_read": false},
                {"id": 2, "rating": 3, "comment": "", "read": true}
            ]),
        )
        .reply(Method::PATCH, &endpoints::mark_review_read(1), StatusCode::NO_CONTENT, json!(null));

    let reviews = host_reviews(h.session.api()).await.unwrap();
    assert_eq!(reviews.len(), 2);
    assert!(!reviews[0].read);
    assert!(reviews[1].read);

    mark_review_read(h.session.api(), reviews[0].id).await.unwrap();
    assert_eq!(h.transport.count(&Method::PATCH, &endpoints::mark_review_read(1)), 1);
}

#[tokio::test]
async fn out_of_range_rating_is_rejected_locally() {
    let h = Harness::signed_in(5, "otieno", "CUSTOMER");
    for rating in [0, 6] {
        let draft = ReviewDraft {
            booking_id: 77,
            rating,
            comment: "ok".into(),
        };
        let err = submit_review(h.session.api(), &draft).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidReview { .. }), "{rating}");
    }
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn duplicate_review_uses_review_fallback() {
    let h = Harness::signed_in(5, "otieno", "CUSTOMER");
    h.transport
        .reply(Method::POST, endpoints::REVIEW_CREATE, StatusCode::BAD_REQUEST, json!({}));
    let draft = ReviewDraft {
        booking_id: 77,
        rating: 4,
        comment: "Great stay".into(),
    };

    let err = submit_review(h.session.api(), &draft).await.unwrap_err();
    assert_eq!(err.message_with_fallback(REVIEW_FAILED_MESSAGE), REVIEW_FAILED_MESSAGE);
    assert_eq!(
        h.transport.requests()[0].body,
        Some(json!({"booking_id": 77, "rating": 4, "comment": "Great stay"}))
    );
}
