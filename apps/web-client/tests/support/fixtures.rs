//! Canned API bodies and scripted endpoints.

use serde_json::{json, Value};
use web_client::http::endpoints;
use web_client::http::{ApiResponse, Method, ScriptedTransport, StatusCode};

pub const PROPERTY_ID: i64 = 3;
pub const UNIT_ID: i64 = 31;
pub const OWNER_ID: i64 = 9;

pub fn property_json() -> Value {
    json!({
        "id": PROPERTY_ID,
        "title": "Diani Beach House",
        "address": "Beach Road",
        "city": "Diani",
        "country": "Kenya",
        "owner": {"id": OWNER_ID, "username": "host9"},
        "units": [{
            "id": UNIT_ID,
            "unit_name_or_number": "Sea View Suite",
            "price_per_night": "1000.00",
            "max_guests": 4,
            "bedrooms": 2,
            "bathrooms": 1,
            "images": []
        }]
    })
}

pub fn booking_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "unit": {"id": UNIT_ID, "unit_name_or_number": "Sea View Suite",
                 "property": {"id": PROPERTY_ID, "title": "Diani Beach House"}},
        "user": {"username": "otieno", "email": "otieno@example.test"},
        "check_in": "2025-01-01",
        "check_out": "2025-01-04",
        "guests": 2,
        "status": status,
        "total_price": "3000.00"
    })
}

/// `GET path` answers 200 with `body` only for `token`, 401 otherwise.
pub fn protect(transport: &ScriptedTransport, method: Method, path: &str, token: String, body: Value) {
    transport.respond(method, path, move |req| {
        Ok(if req.bearer() == Some(token.as_str()) {
            ApiResponse::from_json(StatusCode::OK, &body)
        } else {
            ApiResponse::from_json(
                StatusCode::UNAUTHORIZED,
                &json!({"detail": "Given token not valid for any token type", "code": "token_not_valid"}),
            )
        })
    });
}

pub fn refresh_succeeds(transport: &ScriptedTransport, new_access: &str) {
    transport.reply(
        Method::POST,
        endpoints::TOKEN_REFRESH,
        StatusCode::OK,
        json!({"access": new_access}),
    );
}

pub fn refresh_rejected(transport: &ScriptedTransport) {
    transport.reply(
        Method::POST,
        endpoints::TOKEN_REFRESH,
        StatusCode::UNAUTHORIZED,
        json!({"detail": "Token is invalid or expired", "code": "token_not_valid"}),
    );
}
