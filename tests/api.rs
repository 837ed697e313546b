use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{Request, StatusCode},
    Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use tower::ServiceExt;

use flight_booking_backend::entities::{
    Booking, BookingStatus, Flight, NewBooking, NewFlight, NewPassenger, NewSeat, Passenger, Seat,
};
use flight_booking_backend::store::{Snapshot, StoreError, StoreResult};
use flight_booking_backend::{routes, AppState, Config, FlightStore, Mailer, MemoryStore};

fn state_with(store: Arc<dyn FlightStore>) -> AppState {
    AppState {
        store,
        mailer: Mailer::Log,
        config: Config::for_tests(),
    }
}

fn app_with(store: Arc<MemoryStore>) -> Router {
    routes::create_router(state_with(store))
}

fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::seeded_with(&mut StdRng::seed_from_u64(2024)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

fn passenger() -> Value {
    json!({
        "firstName": "Abebe",
        "lastName": "Bikila",
        "email": "abebe@example.com",
        "phone": "+251911000000",
        "dateOfBirth": "1990-01-01",
        "gender": "male",
        "nationality": "Ethiopian",
        "passportId": "EP1234567"
    })
}

fn booking_body(flight_id: &str, seat_number: &str) -> Value {
    json!({
        "passenger": passenger(),
        "booking": { "flightId": flight_id, "seatNumber": seat_number }
    })
}

#[tokio::test]
async fn health_check() {
    let app = app_with(seeded_store());
    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn lists_seeded_flights_and_filters_by_route() {
    let app = app_with(seeded_store());

    let (status, body) = get(&app, "/api/flights").await;
    assert_eq!(status, StatusCode::OK);
    let flights = body.as_array().unwrap();
    assert_eq!(flights.len(), 5);
    assert_eq!(flights[0]["flightNumber"], "ET-101");
    assert_eq!(flights[0]["price"], "89.00");

    let (_, body) = get(&app, "/api/flights?from=dire%20dawa").await;
    let flights = body.as_array().unwrap();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0]["id"], "105");

    let (_, body) = get(&app, "/api/flights?from=Addis&to=GDQ").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn single_flight_and_missing_flight() {
    let app = app_with(seeded_store());

    let (status, body) = get(&app, "/api/flights/103").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["destination"], "Bahir Dar (BJR)");

    let (status, body) = get(&app, "/api/flights/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Flight not found");
}

#[tokio::test]
async fn seat_map_has_fifteen_seats() {
    let app = app_with(seeded_store());
    let (status, body) = get(&app, "/api/flights/101/seats").await;
    assert_eq!(status, StatusCode::OK);
    let seats = body.as_array().unwrap();
    assert_eq!(seats.len(), 15);
    assert_eq!(seats[0]["seatNumber"], "1A");
    assert_eq!(seats[0]["seatClass"], "Business");
    assert_eq!(seats[0]["price"], "25.00");
}

#[tokio::test]
async fn booking_business_seat_on_flight_101() {
    let store = seeded_store();
    store.update_seat_occupancy("101", "1A", false).unwrap();
    let app = app_with(store.clone());

    let (status, body) = post(&app, "/api/bookings", booking_body("101", "1A")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["booking"]["totalPrice"], "126.00");
    assert_eq!(body["booking"]["status"], "confirmed");
    assert_eq!(body["booking"]["specialRequests"], json!([]));
    assert_eq!(body["booking"]["passengerId"], body["passenger"]["id"]);
    let reference = body["booking"]["bookingReference"].as_str().unwrap();
    assert!(reference.starts_with("ET"));

    assert!(store.seat("101", "1A").unwrap().unwrap().is_occupied);

    let (status, fetched) = get(&app, &format!("/api/bookings/reference/{}", reference)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], body["booking"]["id"]);

    let (status, fetched) = get(
        &app,
        &format!("/api/bookings/{}", body["booking"]["id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["bookingReference"], reference);

    let (_, all) = get(&app, "/api/bookings").await;
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn booking_an_occupied_seat_is_rejected_without_changes() {
    let store = seeded_store();
    store.update_seat_occupancy("102", "3A", true).unwrap();
    let app = app_with(store.clone());

    let (status, body) = post(&app, "/api/bookings", booking_body("102", "3A")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Seat is already occupied");
    assert!(store.bookings().unwrap().is_empty());
}

#[tokio::test]
async fn double_booking_the_same_seat_fails_the_second_time() {
    let store = seeded_store();
    store.update_seat_occupancy("104", "2B", false).unwrap();
    let app = app_with(store.clone());

    let (first, _) = post(&app, "/api/bookings", booking_body("104", "2B")).await;
    let (second, _) = post(&app, "/api/bookings", booking_body("104", "2B")).await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(store.bookings().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_seat_is_not_found() {
    let app = app_with(seeded_store());
    let (status, body) = post(&app, "/api/bookings", booking_body("101", "77Z")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Seat not found");
}

#[tokio::test]
async fn invalid_booking_payload_lists_offending_fields() {
    let app = app_with(seeded_store());
    let mut body = booking_body("101", "1A");
    body["passenger"]["email"] = json!("not-an-email");
    body["passenger"]["firstName"] = json!("");

    let (status, body) = post(&app, "/api/bookings", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request data");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["passenger.email", "passenger.firstName"]);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = app_with(seeded_store());
    let request = Request::builder()
        .method("POST")
        .uri("/api/bookings")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn missing_reference_is_not_found() {
    let app = app_with(seeded_store());
    let (status, body) = get(&app, "/api/bookings/reference/ETZZZZZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found");
}

#[tokio::test]
async fn created_flight_has_a_full_seat_map() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (status, flight) = post(
        &app,
        "/api/flights",
        json!({
            "flightNumber": "ET-210",
            "departure": "Addis Ababa (ADD)",
            "destination": "Arba Minch (AMH)",
            "departureTime": "06:30",
            "arrivalTime": "07:40",
            "duration": "1h 10m",
            "price": "74.5",
            "businessSeats": 4,
            "economySeats": 8
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(flight["totalSeats"], 12);
    assert_eq!(flight["price"], "74.50");

    let id = flight["id"].as_str().unwrap();
    let (_, seats) = get(&app, &format!("/api/flights/{}/seats", id)).await;
    let seats = seats.as_array().unwrap();
    assert_eq!(seats.len(), 12);
    assert!(seats.iter().all(|s| s["isOccupied"] == false));

    let (status, _) = post(
        &app,
        "/api/flights",
        json!({
            "flightNumber": "ET-210",
            "departure": "a",
            "destination": "b",
            "departureTime": "c",
            "arrivalTime": "d",
            "duration": "e",
            "price": "1"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_reflects_seed_occupancy_and_bookings() {
    let store = seeded_store();
    let app = app_with(store.clone());

    let occupied: usize = ["101", "102", "103", "104", "105"]
        .iter()
        .map(|id| {
            store
                .flight_seats(id)
                .unwrap()
                .iter()
                .filter(|s| s.is_occupied)
                .count()
        })
        .sum();
    let expected_rate = ((occupied as f64 / 75.0) * 100.0).round() as u64;

    let (status, stats) = get(&app, "/api/dashboard/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalFlights"], 5);
    assert_eq!(stats["activeBookings"], 0);
    assert_eq!(stats["totalRevenue"], "0.00");
    assert_eq!(stats["occupancyRate"], expected_rate);

    store.update_seat_occupancy("101", "1A", false).unwrap();
    post(&app, "/api/bookings", booking_body("101", "1A")).await;

    let (_, stats) = get(&app, "/api/dashboard/stats").await;
    assert_eq!(stats["activeBookings"], 1);
    assert_eq!(stats["totalRevenue"], "126.00");

    let (status, rows) = get(&app, "/api/dashboard/availability").await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["flightNumber"], "ET-101");
    assert_eq!(rows[0]["totalSeats"], 15);
}

#[tokio::test]
async fn status_update_and_email_ticket() {
    let store = seeded_store();
    store.update_seat_occupancy("103", "1B", false).unwrap();
    let app = app_with(store.clone());

    let (_, created) = post(&app, "/api/bookings", booking_body("103", "1B")).await;
    let id = created["booking"]["id"].as_str().unwrap();
    let reference = created["booking"]["bookingReference"].as_str().unwrap();

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/bookings/{}/status", id))
        .header("content-type", "application/json")
        .body(Body::from(json!({ "status": "checked-in" }).to_string()))
        .unwrap();
    let (status, booking) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "checked-in");

    let (status, body) = post(
        &app,
        "/api/bookings/email-ticket",
        json!({ "bookingReference": reference }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "abebe@example.com");

    let (status, body) = post(
        &app,
        "/api/bookings/email-ticket",
        json!({ "bookingReference": reference, "email": "family@example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "family@example.com");

    let (status, body) = post(
        &app,
        "/api/bookings/email-ticket",
        json!({ "bookingReference": "ETNOTHER" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Booking not found");
}

#[tokio::test]
async fn zero_seat_counts_create_the_standard_seat_map() {
    let app = app_with(Arc::new(MemoryStore::new()));
    let (status, flight) = post(
        &app,
        "/api/flights",
        json!({
            "flightNumber": "ET-404",
            "departure": "Addis Ababa (ADD)",
            "destination": "Jimma (JIM)",
            "departureTime": "13:00",
            "arrivalTime": "14:05",
            "duration": "1h 5m",
            "price": "81",
            "businessSeats": 0,
            "economySeats": 0
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(flight["businessSeats"], 5);
    assert_eq!(flight["economySeats"], 10);
    assert_eq!(flight["totalSeats"], 15);

    let id = flight["id"].as_str().unwrap();
    let (_, seats) = get(&app, &format!("/api/flights/{}/seats", id)).await;
    assert_eq!(seats.as_array().unwrap().len(), 15);
}

/// Store whose every call fails, as if its lock were poisoned.
struct FailingStore;

impl FlightStore for FailingStore {
    fn flights(&self) -> StoreResult<Vec<Flight>> {
        Err(StoreError::Poisoned)
    }
    fn flight(&self, _id: &str) -> StoreResult<Option<Flight>> {
        Err(StoreError::Poisoned)
    }
    fn create_flight(&self, _flight: NewFlight) -> StoreResult<Flight> {
        Err(StoreError::Poisoned)
    }
    fn passenger(&self, _id: &str) -> StoreResult<Option<Passenger>> {
        Err(StoreError::Poisoned)
    }
    fn create_passenger(&self, _passenger: NewPassenger) -> StoreResult<Passenger> {
        Err(StoreError::Poisoned)
    }
    fn bookings(&self) -> StoreResult<Vec<Booking>> {
        Err(StoreError::Poisoned)
    }
    fn booking(&self, _id: &str) -> StoreResult<Option<Booking>> {
        Err(StoreError::Poisoned)
    }
    fn booking_by_reference(&self, _reference: &str) -> StoreResult<Option<Booking>> {
        Err(StoreError::Poisoned)
    }
    fn create_booking(&self, _booking: NewBooking) -> StoreResult<Booking> {
        Err(StoreError::Poisoned)
    }
    fn update_booking_status(&self, _id: &str, _status: BookingStatus) -> StoreResult<Booking> {
        Err(StoreError::Poisoned)
    }
    fn flight_seats(&self, _flight_id: &str) -> StoreResult<Vec<Seat>> {
        Err(StoreError::Poisoned)
    }
    fn seat(&self, _flight_id: &str, _seat_number: &str) -> StoreResult<Option<Seat>> {
        Err(StoreError::Poisoned)
    }
    fn create_seat(&self, _seat: NewSeat) -> StoreResult<Seat> {
        Err(StoreError::Poisoned)
    }
    fn update_seat_occupancy(
        &self,
        _flight_id: &str,
        _seat_number: &str,
        _is_occupied: bool,
    ) -> StoreResult<Seat> {
        Err(StoreError::Poisoned)
    }
    fn reserve_seat(&self, _flight_id: &str, _seat_number: &str) -> StoreResult<Seat> {
        Err(StoreError::Poisoned)
    }
    fn snapshot(&self) -> StoreResult<Snapshot> {
        Err(StoreError::Poisoned)
    }
}

#[tokio::test]
async fn store_failures_report_the_failed_operation() {
    let app = routes::create_router(state_with(Arc::new(FailingStore)));

    let (status, body) = post(
        &app,
        "/api/bookings/email-ticket",
        json!({ "bookingReference": "ETAAAAAA" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to send email");

    let (status, body) = get(&app, "/api/flights").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to fetch flights");

    let (status, body) = get(&app, "/api/dashboard/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to fetch dashboard stats");
}

fn from_peer(uri: &str, peer: SocketAddr) -> Request<Body> {
    let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    request.extensions_mut().insert(ConnectInfo(peer));
    request
}

#[tokio::test]
async fn layered_app_serves_requests_and_rate_limits_per_peer() {
    let app = routes::create_app(state_with(seeded_store()));
    let peer: SocketAddr = "203.0.113.7:40000".parse().unwrap();

    let (status, body) = send(&app, from_peer("/api/health", peer)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let mut limited = None;
    for _ in 0..150 {
        let (status, body) = send(&app, from_peer("/api/health", peer)).await;
        if status == StatusCode::TOO_MANY_REQUESTS {
            limited = Some(body);
            break;
        }
    }
    let body = limited.expect("burst of 100 is exhausted");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Too many requests, retry in"));

    let other: SocketAddr = "198.51.100.9:40000".parse().unwrap();
    let (status, _) = send(&app, from_peer("/api/health", other)).await;
    assert_eq!(status, StatusCode::OK);
}
