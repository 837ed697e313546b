use crate::entities::{Booking, Flight, Passenger};

/// A rendered ticket email, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl TicketEmail {
    pub fn render(booking: &Booking, flight: &Flight, passenger: &Passenger) -> Self {
        Self {
            subject: format!(
                "Your Flight Ticket - {} ({})",
                flight.flight_number, booking.booking_reference
            ),
            html: render_html(booking, flight, passenger),
            text: render_text(booking, flight, passenger),
        }
    }
}

/// Minimal escaping for values interpolated into the HTML body.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="ticket-row"><span class="ticket-label">{label}:</span> <span class="ticket-value">{}</span></div>"#,
        escape(value)
    )
}

fn render_html(booking: &Booking, flight: &Flight, passenger: &Passenger) -> String {
    let special_requests = if booking.special_requests.is_empty() {
        String::new()
    } else {
        row("Special Requests", &booking.special_requests.join(", "))
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Your Flight Ticket</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 0; padding: 20px; background-color: #f5f5f5; }}
        .container {{ max-width: 600px; margin: 0 auto; background-color: white; border-radius: 10px; overflow: hidden; }}
        .header {{ background: linear-gradient(135deg, #22c55e, #3b82f6); color: white; padding: 30px; text-align: center; }}
        .content {{ padding: 30px; }}
        .ticket-section {{ background-color: #f8fafc; border-radius: 8px; padding: 20px; margin: 20px 0; }}
        .ticket-row {{ margin: 10px 0; }}
        .ticket-label {{ font-weight: bold; color: #374151; }}
        .highlight {{ background-color: #dbeafe; padding: 15px; border-radius: 6px; text-align: center; }}
        .footer {{ background-color: #f9fafb; padding: 20px; text-align: center; color: #6b7280; font-size: 14px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Ethiopian Airlines</h1>
            <p>Your flight ticket is ready!</p>
        </div>
        <div class="content">
            <div class="highlight">
                <h2>Booking Confirmed!</h2>
                <p>Booking Reference: {reference}</p>
            </div>
            <div class="ticket-section">
                <h3>Passenger Information</h3>
                {name}
                {email}
                {phone}
            </div>
            <div class="ticket-section">
                <h3>Flight Details</h3>
                {flight_number}
                {route}
                {departure}
                {arrival}
                {duration}
            </div>
            <div class="ticket-section">
                <h3>Booking Details</h3>
                {seat}
                {price}
                {status}
                {special_requests}
            </div>
            <p>Please arrive at the airport at least 2 hours before departure.</p>
            <p>Have a safe and pleasant flight!</p>
        </div>
        <div class="footer">
            <p>This is an automated email. Please do not reply to this email.</p>
        </div>
    </div>
</body>
</html>"#,
        reference = escape(&booking.booking_reference),
        name = row("Name", &passenger.full_name()),
        email = row("Email", &passenger.email),
        phone = row("Phone", &passenger.phone),
        flight_number = row("Flight", &flight.flight_number),
        route = row(
            "Route",
            &format!("{} → {}", flight.departure, flight.destination)
        ),
        departure = row("Departure", &flight.departure_time),
        arrival = row("Arrival", &flight.arrival_time),
        duration = row("Duration", &flight.duration),
        seat = row(
            "Seat",
            &format!("{} ({})", booking.seat_number, booking.seat_class.as_str())
        ),
        price = row("Total Price", &format!("${}", booking.total_price)),
        status = row("Status", booking.status.as_str()),
        special_requests = special_requests,
    )
}

fn render_text(booking: &Booking, flight: &Flight, passenger: &Passenger) -> String {
    let mut text = format!(
        "Ethiopian Airlines - Flight Ticket

BOOKING CONFIRMED!
Booking Reference: {reference}

PASSENGER INFORMATION
Name: {name}
Email: {email}
Phone: {phone}

FLIGHT DETAILS
Flight: {flight_number}
Route: {departure} → {destination}
Departure: {departure_time}
Arrival: {arrival_time}
Duration: {duration}

BOOKING DETAILS
Seat: {seat} ({class})
Total Price: ${price}
Status: {status}
",
        reference = booking.booking_reference,
        name = passenger.full_name(),
        email = passenger.email,
        phone = passenger.phone,
        flight_number = flight.flight_number,
        departure = flight.departure,
        destination = flight.destination,
        departure_time = flight.departure_time,
        arrival_time = flight.arrival_time,
        duration = flight.duration,
        seat = booking.seat_number,
        class = booking.seat_class.as_str(),
        price = booking.total_price,
        status = booking.status.as_str(),
    );

    if !booking.special_requests.is_empty() {
        text.push_str(&format!(
            "Special Requests: {}\n",
            booking.special_requests.join(", ")
        ));
    }

    text.push_str(
        "
Please arrive at the airport at least 2 hours before departure.
Have a safe and pleasant flight!

This is an automated email. Please do not reply to this email.",
    );
    text
}
