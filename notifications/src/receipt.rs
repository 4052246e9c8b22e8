//! Confirmation receipt rendering.
//!
//! A [`Receipt`] is the message body every notifier sends: a subject, a
//! plain-text rendition and an HTML rendition of the same reservation.

use ecopark_core::{Participant, Reservation};
use std::fmt::Write as _;

/// Rendered confirmation for one reservation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Email subject line
    pub subject: String,
    /// Plain-text body
    pub text: String,
    /// HTML body
    pub html: String,
}

impl Receipt {
    /// Render the receipt for `reservation`.
    ///
    /// Dates are written `dd/mm/yyyy` and times `HH:MM`.
    #[must_use]
    pub fn for_reservation(reservation: &Reservation) -> Self {
        let session = reservation.session();
        let date = session.date.format("%d/%m/%Y").to_string();
        let time = session.time.format("%H:%M").to_string();

        Self {
            subject: format!("Booking confirmation - {}", session.activity),
            text: render_text(reservation, &date, &time),
            html: render_html(reservation, &date, &time),
        }
    }
}

fn participant_line(participant: &Participant) -> String {
    let mut line = format!(
        "{} (ID {}), age {}",
        participant.name(),
        participant.national_id(),
        participant.age()
    );
    if let Some(size) = participant.attire_size() {
        let _ = write!(line, ", size {size}");
    }
    line
}

fn render_text(reservation: &Reservation, date: &str, time: &str) -> String {
    let session = reservation.session();
    let mut body = String::new();

    let _ = writeln!(body, "Your booking is confirmed.");
    let _ = writeln!(body);
    let _ = writeln!(body, "Activity: {}", session.activity);
    let _ = writeln!(body, "Date: {date}");
    let _ = writeln!(body, "Time: {time}");
    let _ = writeln!(body, "Contact: {}", reservation.contact_email());
    let _ = writeln!(body);
    let _ = writeln!(body, "Participants ({}):", reservation.total_participants());
    for participant in reservation.participants() {
        let _ = writeln!(body, "  - {}", participant_line(participant));
    }
    let _ = writeln!(body);
    let _ = writeln!(body, "Thank you for visiting EcoPark.");

    body
}

fn render_html(reservation: &Reservation, date: &str, time: &str) -> String {
    let session = reservation.session();
    let activity = escape_html(&session.activity);
    let contact = escape_html(reservation.contact_email());

    let mut rows = String::new();
    for participant in reservation.participants() {
        let _ = write!(
            rows,
            r#"
                <tr>
                    <td style="padding: 6px; border-bottom: 1px solid #e5e7eb;">{}</td>
                    <td style="padding: 6px; border-bottom: 1px solid #e5e7eb;">{}</td>
                    <td style="padding: 6px; border-bottom: 1px solid #e5e7eb;">{}</td>
                    <td style="padding: 6px; border-bottom: 1px solid #e5e7eb;">{}</td>
                </tr>"#,
            escape_html(participant.name()),
            participant.national_id(),
            participant.age(),
            participant.attire_size().map_or_else(String::new, escape_html),
        );
    }

    format!(
        r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Booking confirmation - {activity}</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #15803d;">Your booking is confirmed</h2>
        <p><strong>Activity:</strong> {activity}</p>
        <p><strong>Date:</strong> {date}</p>
        <p><strong>Time:</strong> {time}</p>
        <p><strong>Contact:</strong> {contact}</p>
        <table style="width: 100%; border-collapse: collapse; margin: 20px 0;">
            <thead>
                <tr>
                    <th style="text-align: left; padding: 6px;">Name</th>
                    <th style="text-align: left; padding: 6px;">ID</th>
                    <th style="text-align: left; padding: 6px;">Age</th>
                    <th style="text-align: left; padding: 6px;">Size</th>
                </tr>
            </thead>
            <tbody>{rows}
            </tbody>
        </table>
        <p style="color: #666; font-size: 14px;">Thank you for visiting EcoPark.</p>
    </div>
</body>
</html>
"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
