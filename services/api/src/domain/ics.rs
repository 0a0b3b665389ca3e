//! iCalendar (RFC 5545) export of a single session.

use chrono::{DateTime, Duration, Utc};

use crate::domain::types::{SESSION_DURATION_MINUTES, Session};

const PRODID: &str = "-//Skillshare//Sessions//EN";
const MAX_LINE_OCTETS: usize = 75;

/// Render `session` as a `VCALENDAR` with one `VEVENT`.
///
/// `frontend_url` is the public web origin; the event links back to the
/// session page. `now` becomes `DTSTAMP`.
pub fn render_session(session: &Session, frontend_url: &str, now: DateTime<Utc>) -> String {
    let end = session.date_time + Duration::minutes(SESSION_DURATION_MINUTES);
    let url = format!(
        "{}/sessions/{}",
        frontend_url.trim_end_matches('/'),
        session.id
    );

    let lines = [
        "BEGIN:VCALENDAR".to_owned(),
        "VERSION:2.0".to_owned(),
        format!("PRODID:{PRODID}"),
        "METHOD:REQUEST".to_owned(),
        "BEGIN:VEVENT".to_owned(),
        format!("UID:{}", session.id),
        format!("DTSTAMP:{}", timestamp(now)),
        format!("CREATED:{}", timestamp(session.created_at)),
        format!("LAST-MODIFIED:{}", timestamp(session.updated_at)),
        format!("DTSTART:{}", timestamp(session.date_time)),
        format!("DTEND:{}", timestamp(end)),
        format!("SUMMARY:{}", escape_text(&session.title)),
        format!("LOCATION:{}", escape_text(&session.location)),
        format!("DESCRIPTION:{}", escape_text(&session.description)),
        format!("URL:{url}"),
        "END:VEVENT".to_owned(),
        "END:VCALENDAR".to_owned(),
    ];

    let mut out = String::new();
    for line in &lines {
        fold_into(&mut out, line);
    }
    out
}

/// `session-<title>.ics` with characters unsafe in a quoted header value replaced.
pub fn filename(title: &str) -> String {
    let safe: String = title
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' | ';' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("session-{safe}.ics")
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

/// Append `line` terminated by CRLF, folded so no physical line exceeds 75 octets.
fn fold_into(out: &mut String, line: &str) {
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out.push_str("\r\n");
}
