//! Cookie date parsing (RFC 6265 section 5.1.1).
//!
//! The algorithm is deliberately lenient: the input is split into tokens and
//! the first token that looks like a time, a day, a month or a year fills that
//! slot. Timezone designators are ignored and the result is always UTC.

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

/// Parses the value of an `Expires` attribute.
///
/// Returns `None` when any of the four components is missing or out of
/// range, or when the calendar date does not exist.
pub fn parse_cookie_date(input: &str) -> Option<OffsetDateTime> {
	let mut hms: Option<(u8, u8, u8)> = None;
	let mut day: Option<u8> = None;
	let mut month: Option<Month> = None;
	let mut year: Option<u16> = None;

	let tokens = input.as_bytes().split(|b| is_delimiter(*b)).filter(|t| !t.is_empty());
	for token in tokens {
		if hms.is_none() {
			if let Some(found) = parse_time(token) {
				hms = Some(found);
				continue;
			}
		}
		if day.is_none() {
			if let Some(found) = parse_number(token, 1, 2) {
				day = Some(found as u8);
				continue;
			}
		}
		if month.is_none() {
			if let Some(found) = parse_month(token) {
				month = Some(found);
				continue;
			}
		}
		if year.is_none() {
			if let Some(found) = parse_number(token, 2, 4) {
				year = Some(found);
			}
		}
	}

	let (hour, minute, second) = hms?;
	let day = day?;
	let month = month?;
	let year = match year? {
		y @ 70..=99 => y + 1900,
		y @ 0..=69 => y + 2000,
		y => y,
	};

	if !(1..=31).contains(&day) || year < 1601 || hour > 23 || minute > 59 || second > 59 {
		return None;
	}

	let date = Date::from_calendar_date(i32::from(year), month, day).ok()?;
	let time = Time::from_hms(hour, minute, second).ok()?;
	Some(PrimitiveDateTime::new(date, time).assume_utc())
}

fn is_delimiter(b: u8) -> bool {
	matches!(b, 0x09 | 0x20..=0x2F | 0x3B..=0x40 | 0x5B..=0x60 | 0x7B..=0x7E)
}

/// Reads `min..=max` leading digits. Whatever follows must not be a digit.
fn leading_digits(token: &[u8], min: usize, max: usize) -> Option<(u16, usize)> {
	let count = token.iter().take_while(|b| b.is_ascii_digit()).count();
	if count < min || count > max {
		return None;
	}
	let value = token[..count]
		.iter()
		.fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
	Some((value, count))
}

fn parse_number(token: &[u8], min: usize, max: usize) -> Option<u16> {
	leading_digits(token, min, max).map(|(value, _)| value)
}

fn parse_time(token: &[u8]) -> Option<(u8, u8, u8)> {
	let mut rest = token;
	let mut fields = [0u8; 3];
	for (i, field) in fields.iter_mut().enumerate() {
		let (value, used) = leading_digits(rest, 1, 2)?;
		*field = value as u8;
		rest = &rest[used..];
		if i < 2 {
			rest = rest.strip_prefix(b":")?;
		}
	}
	Some((fields[0], fields[1], fields[2]))
}

fn parse_month(token: &[u8]) -> Option<Month> {
	if token.len() < 3 {
		return None;
	}
	let prefix = token[..3].to_ascii_lowercase();
	let month = match &prefix[..] {
		b"jan" => Month::January,
		b"feb" => Month::February,
		b"mar" => Month::March,
		b"apr" => Month::April,
		b"may" => Month::May,
		b"jun" => Month::June,
		b"jul" => Month::July,
		b"aug" => Month::August,
		b"sep" => Month::September,
		b"oct" => Month::October,
		b"nov" => Month::November,
		b"dec" => Month::December,
		_ => return None,
	};
	Some(month)
}
