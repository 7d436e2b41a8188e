//! Human-readable date rendering for each [`Locale`].
//!
//! All helpers are generic over the time zone so callers decide whether a
//! date is shown in local time or UTC. The export footer uses local time.

use crate::locale::Locale;
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Numeric date: `1/5/2024` in English (month first), `5/1/2024` in Spanish.
pub fn short_date<Tz: TimeZone>(value: &DateTime<Tz>, locale: Locale) -> String {
    let (day, month, year) = (value.day(), value.month(), value.year());
    match locale {
        Locale::En => format!("{month}/{day}/{year}"),
        Locale::Es => format!("{day}/{month}/{year}"),
    }
}

/// Abbreviated month date: `Jan 5, 2024` / `5 ene 2024`.
pub fn display_date<Tz: TimeZone>(value: &DateTime<Tz>, locale: Locale) -> String {
    let (day, year) = (value.day(), value.year());
    let idx = value.month0() as usize;
    match locale {
        Locale::En => format!("{} {day}, {year}", MONTHS_EN[idx]),
        Locale::Es => format!("{day} {} {year}", MONTHS_ES[idx]),
    }
}

/// Date plus two-digit time: `Jan 5, 2024, 09:05 AM` / `5 ene 2024, 09:05`.
pub fn display_date_time<Tz: TimeZone>(value: &DateTime<Tz>, locale: Locale) -> String {
    let date = display_date(value, locale);
    match locale {
        Locale::En => {
            let (pm, hour) = value.hour12();
            let suffix = if pm { "PM" } else { "AM" };
            format!("{date}, {hour:02}:{:02} {suffix}", value.minute())
        }
        Locale::Es => format!("{date}, {:02}:{:02}", value.hour(), value.minute()),
    }
}

/// Coarse elapsed time between `then` and `now`, e.g. `3 hours ago` / `Hace 3 horas`.
///
/// Uses the largest whole unit among days, hours and minutes; anything under
/// a minute (or in the future) reads as "just now".
pub fn relative_time<Tz: TimeZone, Tz2: TimeZone>(
    then: &DateTime<Tz>,
    now: &DateTime<Tz2>,
    locale: Locale,
) -> String {
    let elapsed = now
        .with_timezone(&Utc)
        .signed_duration_since(then.with_timezone(&Utc))
        .num_seconds();
    let minutes = elapsed / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    let (count, unit) = if days > 0 {
        (days, Unit::Day)
    } else if hours > 0 {
        (hours, Unit::Hour)
    } else if minutes > 0 {
        (minutes, Unit::Minute)
    } else {
        return match locale {
            Locale::En => "Just now".to_owned(),
            Locale::Es => "Ahora".to_owned(),
        };
    };

    let word = unit.word(locale, count == 1);
    match locale {
        Locale::En => format!("{count} {word} ago"),
        Locale::Es => format!("Hace {count} {word}"),
    }
}

#[derive(Clone, Copy)]
enum Unit {
    Day,
    Hour,
    Minute,
}

impl Unit {
    fn word(self, locale: Locale, singular: bool) -> &'static str {
        match (locale, self, singular) {
            (Locale::En, Unit::Day, true) => "day",
            (Locale::En, Unit::Day, false) => "days",
            (Locale::En, Unit::Hour, true) => "hour",
            (Locale::En, Unit::Hour, false) => "hours",
            (Locale::En, Unit::Minute, true) => "minute",
            (Locale::En, Unit::Minute, false) => "minutes",
            (Locale::Es, Unit::Day, true) => "día",
            (Locale::Es, Unit::Day, false) => "días",
            (Locale::Es, Unit::Hour, true) => "hora",
            (Locale::Es, Unit::Hour, false) => "horas",
            (Locale::Es, Unit::Minute, true) => "minuto",
            (Locale::Es, Unit::Minute, false) => "minutos",
        }
    }
}
