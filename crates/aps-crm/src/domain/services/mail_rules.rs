//! Rules for the scheduled Formular 230 mail jobs

use chrono::{Datelike, NaiveDate};

use crate::domain::entities::Form230;

pub const RENEWAL_SUBJECT: &str = "Reînnoire Formular 230 - Asociația Acțiune pentru Sănătate";
pub const BIRTHDAY_SUBJECT: &str =
    "🎂 La Mulți Ani din partea Asociației Acțiune pentru Sănătate!";

/// Years since the form was filed when its redirection expires this year
pub fn renewal_due(form: &Form230, current_year: i32) -> Option<i32> {
    let year = form.year_number()?;
    let duration = form.duration_years();
    (current_year == year + duration).then_some(duration)
}

/// Birth month and day from a Romanian CNP (digits 4-5 month, 6-7 day)
pub fn birthday_from_cnp(cnp: &str) -> Option<(u32, u32)> {
    let cnp = cnp.trim();
    if cnp.len() < 7 || !cnp.as_bytes()[..7].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let month: u32 = cnp[3..5].parse().ok()?;
    let day: u32 = cnp[5..7].parse().ok()?;
    // 2000 is a leap year, so 29 February stays valid
    NaiveDate::from_ymd_opt(2000, month, day).map(|_| (month, day))
}

pub fn is_birthday(cnp: &str, today: NaiveDate) -> bool {
    birthday_from_cnp(cnp) == Some((today.month(), today.day()))
}
