//! KPI calculators over loaded datasets

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::domain::entities::{
    Cause, CauseKpi, D177Form, D177Kpi, Form230, Form230Kpi, Sponsorship, SponsorshipKpi,
    Volunteer, VolunteerKpi,
};

/// Weekly availability in hours: "10" -> 10, "10+" -> 10, "5-10" -> 7.5
pub fn availability_hours(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_end_matches('+').trim();
    if let Some((low, high)) = cleaned.split_once('-') {
        let low: f64 = low.trim().parse().ok()?;
        let high: f64 = high.trim().parse().ok()?;
        return Some((low + high) / 2.0);
    }
    cleaned.parse().ok()
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0u64), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn volunteer_kpi(volunteers: &[Volunteer]) -> VolunteerKpi {
    VolunteerKpi {
        total: volunteers.len() as u64,
        avg_age: average(volunteers.iter().filter_map(|v| v.age).map(|a| a as f64)).map(round1),
        avg_disponibility_hours: average(
            volunteers
                .iter()
                .filter_map(|v| v.availability.as_deref())
                .filter_map(availability_hours),
        )
        .map(round1),
    }
}

/// Contract dates come from free-text form fields
pub fn parse_contract_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// First and last day of the calendar month before `today`
pub fn previous_month(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_this = today.with_day(1).unwrap_or(today);
    let last_prev = first_this.pred_opt().unwrap_or(first_this);
    let first_prev = last_prev.with_day(1).unwrap_or(last_prev);
    (first_prev, last_prev)
}

fn contract_totals<'a>(
    contracts: impl Iterator<Item = (Option<f64>, Option<&'a str>)>,
    today: NaiveDate,
) -> (f64, f64) {
    let (start, end) = previous_month(today);
    contracts.fold((0.0, 0.0), |(total, last_month), (amount, date)| {
        let amount = amount.unwrap_or(0.0);
        let in_last_month = date
            .and_then(parse_contract_date)
            .is_some_and(|d| d >= start && d <= end);
        (
            total + amount,
            if in_last_month { last_month + amount } else { last_month },
        )
    })
}

pub fn d177_kpi(forms: &[D177Form], today: NaiveDate) -> D177Kpi {
    let (total_amount, last_month_amount) = contract_totals(
        forms
            .iter()
            .map(|f| (f.amount_value(), f.contract_date.as_deref())),
        today,
    );
    D177Kpi {
        companies: forms.len() as u64,
        total_amount,
        last_month_amount,
    }
}

pub fn sponsorship_kpi(contracts: &[Sponsorship], today: NaiveDate) -> SponsorshipKpi {
    let (total_amount, last_month_amount) = contract_totals(
        contracts
            .iter()
            .map(|s| (s.amount_value(), s.contract_date.as_deref())),
        today,
    );
    SponsorshipKpi {
        total_amount,
        last_month_amount,
    }
}

pub fn form230_kpi(forms: &[Form230], today: NaiveDate) -> Form230Kpi {
    let mut kpi = Form230Kpi::default();
    for form in forms {
        if form.two_years {
            kpi.total_2y += 1;
        } else {
            kpi.total_1y += 1;
        }
        if form.year_number() == Some(today.year()) {
            kpi.expiring_this_year += 1;
        }
        if form.submitted_at.year() == today.year() && form.submitted_at.month() == today.month() {
            kpi.this_month += 1;
        }
    }
    kpi
}

/// Causes are expected to be the `publish` and `future` ones
pub fn cause_kpi(causes: &[Cause], now: NaiveDateTime) -> CauseKpi {
    let reached_goal = causes
        .iter()
        .filter(|c| match (c.goal, c.donated) {
            (Some(goal), Some(donated)) => goal > 0.0 && donated >= goal,
            _ => false,
        })
        .count() as u64;

    let avg_progress_pct = average(causes.iter().filter_map(|c| {
        let goal = c.goal.filter(|g| *g > 0.0)?;
        let ratio = (c.donated.unwrap_or(0.0) / goal).min(1.0);
        Some(ratio * 100.0)
    }))
    .map(round1);

    let next_future = causes
        .iter()
        .filter(|c| c.status == "future" && c.date > now)
        .map(|c| c.date)
        .min();
    let next_campaign_date = next_future.or_else(|| causes.iter().map(|c| c.date).max());

    CauseKpi {
        total: causes.len() as u64,
        reached_goal,
        avg_progress_pct,
        next_campaign_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cause(id: u64, status: &str, date: NaiveDateTime, goal: Option<f64>, donated: Option<f64>) -> Cause {
        Cause {
            id,
            date,
            status: status.into(),
            title: format!("Cauza {}", id),
            excerpt: String::new(),
            goal,
            donors: None,
            donated,
            guid: String::new(),
        }
    }

    #[test]
    fn test_availability_hours() {
        assert_eq!(availability_hours("10"), Some(10.0));
        assert_eq!(availability_hours("20+"), Some(20.0));
        assert_eq!(availability_hours("5-10"), Some(7.5));
        assert_eq!(availability_hours("weekend"), None);
    }

    #[test]
    fn test_previous_month_wraps_year() {
        assert_eq!(previous_month(day(2025, 1, 15)), (day(2024, 12, 1), day(2024, 12, 31)));
        assert_eq!(previous_month(day(2024, 3, 1)), (day(2024, 2, 1), day(2024, 2, 29)));
    }

    #[test]
    fn test_contract_totals_last_month_window() {
        let (total, last) = contract_totals(
            vec![
                (Some(100.0), Some("2025-02-03")),
                (Some(50.0), Some("28.02.2025")),
                (Some(10.0), Some("2025-03-01")),
                (None, Some("2025-02-10")),
                (Some(5.0), Some("ieri")),
            ]
            .into_iter(),
            day(2025, 3, 10),
        );
        assert_eq!(total, 165.0);
        assert_eq!(last, 150.0);
    }

    #[test]
    fn test_cause_progress_is_capped() {
        let now = day(2025, 6, 1).and_hms_opt(0, 0, 0).unwrap();
        let causes = vec![
            cause(1, "publish", day(2025, 1, 1).and_hms_opt(0, 0, 0).unwrap(), Some(100.0), Some(250.0)),
            cause(2, "publish", day(2025, 2, 1).and_hms_opt(0, 0, 0).unwrap(), Some(200.0), Some(50.0)),
            cause(3, "publish", day(2025, 3, 1).and_hms_opt(0, 0, 0).unwrap(), Some(0.0), Some(10.0)),
        ];
        let kpi = cause_kpi(&causes, now);
        assert_eq!(kpi.total, 3);
        assert_eq!(kpi.reached_goal, 1);
        assert_eq!(kpi.avg_progress_pct, Some(62.5));
        assert_eq!(kpi.next_campaign_date, Some(day(2025, 3, 1).and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_next_campaign_prefers_future() {
        let now = day(2025, 6, 1).and_hms_opt(0, 0, 0).unwrap();
        let causes = vec![
            cause(1, "future", day(2025, 9, 1).and_hms_opt(0, 0, 0).unwrap(), None, None),
            cause(2, "future", day(2025, 7, 1).and_hms_opt(0, 0, 0).unwrap(), None, None),
            cause(3, "publish", day(2025, 12, 1).and_hms_opt(0, 0, 0).unwrap(), None, None),
        ];
        assert_eq!(
            cause_kpi(&causes, now).next_campaign_date,
            Some(day(2025, 7, 1).and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(cause_kpi(&[], now).avg_progress_pct, None);
    }
}
