//! Five-field cron expression parsing and next-run computation.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

use crate::error::{Result, SchedulerError};

/// Upper bound on the forward scan: one leap year of minutes. Expressions
/// that never match inside a year (e.g. `0 0 30 2 *`) yield no next run.
const MAX_SCAN_MINUTES: u32 = 366 * 24 * 60;

/// A parsed cron expression: minute hour day-of-month month day-of-week.
#[derive(Debug, Clone)]
pub struct CronExpr {
    minutes: Vec<u8>,
    hours: Vec<u8>,
    days_of_month: Vec<u8>,
    months: Vec<u8>,
    /// 0 = Sunday … 6 = Saturday (7 is normalised to 0 at parse time).
    days_of_week: Vec<u8>,
    dom_restricted: bool,
    dow_restricted: bool,
    source: String,
}

impl std::str::FromStr for CronExpr {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(SchedulerError::InvalidSchedule(format!(
                "expected 5 fields, got {} in {s:?}",
                fields.len()
            )));
        }

        let (minutes, _) = parse_field(fields[0], 0, 59)?;
        let (hours, _) = parse_field(fields[1], 0, 23)?;
        let (days_of_month, dom_restricted) = parse_field(fields[2], 1, 31)?;
        let (months, _) = parse_field(fields[3], 1, 12)?;
        let (mut days_of_week, dow_restricted) = parse_field(fields[4], 0, 7)?;

        // Both 0 and 7 mean Sunday.
        for day in days_of_week.iter_mut() {
            if *day == 7 {
                *day = 0;
            }
        }
        days_of_week.sort_unstable();
        days_of_week.dedup();

        Ok(Self {
            minutes,
            hours,
            days_of_month,
            months,
            days_of_week,
            dom_restricted,
            dow_restricted,
            source: s.to_string(),
        })
    }
}

impl std::fmt::Display for CronExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl CronExpr {
    /// Compute the next UTC instant strictly after `from` matching this
    /// expression, or `None` when no match exists within a year.
    pub fn next_after(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut candidate =
            from.with_second(0)?.with_nanosecond(0)? + Duration::minutes(1);
        for _ in 0..MAX_SCAN_MINUTES {
            if self.matches(candidate) {
                return Some(candidate);
            }
            candidate += Duration::minutes(1);
        }
        None
    }

    fn matches(&self, t: DateTime<Utc>) -> bool {
        if !self.minutes.contains(&(t.minute() as u8))
            || !self.hours.contains(&(t.hour() as u8))
            || !self.months.contains(&(t.month() as u8))
        {
            return false;
        }

        let dom = self.days_of_month.contains(&(t.day() as u8));
        let dow = self
            .days_of_week
            .contains(&(t.weekday().num_days_from_sunday() as u8));

        // Vixie-cron day rule: when both day fields are restricted, a match
        // on either fires.
        match (self.dom_restricted, self.dow_restricted) {
            (true, true) => dom || dow,
            (true, false) => dom,
            (false, true) => dow,
            (false, false) => true,
        }
    }
}

/// Parse one field into its sorted allowed values plus whether the field
/// restricts anything (`*` and `*/step` count as unrestricted for the day
/// rule even though `*/step` limits values).
fn parse_field(field: &str, min: u8, max: u8) -> Result<(Vec<u8>, bool)> {
    if field == "*" {
        return Ok(((min..=max).collect(), false));
    }

    let mut values = Vec::new();
    let mut restricted = true;
    for part in field.split(',') {
        let (range, step) = match part.split_once('/') {
            Some((range, step)) => {
                let step: u8 = step
                    .parse()
                    .map_err(|_| invalid(field, "step is not a number"))?;
                if step == 0 {
                    return Err(invalid(field, "step must be positive"));
                }
                (range, step)
            }
            None => (part, 1),
        };

        let (lo, hi) = if range == "*" {
            if field == part {
                // A lone `*/step` keeps the day rule unrestricted.
                restricted = false;
            }
            (min, max)
        } else if let Some((lo, hi)) = range.split_once('-') {
            (parse_value(lo, field)?, parse_value(hi, field)?)
        } else {
            let value = parse_value(range, field)?;
            // `n/step` runs from n to the field maximum.
            if part.contains('/') {
                (value, max)
            } else {
                (value, value)
            }
        };

        if lo > hi {
            return Err(invalid(field, "range start exceeds range end"));
        }
        if lo < min || hi > max {
            return Err(invalid(field, "value out of range"));
        }

        let mut value = lo;
        while value <= hi {
            values.push(value);
            match value.checked_add(step) {
                Some(next) => value = next,
                None => break,
            }
        }
    }

    if values.is_empty() {
        return Err(invalid(field, "no values"));
    }
    values.sort_unstable();
    values.dedup();
    Ok((values, restricted))
}

fn parse_value(s: &str, field: &str) -> Result<u8> {
    s.parse()
        .map_err(|_| invalid(field, "value is not a number"))
}

fn invalid(field: &str, reason: &str) -> SchedulerError {
    SchedulerError::InvalidSchedule(format!("field {field:?}: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn parsed(s: &str) -> CronExpr {
        s.parse().unwrap()
    }

    #[test]
    fn default_schedule_fires_monday_wednesday_friday_at_nine() {
        let cron = parsed("0 9 * * 1,3,5");
        // 2026-08-04 is a Tuesday.
        let next = cron.next_after(at(2026, 8, 4, 12, 0)).unwrap();
        assert_eq!(next, at(2026, 8, 5, 9, 0));
    }

    #[test]
    fn next_run_is_strictly_after_from() {
        let cron = parsed("0 9 * * 1,3,5");
        // Exactly at a Wednesday firing: next is Friday, not now.
        let next = cron.next_after(at(2026, 8, 5, 9, 0)).unwrap();
        assert_eq!(next, at(2026, 8, 7, 9, 0));
    }

    #[test]
    fn same_day_match_before_the_hour() {
        let cron = parsed("0 9 * * 1,3,5");
        let next = cron.next_after(at(2026, 8, 5, 8, 59)).unwrap();
        assert_eq!(next, at(2026, 8, 5, 9, 0));
    }

    #[test]
    fn step_field_fires_every_quarter_hour() {
        let cron = parsed("*/15 * * * *");
        assert_eq!(
            cron.next_after(at(2026, 8, 4, 12, 7)).unwrap(),
            at(2026, 8, 4, 12, 15)
        );
        assert_eq!(
            cron.next_after(at(2026, 8, 4, 12, 45)).unwrap(),
            at(2026, 8, 4, 13, 0)
        );
    }

    #[test]
    fn day_of_month_rolls_into_next_month() {
        let cron = parsed("30 14 1 * *");
        let next = cron.next_after(at(2026, 8, 4, 0, 0)).unwrap();
        assert_eq!(next, at(2026, 9, 1, 14, 30));
    }

    #[test]
    fn restricted_dom_and_dow_match_on_either() {
        let cron = parsed("0 0 13 * 5");
        // From Wednesday 2026-08-05: Friday the 7th comes before the 13th.
        let next = cron.next_after(at(2026, 8, 5, 0, 0)).unwrap();
        assert_eq!(next, at(2026, 8, 7, 0, 0));
        // And from the 8th, the 13th (a Thursday) comes before next Friday.
        let next = cron.next_after(at(2026, 8, 8, 0, 0)).unwrap();
        assert_eq!(next, at(2026, 8, 13, 0, 0));
    }

    #[test]
    fn seven_is_sunday() {
        let a = parsed("0 9 * * 7");
        let b = parsed("0 9 * * 0");
        let from = at(2026, 8, 4, 0, 0);
        assert_eq!(a.next_after(from), b.next_after(from));
        // 2026-08-09 is a Sunday.
        assert_eq!(a.next_after(from).unwrap(), at(2026, 8, 9, 9, 0));
    }

    #[test]
    fn range_with_step() {
        let cron = parsed("0 8-18/4 * * *");
        assert_eq!(
            cron.next_after(at(2026, 8, 4, 9, 0)).unwrap(),
            at(2026, 8, 4, 12, 0)
        );
    }

    #[test]
    fn never_matching_expression_yields_none() {
        let cron = parsed("0 0 30 2 *");
        assert_eq!(cron.next_after(at(2026, 8, 4, 0, 0)), None);
    }

    #[test]
    fn rejects_malformed_expressions() {
        assert!("".parse::<CronExpr>().is_err());
        assert!("* * * *".parse::<CronExpr>().is_err());
        assert!("61 * * * *".parse::<CronExpr>().is_err());
        assert!("* 24 * * *".parse::<CronExpr>().is_err());
        assert!("* * * * 8".parse::<CronExpr>().is_err());
        assert!("*/0 * * * *".parse::<CronExpr>().is_err());
        assert!("5-2 * * * *".parse::<CronExpr>().is_err());
        assert!("every day".parse::<CronExpr>().is_err());
    }
}
