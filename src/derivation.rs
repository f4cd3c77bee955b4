//! CALL on business day D implies POST for the same person on the next
//! business day.

use crate::roster::Roster;
use crate::shift::{PersonId, ShiftType};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Serialize;

/// What a derivation pass did to the POST cell it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Derivation {
    Assigned { date: NaiveDate, person: PersonId },
    Cleared { date: NaiveDate },
    Unchanged { date: NaiveDate },
    /// The next business day has no POST cell in this roster.
    OutOfRange,
}

/// Bring the POST cell after `changed_date` in line with its CALL cell.
/// Idempotent; reapplying without an intervening edit changes nothing.
pub fn apply_derivation(roster: &mut Roster, changed_date: NaiveDate) -> Derivation {
    let Some(target) = roster
        .calendar()
        .next_business_day(changed_date)
        .filter(|next| roster.contains(*next, &ShiftType::Post))
    else {
        return Derivation::OutOfRange;
    };

    let call = roster.person(changed_date, &ShiftType::Call).cloned();
    let post = roster.person(target, &ShiftType::Post).cloned();

    let outcome = match (call, post) {
        (Some(person), Some(current)) if person == current => {
            Derivation::Unchanged { date: target }
        }
        (Some(person), _) => Derivation::Assigned {
            date: target,
            person,
        },
        (None, Some(_)) => Derivation::Cleared { date: target },
        (None, None) => Derivation::Unchanged { date: target },
    };

    let write = match &outcome {
        Derivation::Assigned { person, .. } => Some(Some(person.clone())),
        Derivation::Cleared { .. } => Some(None),
        _ => None,
    };
    if let Some(value) = write {
        if let Err(err) = roster.set_cell(target, &ShiftType::Post, value) {
            warn!("CALL {changed_date}: POST write failed: {err}");
            return Derivation::OutOfRange;
        }
        debug!("CALL {changed_date} -> {outcome:?}");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::MonthKey;
    use chrono::Datelike;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn boss() -> PersonId {
        PersonId::new("BOSS").unwrap()
    }

    fn roster() -> Roster {
        Roster::new(MonthKey::new(2025, 7).unwrap())
    }

    #[test]
    fn call_without_person_and_empty_post_is_unchanged() {
        let mut roster = roster();
        assert_eq!(
            apply_derivation(&mut roster, d(1)),
            Derivation::Unchanged { date: d(2) }
        );
    }

    #[test]
    fn roster_without_post_row_is_out_of_range() {
        let mut roster = Roster::with_shifts(
            MonthKey::new(2025, 7).unwrap(),
            vec![ShiftType::Call, ShiftType::Off],
        )
        .unwrap();
        roster.set_cell(d(1), &ShiftType::Call, Some(boss())).unwrap();
        assert_eq!(apply_derivation(&mut roster, d(1)), Derivation::OutOfRange);
    }

    #[test]
    fn call_overwrites_existing_post() {
        let mut roster = roster();
        roster
            .set_cell(d(2), &ShiftType::Post, PersonId::new("OTHER").ok())
            .unwrap();
        roster.set_cell(d(1), &ShiftType::Call, Some(boss())).unwrap();
        assert_eq!(
            apply_derivation(&mut roster, d(1)),
            Derivation::Assigned {
                date: d(2),
                person: boss()
            }
        );
        assert_eq!(roster.person(d(2), &ShiftType::Post), Some(&boss()));
    }

    #[test]
    fn call_on_last_representable_day_is_out_of_range() {
        let month = MonthKey::new(NaiveDate::MAX.year(), 12).unwrap();
        let mut roster = Roster::new(month);
        let last = *roster.dates().last().unwrap();
        roster.set_cell(last, &ShiftType::Call, Some(boss())).unwrap();
        assert_eq!(apply_derivation(&mut roster, last), Derivation::OutOfRange);
    }
}
