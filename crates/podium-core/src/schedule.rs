//! Occurrence resolution for daily evaluation schedules.

use chrono::{DateTime, Days, NaiveTime, Utc};

use crate::error::ScheduleError;

/// Resolve the most recent elapsed occurrence of a daily schedule.
///
/// Each slot is an `"HH:MM"` UTC time-of-day. Slots are projected onto the
/// calendar date of `now` and the latest projection at or before `now` is
/// the current occurrence. When every slot is still ahead of `now` today,
/// the latest slot of the previous calendar day is current instead.
///
/// This is a pure per-call computation. Which occurrences were already
/// announced is the ledger's concern, not the resolver's.
pub fn resolve_occurrence(
    slots: &[String],
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    if slots.is_empty() {
        return Err(ScheduleError::EmptySchedule);
    }

    let mut times = Vec::with_capacity(slots.len());
    for slot in slots {
        let time = NaiveTime::parse_from_str(slot, "%H:%M")
            .map_err(|_| ScheduleError::InvalidTimeSlot { slot: slot.clone() })?;
        times.push(time);
    }

    let today = now.date_naive();
    let latest_today = times
        .iter()
        .map(|time| today.and_time(*time).and_utc())
        .filter(|instant| *instant <= now)
        .max();
    if let Some(occurrence) = latest_today {
        return Ok(occurrence);
    }

    // Nothing has elapsed today. `Days` rolls over month and year
    // boundaries; decrementing the day-of-month field does not.
    let yesterday = today - Days::new(1);
    times
        .iter()
        .map(|time| yesterday.and_time(*time).and_utc())
        .max()
        .ok_or(ScheduleError::EmptySchedule)
}
