//! Event timeline: orders historical events and assigns arrival times.
//!
//! The simulation replays history compressed: events are sorted by date
//! and released one after another at a fixed spacing from the simulation
//! origin. Ties on date keep their input order.

use timestream_types::Event;

/// Default spacing between consecutive event arrivals, in seconds.
pub const EVENT_INTERVAL_SECS: f64 = 10.0;

/// An event paired with the simulation time at which it "arrives".
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    /// Simulation time of arrival.
    pub arrival_time: f64,
    /// The historical event.
    pub event: Event,
}

/// Schedule `events` from `origin_time` at the default 10-second spacing.
pub fn schedule(events: &[Event], origin_time: f64) -> Vec<ScheduledEvent> {
    schedule_with_interval(events, origin_time, EVENT_INTERVAL_SECS)
}

/// Schedule `events` from `origin_time`, one every `interval_secs`.
///
/// The event at sorted position `i` arrives at
/// `origin_time + i * interval_secs`. The sort is stable.
pub fn schedule_with_interval(
    events: &[Event],
    origin_time: f64,
    interval_secs: f64,
) -> Vec<ScheduledEvent> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    sorted
        .into_iter()
        .zip(0_u32..)
        .map(|(event, position)| ScheduledEvent {
            arrival_time: f64::from(position).mul_add(interval_secs, origin_time),
            event: event.clone(),
        })
        .collect()
}

/// The first scheduled event that arrived within the last `window`
/// seconds of `t`, if any.
pub fn active_event(schedule: &[ScheduledEvent], t: f64, window: f64) -> Option<&Event> {
    schedule
        .iter()
        .find(|entry| {
            let dt = t - entry.arrival_time;
            (0.0..window).contains(&dt)
        })
        .map(|entry| &entry.event)
}
