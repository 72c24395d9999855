//! Monitor: append-only activity ledger and the report derived from it.
//!
//! Systems notify the monitor at every rider/driver milestone, in
//! increasing timestamp order. The report aggregates wait times and driven
//! distances from the per-actor activity lists alone; it never looks at
//! live entity state.

use std::collections::HashMap;

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::grid::{manhattan_distance, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorCategory {
    Rider,
    Driver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Request,
    Cancel,
    Pickup,
    Dropoff,
}

/// One timestamped, located milestone of a rider or driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub time: u64,
    pub kind: ActivityKind,
    pub actor: String,
    pub location: Location,
}

/// Aggregates over a finished run. Each average is `None` when no actor
/// qualifies, rather than dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonitorReport {
    /// Mean ticks between a rider's request and their next milestone
    /// (pickup or cancel), over riders with at least two activities.
    pub average_rider_wait_time: Option<f64>,
    /// Mean total Manhattan distance between a driver's consecutive
    /// activity locations, over drivers with any activity.
    pub average_driver_total_distance: Option<f64>,
    /// Same, restricted to segments that start at a pickup.
    pub average_driver_ride_distance: Option<f64>,
}

/// Keeps a record of activities it is notified about, per category per
/// actor, chronological by notification order.
#[derive(Debug, Default, Resource)]
pub struct Monitor {
    riders: HashMap<String, Vec<Activity>>,
    drivers: HashMap<String, Vec<Activity>>,
}

impl Monitor {
    pub fn notify(
        &mut self,
        time: u64,
        category: ActorCategory,
        kind: ActivityKind,
        actor_id: &str,
        location: Location,
    ) {
        let ledger = match category {
            ActorCategory::Rider => &mut self.riders,
            ActorCategory::Driver => &mut self.drivers,
        };
        ledger
            .entry(actor_id.to_string())
            .or_default()
            .push(Activity {
                time,
                kind,
                actor: actor_id.to_string(),
                location,
            });
    }

    pub fn activities_for(&self, category: ActorCategory, actor_id: &str) -> &[Activity] {
        let ledger = match category {
            ActorCategory::Rider => &self.riders,
            ActorCategory::Driver => &self.drivers,
        };
        ledger.get(actor_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn report(&self) -> MonitorReport {
        MonitorReport {
            average_rider_wait_time: self.average_wait_time(),
            average_driver_total_distance: self.average_total_distance(),
            average_driver_ride_distance: self.average_ride_distance(),
        }
    }

    fn average_wait_time(&self) -> Option<f64> {
        let mut total = 0u64;
        let mut count = 0u64;
        for activities in self.riders.values() {
            // Fewer than two activities: the rider is still waiting.
            if let [request, resolution, ..] = activities.as_slice() {
                total += resolution.time - request.time;
                count += 1;
            }
        }
        (count > 0).then(|| total as f64 / count as f64)
    }

    fn average_total_distance(&self) -> Option<f64> {
        self.average_driver_distance(|_| true)
    }

    fn average_ride_distance(&self) -> Option<f64> {
        self.average_driver_distance(|segment_start| segment_start.kind == ActivityKind::Pickup)
    }

    /// Mean over drivers of the summed distance between consecutive
    /// activities whose starting activity passes `include`.
    fn average_driver_distance(&self, include: impl Fn(&Activity) -> bool) -> Option<f64> {
        let mut total = 0u64;
        let mut count = 0u64;
        for activities in self.drivers.values() {
            for pair in activities.windows(2) {
                if include(&pair[0]) {
                    total += manhattan_distance(pair[0].location, pair[1].location);
                }
            }
            count += 1;
        }
        (count > 0).then(|| total as f64 / count as f64)
    }
}
