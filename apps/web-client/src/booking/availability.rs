//! Reserved nights for a unit.
//!
//! Advisory only: used to grey out calendar dates. A failed fetch degrades to
//! "everything selectable" and the server rejects real conflicts at submit.

use std::collections::BTreeSet;

use time::Date;
use tracing::{debug, warn};

use crate::dates::parse_iso_date;
use crate::http::endpoints;
use crate::http::AuthPipeline;
use crate::view::ViewScope;

/// Dates already reserved for `unit_id`; empty if they cannot be fetched.
pub async fn fetch_unavailable_dates(api: &AuthPipeline, unit_id: i64) -> BTreeSet<Date> {
    let raw: Vec<String> = match api.get_json(&endpoints::unit_availability(unit_id)).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(unit_id, code = %e.code(), error = %e, "availability unavailable; allowing all dates");
            return BTreeSet::new();
        }
    };

    raw.iter()
        .filter_map(|entry| match parse_iso_date(entry) {
            Ok(date) => Some(date),
            Err(e) => {
                debug!(unit_id, entry = %entry, error = %e, "skipping unreadable availability date");
                None
            }
        })
        .collect()
}

/// Date-picker state for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityCalendar {
    pub unit_id: i64,
    unavailable: BTreeSet<Date>,
    loaded: bool,
}

impl AvailabilityCalendar {
    pub fn new(unit_id: i64) -> Self {
        Self {
            unit_id,
            unavailable: BTreeSet::new(),
            loaded: false,
        }
    }

    /// Fetch reserved dates and apply them unless `scope` was unmounted
    /// meanwhile. Returns whether the result was applied.
    pub async fn load(&mut self, api: &AuthPipeline, scope: &ViewScope) -> bool {
        match scope.run(fetch_unavailable_dates(api, self.unit_id)).await {
            Some(dates) => {
                self.unavailable = dates;
                self.loaded = true;
                true
            }
            None => {
                debug!(unit_id = self.unit_id, "view gone; discarding availability");
                false
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn unavailable(&self) -> &BTreeSet<Date> {
        &self.unavailable
    }

    /// Selectable: not before `today` and not already reserved.
    pub fn is_selectable(&self, date: Date, today: Date) -> bool {
        date >= today && !self.unavailable.contains(&date)
    }

    /// Whether every night in `[check_in, check_out)` is free.
    pub fn range_is_free(&self, check_in: Date, check_out: Date) -> bool {
        check_in >= check_out || self.unavailable.range(check_in..check_out).next().is_none()
    }
}
