// Vigil - a customizable traffic proximity alerting engine
// Copyright (C) 2017-2018  Datong Sun (dndx@idndx.com)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Lock-guarded speech channel. One target owns the channel for the lock
//! duration; a single pending slot holds the newest utterance while the
//! backend is talking.

use std::time::{Duration, Instant};
use backend::SpeechBackend;
use controls::Mode;
use geo;
use super::filter::AlertCandidate;

const REPEAT_GATE_MS: u64 = 10_000;
const LOCK_MS: u64 = 4500;
const TREND_FPM: f64 = 50.0;

#[derive(Debug, Default)]
pub struct SpeechChannel {
    last_spoken: Option<Instant>,
    last_target: Option<String>,
    locked_target: Option<String>,
    lock_expires: Option<Instant>,
    pending: Option<String>,
}

/// Spoken form of a candidate. Fields with an unset or non-finite source
/// are left out entirely, never spoken as a placeholder.
pub fn utterance(c: &AlertCandidate) -> String {
    let mut parts = vec!["Traffic".to_string()];

    if let Some(rel) = c.relative_bearing {
        if rel.is_finite() {
            parts.push(format!("{} o'clock", geo::clock_position(rel)));
        }
    }

    if c.distance_nm.is_finite() {
        parts.push(format!("{:.1} nautical miles", c.distance_nm));
    }

    if c.alt_delta_ft.is_finite() {
        let hundreds = (c.alt_delta_ft / 100.0).round() * 100.0;

        if hundreds == 0.0 {
            parts.push("same altitude".to_string());
        } else if hundreds > 0.0 {
            parts.push(format!("{:.0} feet above", hundreds));
        } else {
            parts.push(format!("{:.0} feet below", -hundreds));
        }
    }

    if let Some(v) = c.vvel {
        if v.is_finite() {
            let trend = if v > TREND_FPM {
                "climbing"
            } else if v < -TREND_FPM {
                "descending"
            } else {
                "level"
            };
            parts.push(trend.to_string());
        }
    }

    parts.join(", ")
}

impl SpeechChannel {
    pub fn new() -> Self {
        Default::default()
    }

    /// Flushes the pending slot once the backend has finished the previous
    /// utterance. Called every tick, on the coordinator's own execution
    /// context.
    pub fn service(&mut self, backend: &mut SpeechBackend) {
        if self.pending.is_some() && !backend.busy() {
            let text = self.pending.take().unwrap();
            debug!("speaking queued utterance");
            backend.speak(&text);
        }
    }

    pub fn maybe_speak(&mut self,
                       backend: &mut SpeechBackend,
                       c: &AlertCandidate,
                       now: Instant,
                       mode: Mode)
                       -> Option<String> {
        match mode {
            Mode::Speech | Mode::Both => {}
            _ => return None,
        }

        // another target holds the channel
        let locked_out = match (self.locked_target.as_ref(), self.lock_expires) {
            (Some(locked), Some(expires)) => *locked != c.id && now < expires,
            _ => false,
        };
        if locked_out {
            return None;
        }

        // per-target repeat gate; a target change re-speaks immediately
        if let Some(last) = self.last_spoken {
            if self.last_target.as_ref() == Some(&c.id) &&
               now - last < Duration::from_millis(REPEAT_GATE_MS) {
                return None;
            }
        }

        let text = utterance(c);

        if backend.busy() {
            // latest alert wins, never more than one pending
            self.pending = Some(text.clone());
        } else {
            backend.speak(&text);
        }

        self.last_spoken = Some(now);
        self.last_target = Some(c.id.clone());
        self.locked_target = Some(c.id.clone());
        self.lock_expires = Some(now + Duration::from_millis(LOCK_MS));

        Some(text)
    }
}
