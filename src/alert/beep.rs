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

//! Rate-limited tone channel.

use std::time::{Duration, Instant};
use backend::{AudioBackend, TonePattern};
use controls::Mode;
use super::filter::AlertCandidate;

const COOLDOWN_MS: u64 = 2000;

/// The re-fire key: same target in the same 0.1 nm distance bucket is the
/// same alert. A bucket change re-fires immediately, even inside the
/// cooldown.
fn alert_key(c: &AlertCandidate) -> (String, i64) {
    (c.id.clone(), (c.distance_nm * 10.0).round() as i64)
}

#[derive(Debug, Default)]
pub struct BeepChannel {
    last_fired: Option<Instant>,
    last_key: Option<(String, i64)>,
}

impl BeepChannel {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn maybe_beep(&mut self,
                      backend: &mut AudioBackend,
                      c: &AlertCandidate,
                      now: Instant,
                      mode: Mode)
                      -> bool {
        match mode {
            Mode::Beep | Mode::Both => {}
            _ => return false,
        }

        if !backend.armed() {
            return false;
        }

        let key = alert_key(c);

        let due = match self.last_fired {
            None => true,
            Some(t) => {
                now - t >= Duration::from_millis(COOLDOWN_MS) ||
                self.last_key.as_ref() != Some(&key)
            }
        };

        if !due {
            return false;
        }

        debug!("beep for {} at {:.1} nm", c.id, c.distance_nm);
        backend.play(&TonePattern::traffic_alert());
        self.last_fired = Some(now);
        self.last_key = Some(key);

        true
    }
}
