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

//! Scripted bench scenario: a fixed ownship with one intruder converging
//! from the east, plus a parked target and a distant cruiser. Restarts
//! from the top once the intruder is on top of us.

use std::env;
use chrono::prelude::*;
use super::*;
use vigil::handle::Sink;

const EMIT_FREQ: u16 = 1;
const START_ENV: &str = "VIGIL_SCENARIO_START";

const OWN_LAT: f64 = 40.0;
const OWN_LON: f64 = -75.0;
// one nautical mile of longitude at the scenario latitude
const LON_DEG_PER_NM: f64 = 1.0 / (60.0 * 0.76604444);
const INTRUDER_START_NM: f64 = 4.0;
const INTRUDER_RESET_NM: f64 = 0.2;
// ~120 kt closure
const INTRUDER_NM_PER_SEC: f64 = 0.0333;
const INTRUDER_FPM: f64 = 350.0;

pub struct Scenario {
    counter: u32,
    t: f64,
    start: Option<DateTime<UTC>>,
    holding: bool,
}

impl Scenario {
    pub fn new(start: Option<DateTime<UTC>>) -> Self {
        Self {
            counter: 0,
            t: 0.0,
            start,
            holding: false,
        }
    }

    /// Start time comes from `VIGIL_SCENARIO_START` (RFC 3339) when set;
    /// a malformed value is ignored with a warning.
    pub fn from_env() -> Self {
        let start = match env::var(START_ENV) {
            Ok(ref s) => {
                match DateTime::parse_from_rfc3339(s) {
                    Ok(dt) => Some(dt.with_timezone(&UTC)),
                    Err(e) => {
                        warn!("ignoring malformed {}: {}", START_ENV, e);
                        None
                    }
                }
            }
            Err(_) => None,
        };

        Scenario::new(start)
    }

    fn ownship() -> OwnshipState {
        OwnshipState {
            valid: true,
            lat: Some(OWN_LAT),
            lon: Some(OWN_LON),
            altitude: Some(1000.0),
            heading: Some(90.0),
        }
    }

    fn traffic(&self) -> Vec<TrafficTarget> {
        let east_nm = INTRUDER_START_NM - INTRUDER_NM_PER_SEC * self.t;

        vec![TrafficTarget {
                 id: "A1B2C3".to_string(),
                 lat: OWN_LAT,
                 lon: OWN_LON + east_nm * LON_DEG_PER_NM,
                 altitude: Some(1300.0 + INTRUDER_FPM / 60.0 * self.t),
                 vvel: Some(INTRUDER_FPM),
                 track: Some(270.0),
                 age: 1.0,
                 on_ground: false,
                 extrapolated: false,
             },
             TrafficTarget {
                 id: "N512R".to_string(),
                 lat: OWN_LAT + 0.01,
                 lon: OWN_LON + 0.01,
                 altitude: Some(980.0),
                 vvel: Some(0.0),
                 track: None,
                 age: 3.0,
                 on_ground: true,
                 extrapolated: false,
             },
             TrafficTarget {
                 id: "A29CBF".to_string(),
                 lat: OWN_LAT - 0.12,
                 lon: OWN_LON - 0.1,
                 altitude: Some(7500.0),
                 vvel: Some(-400.0),
                 track: Some(45.0),
                 age: 2.0,
                 on_ground: false,
                 extrapolated: true,
             }]
    }
}

impl TelemetrySource for Scenario {
    fn poll(&mut self, h: &mut Sink<TelemetryData>) {
        run_every!(EMIT_FREQ, self.counter, h, {
            if let Some(start) = self.start {
                if UTC::now() < start {
                    if !self.holding {
                        info!("scenario holding until {}", start);
                        self.holding = true;
                    }
                    h.emit(TelemetryData::Ownship(Scenario::ownship()));
                    return;
                }
            }

            self.t += 1.0;
            if INTRUDER_START_NM - INTRUDER_NM_PER_SEC * self.t < INTRUDER_RESET_NM {
                info!("scenario restarting");
                self.t = 0.0;
            }

            h.emit(TelemetryData::Ownship(Scenario::ownship()));
            h.emit(TelemetryData::Traffic(self.traffic()));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use vigil::handle::{SinkHandle, TickHandle};
    use std::collections::VecDeque;

    fn drain(s: &mut Scenario) -> Vec<TelemetryData> {
        let mut q = VecDeque::new();

        {
            let mut b = TickHandle::new(1);
            let mut h = SinkHandle::new(&mut b, &mut q);
            s.poll(&mut h);
        }

        q.into_iter().collect()
    }

    #[test]
    fn test_emits_ownship_and_traffic() {
        let mut s = Scenario::new(None);
        let out = drain(&mut s);

        assert_eq!(out.len(), 2);
        match out[0] {
            TelemetryData::Ownship(ref o) => {
                assert!(o.valid);
                assert_eq!(o.heading, Some(90.0));
            }
            _ => panic!("expected ownship first"),
        }
        match out[1] {
            TelemetryData::Traffic(ref ts) => {
                assert_eq!(ts.len(), 3);
                assert!(ts.iter().any(|t| t.on_ground));
            }
            _ => panic!("expected traffic second"),
        }
    }

    #[test]
    fn test_intruder_converges() {
        let mut s = Scenario::new(None);

        let lon_at = |out: &[TelemetryData]| match out[1] {
            TelemetryData::Traffic(ref ts) => ts[0].lon,
            _ => panic!("expected traffic"),
        };

        let first = drain(&mut s);
        let second = drain(&mut s);

        assert!(lon_at(&second) < lon_at(&first));
    }

    #[test]
    fn test_future_start_holds_traffic() {
        let start = UTC::now() + Duration::hours(1);
        let mut s = Scenario::new(Some(start));
        let out = drain(&mut s);

        assert_eq!(out.len(), 1);
        match out[0] {
            TelemetryData::Ownship(_) => {}
            _ => panic!("expected ownship only while holding"),
        }
    }
}
