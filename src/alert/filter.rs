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

//! Picks the single alert-worthy target out of a traffic snapshot.

use geo;
use telemetry::{OwnshipState, TrafficTarget};

/// A target older than this is no longer trusted for alerting.
pub const MAX_AGE_SECS: f64 = 15.0;

/// The nearest in-band target, derived fresh every tick. Distance is
/// always finite and strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertCandidate {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_nm: f64,
    pub bearing_deg: f64,
    /// None when ownship heading is unset
    pub relative_bearing: Option<f64>,
    pub alt_delta_ft: f64,
    pub vvel: Option<f64>,
    pub age: f64,
    pub extrapolated: bool,
}

/// Nearest target within the vertical band, without any horizontal range
/// gate: range classification is the coordinator's job, so displays can
/// still show the candidate as ordinary traffic. Ties go to the earlier
/// entry in the snapshot.
pub fn select_candidate(ownship: &OwnshipState,
                        targets: &[TrafficTarget],
                        alert_alt_band_ft: f64)
                        -> Option<AlertCandidate> {
    if !ownship.valid {
        return None;
    }

    let (own_lat, own_lon) = match ownship.position() {
        Some(p) => p,
        None => return None,
    };

    let own_alt = match ownship.altitude {
        Some(a) if a.is_finite() => a,
        _ => return None,
    };

    let mut best: Option<AlertCandidate> = None;

    for t in targets {
        if !t.lat.is_finite() || !t.lon.is_finite() {
            continue;
        }

        if t.on_ground || t.age > MAX_AGE_SECS {
            continue;
        }

        let d = geo::distance_nm(own_lat, own_lon, t.lat, t.lon);
        if !d.is_finite() || d <= 0.0 {
            continue;
        }

        let alt = match t.altitude {
            Some(a) if a.is_finite() => a,
            _ => continue,
        };

        let delta = alt - own_alt;
        if delta.abs() > alert_alt_band_ft {
            continue;
        }

        if let Some(ref b) = best {
            if d >= b.distance_nm {
                continue;
            }
        }

        let bearing = geo::bearing_deg(own_lat, own_lon, t.lat, t.lon);
        let relative = match ownship.heading {
            Some(h) if h.is_finite() => Some(geo::relative_bearing(bearing, h)),
            _ => None,
        };

        best = Some(AlertCandidate {
            id: t.id.clone(),
            lat: t.lat,
            lon: t.lon,
            distance_nm: d,
            bearing_deg: bearing,
            relative_bearing: relative,
            alt_delta_ft: delta,
            vvel: match t.vvel {
                Some(v) if v.is_finite() => Some(v),
                _ => None,
            },
            age: t.age,
            extrapolated: t.extrapolated,
        });
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::NAN;

    fn ownship() -> OwnshipState {
        OwnshipState {
            valid: true,
            lat: Some(40.0),
            lon: Some(-75.0),
            altitude: Some(1000.0),
            heading: Some(90.0),
        }
    }

    fn target(id: &str, lon: f64, altitude: f64) -> TrafficTarget {
        TrafficTarget {
            id: id.to_string(),
            lat: 40.0,
            lon,
            altitude: Some(altitude),
            vvel: Some(0.0),
            track: None,
            age: 2.0,
            on_ground: false,
            extrapolated: false,
        }
    }

    #[test]
    fn test_deterministic() {
        let own = ownship();
        let ts = vec![target("A", -74.9, 1200.0), target("B", -74.95, 1300.0)];

        let first = select_candidate(&own, &ts, 1000.0).unwrap();
        let second = select_candidate(&own, &ts, 1000.0).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_nearest_wins() {
        let own = ownship();
        let ts = vec![target("FAR", -74.8, 1200.0), target("NEAR", -74.95, 1300.0)];

        let c = select_candidate(&own, &ts, 1000.0).unwrap();
        assert_eq!(c.id, "NEAR");
    }

    #[test]
    fn test_tie_goes_to_first_entry() {
        let own = ownship();
        // equidistant, one east and one west
        let ts = vec![target("E", -74.9, 1200.0), target("W", -75.1, 1200.0)];

        let c = select_candidate(&own, &ts, 1000.0).unwrap();
        assert_eq!(c.id, "E");
    }

    #[test]
    fn test_on_ground_never_selected() {
        let own = ownship();
        let mut near = target("GND", -74.99, 1000.0);
        near.on_ground = true;

        let ts = vec![near, target("AIR", -74.9, 1200.0)];
        let c = select_candidate(&own, &ts, 1000.0).unwrap();
        assert_eq!(c.id, "AIR");
    }

    #[test]
    fn test_stale_never_selected() {
        let own = ownship();
        let mut near = target("OLD", -74.99, 1000.0);
        near.age = 20.0;

        let ts = vec![near, target("NEW", -74.9, 1200.0)];
        let c = select_candidate(&own, &ts, 1000.0).unwrap();
        assert_eq!(c.id, "NEW");

        let only_stale = vec![{
            let mut t = target("OLD", -74.99, 1000.0);
            t.age = 20.0;
            t
        }];
        assert!(select_candidate(&own, &only_stale, 1000.0).is_none());
    }

    #[test]
    fn test_out_of_band_excluded_even_if_nearest() {
        let own = ownship();
        let ts = vec![target("HIGH", -74.99, 3000.0), target("INBAND", -74.9, 1200.0)];

        let c = select_candidate(&own, &ts, 1000.0).unwrap();
        assert_eq!(c.id, "INBAND");
    }

    #[test]
    fn test_missing_altitude_excluded() {
        let own = ownship();
        let mut t = target("NOALT", -74.95, 0.0);
        t.altitude = None;

        assert!(select_candidate(&own, &[t], 1000.0).is_none());
    }

    #[test]
    fn test_non_finite_coordinates_excluded() {
        let own = ownship();
        let mut t = target("NAN", NAN, 1200.0);
        t.lat = NAN;

        assert!(select_candidate(&own, &[t], 1000.0).is_none());
    }

    #[test]
    fn test_zero_distance_excluded() {
        let own = ownship();
        let t = target("SELF", -75.0, 1200.0);

        assert!(select_candidate(&own, &[t], 1000.0).is_none());
    }

    #[test]
    fn test_requires_ownship_fix() {
        let mut own = ownship();
        own.valid = false;
        assert!(select_candidate(&own, &[target("A", -74.9, 1200.0)], 1000.0).is_none());

        let mut own = ownship();
        own.lat = None;
        assert!(select_candidate(&own, &[target("A", -74.9, 1200.0)], 1000.0).is_none());

        let mut own = ownship();
        own.altitude = None;
        assert!(select_candidate(&own, &[target("A", -74.9, 1200.0)], 1000.0).is_none());
    }

    #[test]
    fn test_delta_and_geometry() {
        let own = ownship();
        let ts = vec![target("A1B2C3", -74.983, 1300.0)];

        let c = select_candidate(&own, &ts, 1000.0).unwrap();
        assert!((c.distance_nm - 0.78).abs() < 0.02);
        assert_eq!(c.alt_delta_ft, 300.0);
        // due east with an east heading: dead ahead
        assert!(c.relative_bearing.unwrap() < 1.0 ||
                c.relative_bearing.unwrap() > 359.0);
    }

    #[test]
    fn test_relative_bearing_absent_without_heading() {
        let mut own = ownship();
        own.heading = None;

        let c = select_candidate(&own, &[target("A", -74.9, 1200.0)], 1000.0).unwrap();
        assert!(c.relative_bearing.is_none());
    }
}
