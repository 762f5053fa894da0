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

pub mod scenario;
pub mod replay;

use vigil::handle::Sink;

/// Own aircraft state as of the latest telemetry tick. Replaced wholesale,
/// never patched field by field.
#[derive(PartialEq, Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct OwnshipState {
    pub valid: bool,
    /// Latitude in deg
    pub lat: Option<f64>,
    /// Longitude in deg
    pub lon: Option<f64>,
    /// Altitude in ft
    pub altitude: Option<f64>,
    /// Heading in deg, GPS track where available
    pub heading: Option<f64>,
}

impl OwnshipState {
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

/// One aircraft in the traffic snapshot. The snapshot is unordered and
/// fully replaced each telemetry tick; a target absent from the latest
/// snapshot is gone.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TrafficTarget {
    /// ICAO hex or tail, the snapshot key
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    /// Altitude in ft
    pub altitude: Option<f64>,
    /// Vertical rate in fpm
    pub vvel: Option<f64>,
    /// Track in deg
    pub track: Option<f64>,
    /// Seconds since the last report for this target
    pub age: f64,
    pub on_ground: bool,
    pub extrapolated: bool,
}

#[derive(PartialEq, Debug, Clone)]
/// Represents data received from the telemetry layer
pub enum TelemetryData {
    Ownship(OwnshipState),
    Traffic(Vec<TrafficTarget>),
}

/// A type for representing a telemetry source
pub trait TelemetrySource {
    /// Run the source, may or may not yield any result. On failure the
    /// engine keeps the last-known state.
    fn poll(&mut self, h: &mut Sink<TelemetryData>);
}
