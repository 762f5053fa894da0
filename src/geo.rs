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

//! Great-circle primitives on a spherical Earth.

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const METERS_PER_NM: f64 = 1852.0;

/// Haversine great-circle distance in nautical miles. Non-finite input
/// propagates to a non-finite result, never a panic.
pub fn distance_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlam = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) +
            phi1.cos() * phi2.cos() * (dlam / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c / METERS_PER_NM
}

/// Initial great-circle bearing from point 1 to point 2, in [0, 360).
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlam = (lon2 - lon1).to_radians();

    let y = dlam.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlam.cos();

    norm_deg(y.atan2(x).to_degrees())
}

/// Bearing relative to the given heading, in [0, 360). 0 is dead ahead.
pub fn relative_bearing(bearing: f64, heading: f64) -> f64 {
    norm_deg(bearing - heading)
}

/// 12-position clock reference for a relative bearing: round(rel / 30)
/// mod 12, with 0 mapped to 12.
pub fn clock_position(rel_bearing: f64) -> u8 {
    let c = ((rel_bearing / 30.0).round() as i64) % 12;

    if c == 0 { 12 } else { c as u8 }
}

fn norm_deg(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}
