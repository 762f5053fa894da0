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

//! User-tunable alerting thresholds. Every threshold comes from a fixed
//! preset list; anything else found in persisted state is snapped back to
//! the default.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use serde_json;

pub const PLOT_RANGES_NM: [f64; 5] = [2.0, 5.0, 10.0, 20.0, 40.0];
pub const ALERT_RANGES_NM: [f64; 4] = [1.0, 2.0, 5.0, 10.0];
pub const ALT_BANDS_FT: [f64; 4] = [500.0, 1000.0, 2000.0, 5000.0];

pub const DEFAULT_PLOT_RANGE_NM: f64 = 5.0;
pub const DEFAULT_ALERT_RANGE_NM: f64 = 2.0;
pub const DEFAULT_ALT_BAND_FT: f64 = 1000.0;

#[derive(PartialEq, Debug, Copy, Clone, Serialize, Deserialize)]
pub enum Mode {
    Off,
    Both,
    Speech,
    Beep,
}

impl Mode {
    /// The cycling action only ever walks this ring; direct assignment is
    /// a separate, unrestricted operation.
    pub fn cycle(self) -> Mode {
        match self {
            Mode::Off => Mode::Both,
            Mode::Both => Mode::Speech,
            Mode::Speech => Mode::Beep,
            Mode::Beep => Mode::Off,
        }
    }
}

#[derive(PartialEq, Debug, Copy, Clone, Serialize, Deserialize)]
pub struct ControlState {
    pub plot_range_nm: f64,
    pub alert_range_nm: f64,
    pub alert_alt_band_ft: f64,
    pub mode: Mode,
}

impl Default for ControlState {
    fn default() -> ControlState {
        ControlState {
            plot_range_nm: DEFAULT_PLOT_RANGE_NM,
            alert_range_nm: DEFAULT_ALERT_RANGE_NM,
            alert_alt_band_ft: DEFAULT_ALT_BAND_FT,
            mode: Mode::Both,
        }
    }
}

impl ControlState {
    /// Snaps any value outside its preset list back to the default.
    /// Returns true when something had to change.
    pub fn sanitize(&mut self) -> bool {
        let mut changed = false;

        if !PLOT_RANGES_NM.iter().any(|&v| v == self.plot_range_nm) {
            warn!("plot range {} not in preset list, using {}",
                  self.plot_range_nm,
                  DEFAULT_PLOT_RANGE_NM);
            self.plot_range_nm = DEFAULT_PLOT_RANGE_NM;
            changed = true;
        }

        if !ALERT_RANGES_NM.iter().any(|&v| v == self.alert_range_nm) {
            warn!("alert range {} not in preset list, using {}",
                  self.alert_range_nm,
                  DEFAULT_ALERT_RANGE_NM);
            self.alert_range_nm = DEFAULT_ALERT_RANGE_NM;
            changed = true;
        }

        if !ALT_BANDS_FT.iter().any(|&v| v == self.alert_alt_band_ft) {
            warn!("altitude band {} not in preset list, using {}",
                  self.alert_alt_band_ft,
                  DEFAULT_ALT_BAND_FT);
            self.alert_alt_band_ft = DEFAULT_ALT_BAND_FT;
            changed = true;
        }

        changed
    }
}

pub trait ControlPersistence {
    fn load(&self) -> io::Result<ControlState>;
    fn save(&self, c: &ControlState) -> io::Result<()>;
}

/// Control state in a small JSON file next to the process.
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: &str) -> Self {
        Self { path: PathBuf::from(path) }
    }
}

impl ControlPersistence for JsonFile {
    fn load(&self) -> io::Result<ControlState> {
        let mut buf = String::new();
        File::open(&self.path)?.read_to_string(&mut buf)?;

        let mut c: ControlState = serde_json::from_str(&buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        c.sanitize();

        Ok(c)
    }

    fn save(&self, c: &ControlState) -> io::Result<()> {
        let buf = serde_json::to_string_pretty(c)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        File::create(&self.path)?.write_all(buf.as_bytes())
    }
}
