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

//! Replays recorded telemetry snapshots from a JSON-lines file, one
//! snapshot per telemetry tick.

use std::fs::File;
use std::io::{BufRead, BufReader};
use serde_json;
use super::*;
use vigil::handle::Sink;

const EMIT_FREQ: u16 = 1;

/// One line of a recording: the full telemetry state at that tick.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub ownship: OwnshipState,
    pub traffic: Vec<TrafficTarget>,
}

pub struct Replay {
    snapshots: Vec<Snapshot>,
    idx: usize,
    repeat: bool,
    counter: u32,
    finished: bool,
}

impl Replay {
    pub fn new(path: &str, repeat: bool) -> Option<Box<Replay>> {
        let f = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("unable to open replay file {}: {}", path, e);
                return None;
            }
        };

        let mut snapshots = vec![];

        for (n, line) in BufReader::new(f).lines().enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("read error in replay file {}: {}", path, e);
                    return None;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<Snapshot>(&line) {
                Ok(s) => snapshots.push(s),
                Err(e) => debug!("skipping bad snapshot at line {}: {}", n + 1, e),
            }
        }

        if snapshots.is_empty() {
            warn!("replay file {} contains no snapshots", path);
            return None;
        }

        info!("loaded {} snapshots from {}", snapshots.len(), path);

        Some(Box::new(Replay {
            snapshots,
            idx: 0,
            repeat,
            counter: 0,
            finished: false,
        }))
    }
}

impl TelemetrySource for Replay {
    fn poll(&mut self, h: &mut Sink<TelemetryData>) {
        run_every!(EMIT_FREQ, self.counter, h, {
            if self.idx >= self.snapshots.len() {
                if self.repeat {
                    self.idx = 0;
                } else {
                    if !self.finished {
                        info!("replay finished");
                        self.finished = true;
                    }
                    return;
                }
            }

            let s = self.snapshots[self.idx].clone();
            self.idx += 1;

            h.emit(TelemetryData::Ownship(s.ownship));
            h.emit(TelemetryData::Traffic(s.traffic));
        });
    }
}
