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

//! Speech through `espeak-ng`. One utterance is one child process; the
//! backend is busy while that child runs.

use std::process::{Child, Command};
use super::SpeechBackend;

const VOICE: &str = "en-us";
const WPM: &str = "170";

pub struct Espeak {
    child: Option<Child>,
}

impl Espeak {
    pub fn new() -> Option<Self> {
        let probe = Command::new("espeak-ng").arg("--version").output();

        match probe {
            Ok(ref out) if out.status.success() => Some(Self { child: None }),
            _ => {
                warn!("espeak-ng not found, spoken alerts unavailable");
                None
            }
        }
    }
}

impl SpeechBackend for Espeak {
    fn busy(&mut self) -> bool {
        let done = match self.child {
            Some(ref mut c) => {
                match c.try_wait() {
                    Ok(None) => return true,
                    Ok(Some(_)) => true,
                    Err(e) => {
                        warn!("unable to poll espeak-ng: {}", e);
                        true
                    }
                }
            }
            None => false,
        };

        if done {
            self.child = None;
        }

        false
    }

    fn speak(&mut self, text: &str) {
        match Command::new("espeak-ng")
                  .args(&["-v", VOICE, "-s", WPM])
                  .arg(text)
                  .spawn() {
            Ok(c) => self.child = Some(c),
            Err(e) => warn!("unable to spawn espeak-ng: {}", e),
        }
    }
}
