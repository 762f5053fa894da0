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

pub mod tone;
pub mod speech;

/// A single tone followed by a gap before the next one starts.
#[derive(PartialEq, Debug, Clone)]
pub struct Tone {
    pub freq_hz: f64,
    pub ms: u64,
    pub gap_ms: u64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TonePattern {
    pub tones: Vec<Tone>,
}

impl TonePattern {
    /// The standard traffic annunciation: two tones with onsets ~180 ms
    /// apart.
    pub fn traffic_alert() -> Self {
        Self {
            tones: vec![Tone {
                            freq_hz: 900.0,
                            ms: 120,
                            gap_ms: 60,
                        },
                        Tone {
                            freq_hz: 650.0,
                            ms: 120,
                            gap_ms: 0,
                        }],
        }
    }
}

/// Tone output capability. `armed` flips true only after a host-observed
/// user gesture; the engine never initiates that gesture itself.
pub trait AudioBackend {
    fn armed(&self) -> bool;
    /// Fire and forget; synthesis and playback latency belong to the
    /// backend, not the engine.
    fn play(&mut self, pattern: &TonePattern);
}

/// Speech output capability. Completion is observed by polling `busy`
/// from the coordinator tick.
pub trait SpeechBackend {
    fn busy(&mut self) -> bool;
    fn speak(&mut self, text: &str);
}

/// Inert audio backend for tests and hosts without a tone device.
#[derive(Debug, Default)]
pub struct NullAudio {
    pub armed: bool,
    pub played: usize,
}

impl AudioBackend for NullAudio {
    fn armed(&self) -> bool {
        self.armed
    }

    fn play(&mut self, _pattern: &TonePattern) {
        self.played += 1;
    }
}

/// Inert speech backend recording what would have been said.
#[derive(Debug, Default)]
pub struct NullSpeech {
    pub busy: bool,
    pub spoken: Vec<String>,
}

impl SpeechBackend for NullSpeech {
    fn busy(&mut self) -> bool {
        self.busy
    }

    fn speak(&mut self, text: &str) {
        self.spoken.push(text.to_string());
    }
}
