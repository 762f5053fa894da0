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

//! Tone playback through `aplay`: patterns are rendered to raw PCM in
//! memory and piped to a short-lived child process.

use std::f64::consts::PI;
use std::io::Write;
use std::process::{Child, Command, Stdio};
use super::{AudioBackend, TonePattern};

const SAMPLE_RATE: u32 = 22050;
const AMPLITUDE: f64 = 0.4;

pub struct Aplay {
    armed: bool,
    children: Vec<Child>,
}

impl Aplay {
    /// Probes for the `aplay` binary; the backend starts un-armed either
    /// way and stays silent until `arm` is called.
    pub fn new() -> Option<Self> {
        let probe = Command::new("aplay").arg("--version").output();

        match probe {
            Ok(ref out) if out.status.success() => Some(Self {
                armed: false,
                children: vec![],
            }),
            _ => {
                warn!("aplay not found, tone alerts unavailable");
                None
            }
        }
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// S16_LE mono samples for the whole pattern, tones and gaps.
    fn render(pattern: &TonePattern) -> Vec<u8> {
        let mut buf = vec![];

        for t in &pattern.tones {
            let samples = SAMPLE_RATE as u64 * t.ms / 1000;
            for n in 0..samples {
                let phase = 2.0 * PI * t.freq_hz * n as f64 / SAMPLE_RATE as f64;
                let s = (phase.sin() * AMPLITUDE * 32767.0) as i16;
                buf.push((s & 0xFF) as u8);
                buf.push(((s >> 8) & 0xFF) as u8);
            }

            let silence = SAMPLE_RATE as u64 * t.gap_ms / 1000;
            for _ in 0..silence {
                buf.push(0);
                buf.push(0);
            }
        }

        buf
    }

    fn reap(&mut self) {
        let mut live = vec![];

        for mut c in self.children.drain(..) {
            if let Ok(None) = c.try_wait() {
                live.push(c);
            }
        }

        self.children = live;
    }
}

impl AudioBackend for Aplay {
    fn armed(&self) -> bool {
        self.armed
    }

    fn play(&mut self, pattern: &TonePattern) {
        self.reap();

        let spawned = Command::new("aplay")
            .args(&["-q", "-t", "raw", "-f", "S16_LE", "-c", "1", "-r"])
            .arg(format!("{}", SAMPLE_RATE))
            .stdin(Stdio::piped())
            .spawn();

        let mut child = match spawned {
            Ok(c) => c,
            Err(e) => {
                warn!("unable to spawn aplay: {}", e);
                return;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&Aplay::render(pattern)) {
                warn!("unable to write tone samples: {}", e);
            }
        }

        self.children.push(child);
    }
}
