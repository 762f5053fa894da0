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

pub mod handle;

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use std::thread::sleep;
use telemetry::{TelemetryData, TelemetrySource};
use alert::{Processor, Report};
use protocol::Protocol;
use self::handle::{SinkHandle, TickHandle};

/// The engine event loop. One iteration is one render tick; telemetry
/// sources throttle themselves to their own cadence against the loop
/// frequency. Ticks are strictly sequential, never re-entered.
pub struct Vigil {
    sources: Vec<Box<TelemetrySource>>,
    processors: Vec<Box<Processor>>,
    protocols: Vec<Box<Protocol>>,
    interval: Duration,
    frequency: u16,
    telemetry_queue: VecDeque<TelemetryData>,
    report_queue: VecDeque<Report>,
    handle: TickHandle,
}

impl Vigil {
    pub fn new(freq: u16) -> Self {
        Vigil {
            sources: vec![],
            processors: vec![],
            protocols: vec![],
            telemetry_queue: VecDeque::new(),
            report_queue: VecDeque::new(),
            frequency: freq,
            interval: Duration::from_millis((1000 / freq) as u64),
            handle: TickHandle::new(freq),
        }
    }

    pub fn link_source(&mut self, s: Box<TelemetrySource>) {
        self.sources.push(s);
    }

    pub fn link_processor(&mut self, p: Box<Processor>) {
        self.processors.push(p);
    }

    pub fn link_protocol(&mut self, p: Box<Protocol>) {
        self.protocols.push(p);
    }

    fn run_sources(&mut self) {
        let mut handle = SinkHandle::new(&mut self.handle, &mut self.telemetry_queue);

        for s in self.sources.iter_mut() {
            s.poll(&mut handle);
        }
    }

    fn run_processors(&mut self) {
        let mut handle = SinkHandle::new(&mut self.handle, &mut self.report_queue);

        {
            let (first, second) = self.telemetry_queue.as_slices();
            debug!("total {} telemetry message to process",
                   self.telemetry_queue.len());
            trace!("{:?}", first);
            trace!("{:?}", second);

            for p in self.processors.iter_mut() {
                p.run(&mut handle, first.iter().chain(second.iter()));
            }
        }

        self.telemetry_queue.clear();
    }

    fn run_protocols(&mut self) {
        {
            let (first, second) = self.report_queue.as_slices();
            debug!("total {} report message to process",
                   self.report_queue.len());
            trace!("{:?}", first);
            trace!("{:?}", second);

            for p in self.protocols.iter_mut() {
                p.run(&mut self.handle, first.iter().chain(second.iter()));
            }
        }

        self.report_queue.clear();
    }

    pub fn run(&mut self) {
        loop {
            // main event loop
            let before = Instant::now();

            // update the handle
            self.handle = TickHandle::new(self.frequency);

            self.run_sources();
            self.run_processors();
            self.run_protocols();

            let elapsed = before.elapsed();

            if elapsed < self.interval {
                sleep(self.interval - elapsed);
            } else {
                warn!("loop unable to keep up with the set frequency");
            }
        }
    }
}

impl Default for Vigil {
    fn default() -> Vigil {
        Vigil::new(10)
    }
}
