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

use time::{now_utc, Tm};
use std::time::Instant;
use std::collections::VecDeque;

/// Read-only view of the current tick: wall clock, monotonic clock and
/// loop frequency. All channel cooldowns and locks are measured against
/// `now()`, never against the wall clock.
pub trait Handle {
    fn utc(&self) -> Tm;
    fn now(&self) -> Instant;
    fn hz(&self) -> u16;
}

pub trait Sink<D>: Handle {
    fn emit(&mut self, d: D);
}

pub struct TickHandle {
    utc: Tm,
    clock: Instant,
    freq: u16,
}

impl Handle for TickHandle {
    fn utc(&self) -> Tm {
        self.utc
    }

    fn now(&self) -> Instant {
        self.clock
    }

    fn hz(&self) -> u16 {
        self.freq
    }
}

impl TickHandle {
    pub fn new(freq: u16) -> Self {
        Self {
            utc: now_utc(),
            clock: Instant::now(),
            freq,
        }
    }
}

pub struct SinkHandle<'a, H, D>
    where D: 'a,
          H: 'a + Handle
{
    handle: &'a mut H,
    queue: &'a mut VecDeque<D>,
}

impl<'a, H, D> Handle for SinkHandle<'a, H, D>
    where H: 'a + Handle
{
    fn utc(&self) -> Tm {
        self.handle.utc()
    }

    fn now(&self) -> Instant {
        self.handle.now()
    }

    fn hz(&self) -> u16 {
        self.handle.hz()
    }
}

impl<'a, H, D> Sink<D> for SinkHandle<'a, H, D>
    where H: 'a + Handle
{
    fn emit(&mut self, d: D) {
        self.queue.push_back(d);
    }
}

impl<'a, H, D> SinkHandle<'a, H, D>
    where H: 'a + Handle
{
    pub fn new(handle: &'a mut H, queue: &'a mut VecDeque<D>) -> Self {
        Self { handle, queue }
    }
}
