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

pub mod filter;
pub mod beep;
pub mod speech;
pub mod coordinator;

use telemetry::TelemetryData;
use vigil::handle::Sink;
use std::iter::Chain;
use std::slice::Iter;

#[derive(Debug, Clone)]
pub enum Report {
    Render(coordinator::RenderModel),
    Utterance(String),
}

pub type ChainedIter<'a> = Chain<Iter<'a, TelemetryData>, Iter<'a, TelemetryData>>;

/// A `Processor` takes in input from the telemetry layer and
/// generates `Report` as necessary for the next layer
pub trait Processor {
    /// Deliver telemetry data `i` to this processor
    fn run(&mut self, handle: &mut Sink<Report>, i: ChainedIter);
}
