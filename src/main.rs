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

#[macro_use]
extern crate log;
extern crate chrono;
extern crate env_logger;
extern crate serde;
extern crate serde_json;
#[macro_use]
extern crate serde_derive;
extern crate time;
extern crate ws;

#[macro_use]
mod utils;
mod alert;
mod backend;
mod controls;
mod geo;
mod protocol;
mod telemetry;
mod vigil;

use std::env;
use vigil::Vigil;
use alert::Processor;
use alert::coordinator::AlertCoordinator;
use backend::{AudioBackend, NullAudio, NullSpeech, SpeechBackend};
use controls::{ControlPersistence, ControlState};
use telemetry::TelemetrySource;

const CONTROLS_PATH: &str = "vigil_controls.json";
const REPLAY_ENV: &str = "VIGIL_REPLAY";
const REPLAY_LOOP_ENV: &str = "VIGIL_REPLAY_LOOP";

fn main() {
    env_logger::init().unwrap();

    let store = controls::JsonFile::new(CONTROLS_PATH);
    let ctl = match store.load() {
        Ok(c) => c,
        Err(e) => {
            warn!("unable to load controls ({}), using defaults", e);
            ControlState::default()
        }
    };

    let mut v = Vigil::new(10); // 10 Hz render tick

    let mut have_source = false;
    if let Ok(path) = env::var(REPLAY_ENV) {
        let repeat = env::var(REPLAY_LOOP_ENV).is_ok();
        telemetry::replay::Replay::new(&path, repeat).and_then(&mut |r: Box<telemetry::replay::Replay>| {
            v.link_source(r as Box<TelemetrySource>);
            have_source = true;
            Some(())
        });
    }
    if !have_source {
        v.link_source(Box::new(telemetry::scenario::Scenario::from_env()) as
                      Box<TelemetrySource>);
    }

    let audio: Box<AudioBackend> = match backend::tone::Aplay::new() {
        Some(mut a) => {
            // starting the process is this host's arming gesture
            a.arm();
            Box::new(a)
        }
        None => Box::new(NullAudio::default()),
    };

    let speech: Box<SpeechBackend> = match backend::speech::Espeak::new() {
        Some(s) => Box::new(s),
        None => Box::new(NullSpeech::default()),
    };

    v.link_processor(Box::new(AlertCoordinator::new(ctl, audio, speech)) as Box<Processor>);

    v.link_protocol(protocol::websocket::WebSocket::new(
        "0.0.0.0:9001".to_string(),
    ));

    v.run();
}
