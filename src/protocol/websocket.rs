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

//! Pushes the render feed to display clients. The feed is one-way; the
//! renderer owns every drawing and DOM concern.

use super::*;
use std::thread::{spawn, JoinHandle};
use alert::Report;
use ws;
use serde_json;

pub struct WebSocket {
    ws_broadcaster: ws::Sender,
    _handle: JoinHandle<()>,
}

impl WebSocket {
    pub fn new(addr: String) -> Box<Self> {
        // spawn WS thread

        let socket = ws::WebSocket::new(|_| {
            move |_| {
                panic!("The render feed is one-way, clients cannot send to it.")
            }
        }).expect("Unable to create WebSocket");

        let ws_broadcaster = socket.broadcaster();

        let handle = spawn(move || { socket.listen(addr).expect("Unable to run WebSocket."); });
        debug!("spawned WebSocket thread");

        Box::new(Self {
                     _handle: handle,
                     ws_broadcaster,
                 })
    }

    fn send(&self, js: serde_json::Value) {
        if let Err(e) = self.ws_broadcaster.send(js.to_string()) {
            warn!("unable to broadcast render feed: {}", e);
        }
    }
}

impl Protocol for WebSocket {
    fn run(&mut self, _handle: &mut Handle, i: ChainedIter) {
        for r in i {
            match *r {
                Report::Render(ref m) => {
                    let mut js = serde_json::to_value(m).unwrap();
                    js["type"] = "Render".into();

                    self.send(js);
                }
                Report::Utterance(ref u) => {
                    let mut js = serde_json::Value::Object(Default::default());
                    js["type"] = "Utterance".into();
                    js["text"] = u.clone().into();

                    self.send(js);
                }
            }
        }
    }
}
