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

//! Maintains the alerting situation: keeps the latest telemetry, classifies
//! each tick, drives the notification channels and emits the render model.

use super::*;
use geo;
use telemetry::{OwnshipState, TelemetryData, TrafficTarget};
use backend::{AudioBackend, SpeechBackend};
use controls::{ControlState, Mode};
use super::filter::{self, AlertCandidate};
use super::beep::BeepChannel;
use super::speech::SpeechChannel;

#[derive(Debug, PartialEq, Copy, Clone, Serialize)]
pub enum AlertState {
    NoCandidate,
    CandidateOutOfRange,
    CandidateInRange,
}

/// One traffic entry annotated for the radar view, clipped to the plot
/// range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficView {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub altitude: Option<f64>,
    pub distance_nm: f64,
    pub bearing_deg: f64,
    pub relative_bearing: Option<f64>,
    pub age: f64,
    pub stale: bool,
    pub on_ground: bool,
    pub extrapolated: bool,
}

/// Everything the external renderer needs for one frame. Drawing, map and
/// DOM concerns stay on the other side of the websocket.
#[derive(Debug, Clone, Serialize)]
pub struct RenderModel {
    pub utc: String,
    pub state: AlertState,
    pub summary: Option<String>,
    pub candidate: Option<AlertCandidate>,
    pub ownship: OwnshipState,
    pub traffic: Vec<TrafficView>,
    pub controls: ControlState,
    pub audio_armed: bool,
    pub speech_busy: bool,
    /// flash cue: a beep fired on this tick
    pub beeped: bool,
}

pub struct AlertCoordinator {
    ownship: OwnshipState,
    traffic: Vec<TrafficTarget>,
    controls: ControlState,
    beep: BeepChannel,
    speech: SpeechChannel,
    audio: Box<AudioBackend>,
    speech_backend: Box<SpeechBackend>,
}

impl AlertCoordinator {
    pub fn new(mut controls: ControlState,
               audio: Box<AudioBackend>,
               speech_backend: Box<SpeechBackend>)
               -> Self {
        controls.sanitize();

        Self {
            ownship: OwnshipState::default(),
            traffic: vec![],
            controls,
            beep: BeepChannel::new(),
            speech: SpeechChannel::new(),
            audio,
            speech_backend,
        }
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.controls.mode = mode;
    }

    pub fn cycle_mode(&mut self) -> Mode {
        self.controls.mode = self.controls.mode.cycle();
        info!("alert mode now {:?}", self.controls.mode);
        self.controls.mode
    }

    fn classify(&self, candidate: &Option<AlertCandidate>) -> AlertState {
        match *candidate {
            None => AlertState::NoCandidate,
            Some(ref c) => {
                if c.distance_nm > self.controls.alert_range_nm {
                    AlertState::CandidateOutOfRange
                } else {
                    AlertState::CandidateInRange
                }
            }
        }
    }

    fn traffic_views(&self) -> Vec<TrafficView> {
        let (own_lat, own_lon) = match self.ownship.position() {
            Some(p) => p,
            None => return vec![],
        };

        let mut views = vec![];

        for t in &self.traffic {
            if !t.lat.is_finite() || !t.lon.is_finite() {
                continue;
            }

            let d = geo::distance_nm(own_lat, own_lon, t.lat, t.lon);
            if !d.is_finite() || d > self.controls.plot_range_nm {
                continue;
            }

            let bearing = geo::bearing_deg(own_lat, own_lon, t.lat, t.lon);
            let relative = match self.ownship.heading {
                Some(h) if h.is_finite() => Some(geo::relative_bearing(bearing, h)),
                _ => None,
            };

            views.push(TrafficView {
                id: t.id.clone(),
                lat: t.lat,
                lon: t.lon,
                altitude: t.altitude,
                distance_nm: d,
                bearing_deg: bearing,
                relative_bearing: relative,
                age: t.age,
                stale: t.age > filter::MAX_AGE_SECS,
                on_ground: t.on_ground,
                extrapolated: t.extrapolated,
            });
        }

        views.sort_by(|a, b| a.distance_nm.partial_cmp(&b.distance_nm).unwrap());

        views
    }

    fn summary(c: &AlertCandidate) -> String {
        format!("TRAFFIC {} · {:.1}nm · ΔALT {:+.0}ft",
                c.id,
                c.distance_nm,
                c.alt_delta_ft)
    }
}

impl Processor for AlertCoordinator {
    fn run(&mut self, handle: &mut Sink<Report>, i: ChainedIter) {
        let now = handle.now();

        for e in i {
            match *e {
                TelemetryData::Ownship(ref o) => self.ownship = *o,
                TelemetryData::Traffic(ref ts) => self.traffic = ts.clone(),
            }
        }

        self.speech.service(&mut *self.speech_backend);

        let candidate = filter::select_candidate(&self.ownship,
                                                 &self.traffic,
                                                 self.controls.alert_alt_band_ft);
        let state = self.classify(&candidate);

        let mut summary = None;
        let mut beeped = false;

        if state == AlertState::CandidateInRange {
            let c = candidate.as_ref().unwrap();

            summary = Some(AlertCoordinator::summary(c));

            beeped = self.beep
                .maybe_beep(&mut *self.audio, c, now, self.controls.mode);

            if let Some(text) = self.speech
                   .maybe_speak(&mut *self.speech_backend, c, now, self.controls.mode) {
                handle.emit(Report::Utterance(text));
            }
        }

        let model = RenderModel {
            utc: format!("{}", handle.utc().rfc3339()),
            state,
            summary,
            traffic: self.traffic_views(),
            ownship: self.ownship,
            candidate,
            controls: self.controls,
            audio_armed: self.audio.armed(),
            speech_busy: self.speech_backend.busy(),
            beeped,
        };

        handle.emit(Report::Render(model));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use backend::{NullAudio, NullSpeech};
    use vigil::handle::{SinkHandle, TickHandle};

    fn ownship() -> OwnshipState {
        OwnshipState {
            valid: true,
            lat: Some(40.0),
            lon: Some(-75.0),
            altitude: Some(1000.0),
            heading: Some(90.0),
        }
    }

    fn intruder() -> TrafficTarget {
        TrafficTarget {
            id: "A1B2C3".to_string(),
            lat: 40.0,
            lon: -74.983,
            altitude: Some(1300.0),
            vvel: Some(400.0),
            track: Some(270.0),
            age: 2.0,
            on_ground: false,
            extrapolated: false,
        }
    }

    fn coordinator(mode: Mode) -> AlertCoordinator {
        let controls = ControlState {
            mode,
            ..Default::default()
        };

        AlertCoordinator::new(controls,
                              Box::new(NullAudio {
                                  armed: true,
                                  played: 0,
                              }),
                              Box::new(NullSpeech::default()))
    }

    fn tick(c: &mut AlertCoordinator, data: Vec<TelemetryData>) -> Vec<Report> {
        let input: VecDeque<TelemetryData> = data.into_iter().collect();
        let mut out = VecDeque::new();

        {
            let mut b = TickHandle::new(10);
            let mut h = SinkHandle::new(&mut b, &mut out);
            let (first, second) = input.as_slices();
            c.run(&mut h, first.iter().chain(second.iter()));
        }

        out.into_iter().collect()
    }

    fn render(reports: &[Report]) -> &RenderModel {
        for r in reports {
            if let Report::Render(ref m) = *r {
                return m;
            }
        }
        panic!("no render model emitted");
    }

    fn utterances(reports: &[Report]) -> Vec<String> {
        reports
            .iter()
            .filter_map(|r| match *r {
                Report::Utterance(ref u) => Some(u.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_no_candidate_without_traffic() {
        let mut c = coordinator(Mode::Both);
        let out = tick(&mut c, vec![TelemetryData::Ownship(ownship())]);

        let m = render(&out);
        assert_eq!(m.state, AlertState::NoCandidate);
        assert!(m.summary.is_none());
        assert!(m.candidate.is_none());
        assert!(!m.beeped);
    }

    #[test]
    fn test_in_range_fires_both_channels() {
        let mut c = coordinator(Mode::Both);
        let out = tick(&mut c,
                       vec![TelemetryData::Ownship(ownship()),
                            TelemetryData::Traffic(vec![intruder()])]);

        let m = render(&out);
        assert_eq!(m.state, AlertState::CandidateInRange);
        assert!(m.beeped);

        let summary = m.summary.clone().unwrap();
        assert!(summary.contains("TRAFFIC A1B2C3"));
        assert!(summary.contains("+300ft"));

        let spoken = utterances(&out);
        assert_eq!(spoken.len(), 1);
        assert!(spoken[0].contains("300 feet above"));
        assert!(spoken[0].contains("climbing"));
        // due east with an east heading is dead ahead
        assert!(spoken[0].contains("12 o'clock"));
    }

    #[test]
    fn test_mode_off_computes_but_never_fires() {
        let mut c = coordinator(Mode::Off);
        let out = tick(&mut c,
                       vec![TelemetryData::Ownship(ownship()),
                            TelemetryData::Traffic(vec![intruder()])]);

        let m = render(&out);
        assert_eq!(m.state, AlertState::CandidateInRange);
        assert!(m.candidate.is_some());
        assert!(!m.beeped);
        assert!(utterances(&out).is_empty());
    }

    #[test]
    fn test_stale_target_never_selected() {
        let mut c = coordinator(Mode::Both);
        let mut t = intruder();
        t.age = 20.0;

        let out = tick(&mut c,
                       vec![TelemetryData::Ownship(ownship()),
                            TelemetryData::Traffic(vec![t])]);

        let m = render(&out);
        assert_eq!(m.state, AlertState::NoCandidate);
        assert!(!m.beeped);
        assert!(utterances(&out).is_empty());
    }

    #[test]
    fn test_out_of_range_is_surfaced_but_silent() {
        let mut c = coordinator(Mode::Both);
        let mut t = intruder();
        t.lon = -74.94; // ~2.8 nm out, alert range is 2

        let out = tick(&mut c,
                       vec![TelemetryData::Ownship(ownship()),
                            TelemetryData::Traffic(vec![t])]);

        let m = render(&out);
        assert_eq!(m.state, AlertState::CandidateOutOfRange);
        assert!(m.candidate.is_some());
        assert!(m.summary.is_none());
        assert!(!m.beeped);
        assert!(utterances(&out).is_empty());
    }

    #[test]
    fn test_summary_cleared_when_state_left() {
        let mut c = coordinator(Mode::Both);

        let out = tick(&mut c,
                       vec![TelemetryData::Ownship(ownship()),
                            TelemetryData::Traffic(vec![intruder()])]);
        assert!(render(&out).summary.is_some());

        let out = tick(&mut c, vec![TelemetryData::Traffic(vec![])]);
        let m = render(&out);
        assert_eq!(m.state, AlertState::NoCandidate);
        assert!(m.summary.is_none());
    }

    #[test]
    fn test_channels_debounce_across_ticks() {
        let mut c = coordinator(Mode::Both);

        let data = || {
            vec![TelemetryData::Ownship(ownship()),
                 TelemetryData::Traffic(vec![intruder()])]
        };

        let out = tick(&mut c, data());
        assert!(render(&out).beeped);
        assert_eq!(utterances(&out).len(), 1);

        // immediately after: same bucket, inside both cooldowns
        let out = tick(&mut c, data());
        assert!(!render(&out).beeped);
        assert!(utterances(&out).is_empty());
    }

    #[test]
    fn test_keeps_last_known_snapshot() {
        let mut c = coordinator(Mode::Both);

        tick(&mut c,
             vec![TelemetryData::Ownship(ownship()),
                  TelemetryData::Traffic(vec![intruder()])]);

        // a tick with no inbound telemetry still renders from the kept state
        let out = tick(&mut c, vec![]);
        let m = render(&out);
        assert_eq!(m.state, AlertState::CandidateInRange);
        assert_eq!(m.traffic.len(), 1);
    }

    #[test]
    fn test_plot_range_clips_traffic_views() {
        let mut c = coordinator(Mode::Both);
        let mut far = intruder();
        far.id = "FAR".to_string();
        far.lon = -74.8; // ~9 nm, outside the 5 nm plot range

        let out = tick(&mut c,
                       vec![TelemetryData::Ownship(ownship()),
                            TelemetryData::Traffic(vec![intruder(), far])]);

        let m = render(&out);
        assert_eq!(m.traffic.len(), 1);
        assert_eq!(m.traffic[0].id, "A1B2C3");
    }

    #[test]
    fn test_cycle_mode_ring() {
        let mut c = coordinator(Mode::Off);

        assert_eq!(c.cycle_mode(), Mode::Both);
        assert_eq!(c.cycle_mode(), Mode::Speech);
        assert_eq!(c.cycle_mode(), Mode::Beep);
        assert_eq!(c.cycle_mode(), Mode::Off);
    }
}
