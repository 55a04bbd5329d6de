use pranav_playback_core::{
    Catalog, Command, Config, Element, Inputs, ManifestKind, MediaManifest, Outputs,
    PlayFailure, PlaybackError, PlaylistItem, Session, SessionEvent, SessionInput, SlotLayer,
    SpeechToken,
};
use pranav_test_fixtures::{catalogs, manifests};

fn catalog() -> Catalog {
    Catalog::from_json(&catalogs::json("minimal").unwrap()).unwrap()
}

fn config() -> Config {
    Config {
        rng_seed: Some(3),
        ..Config::default()
    }
}

/// A session whose intro has already been tapped away.
fn running(first_time: Option<bool>) -> Session {
    let mut session = Session::new(config(), catalog(), first_time).unwrap();
    session.update(0.0, Inputs::one(SessionInput::IntroTap));
    let out = session.update(1.0, Inputs::default());
    assert!(out
        .events
        .contains(&SessionEvent::IntroCompleted { skipped: true }));
    session
}

fn step(session: &mut Session, inputs: Vec<SessionInput>) -> Outputs {
    session.update(0.016, Inputs::from(inputs)).clone()
}

fn active_id(session: &Session) -> String {
    session
        .active_item()
        .map(|item| item.id().to_string())
        .unwrap_or_default()
}

fn has_play(out: &Outputs, element: Element) -> bool {
    out.commands
        .iter()
        .any(|c| matches!(c, Command::Play { element: e, .. } if *e == element))
}

fn has_load(out: &Outputs, element: Element) -> bool {
    out.commands
        .iter()
        .any(|c| matches!(c, Command::Load { element: e, .. } if *e == element))
}

fn stages_ambient(out: &Outputs) -> bool {
    out.commands.iter().any(|c| {
        matches!(
            c,
            Command::StageSlot {
                layer: SlotLayer::Ambient,
                ..
            }
        )
    })
}

fn videos_loaded() -> SessionInput {
    SessionInput::ManifestLoaded {
        kind: ManifestKind::Videos,
        manifest: manifests::load("videos").unwrap(),
    }
}

fn time_update(element: Element, current_time: f64) -> SessionInput {
    SessionInput::TimeUpdate {
        element,
        current_time,
        duration: 100.0,
    }
}

#[test]
fn construction_validates_the_catalog() {
    let dup = Catalog::from_json(&catalogs::json("duplicate-ids").unwrap());
    assert!(matches!(dup, Err(PlaybackError::DuplicateId(_))));

    let empty = Catalog {
        start_sequence: Vec::new(),
        videos: Vec::new(),
        mantras: Vec::new(),
        library: Vec::new(),
        intro: Vec::new(),
    };
    assert!(matches!(
        Session::new(Config::default(), empty, None),
        Err(PlaybackError::EmptyPlaylist)
    ));
}

#[test]
fn media_waits_for_the_intro() {
    let mut session = Session::new(config(), catalog(), Some(true)).unwrap();
    let out = session.update(0.0, Inputs::default());
    assert!(out.commands_for(Element::Audio).next().is_none());
    assert!(out.commands_for(Element::Video).next().is_none());

    session.update(0.0, Inputs::one(SessionInput::IntroTap));
    let out = session.update(1.0, Inputs::default());
    assert!(out.commands.contains(&Command::Load {
        element: Element::Audio,
        src: "/audio/guidance.mp3".into()
    }));
    assert!(has_play(out, Element::Audio));
    assert!(out.events.iter().any(|e| matches!(
        e,
        SessionEvent::ActiveItemChanged { index: Some(0), manual: false, .. }
    )));
}

#[test]
fn ended_mantra_advances_to_the_next_item() {
    let mut session = running(Some(true));
    let out = step(&mut session, vec![SessionInput::Ended { element: Element::Audio }]);
    assert_eq!(active_id(&session), "opening");
    assert!(out.commands.contains(&Command::Load {
        element: Element::Audio,
        src: "/audio/opening.mp3".into()
    }));
}

#[test]
fn wrap_around_skips_guidance() {
    let mut session = running(Some(true));
    step(&mut session, vec![SessionInput::SelectIndex { index: 6 }]);
    step(&mut session, vec![SessionInput::Ended { element: Element::Audio }]);
    assert_eq!(session.sequencer().current_index(), 1);
}

#[test]
fn trim_end_advances_exactly_once() {
    let mut session = running(Some(true));
    let out = step(&mut session, vec![SessionInput::SelectIndex { index: 2 }]);
    assert!(out.commands.contains(&Command::Pause {
        element: Element::Audio
    }));
    assert!(has_play(&out, Element::Video));

    step(
        &mut session,
        vec![SessionInput::TimeUpdate {
            element: Element::Video,
            current_time: 96.0,
            duration: 100.0,
        }],
    );
    assert_eq!(active_id(&session), "m1");

    step(&mut session, vec![SessionInput::Ended { element: Element::Video }]);
    assert_eq!(active_id(&session), "m1");
    assert_eq!(session.sequencer().current_index(), 3);
}

#[test]
fn returning_to_a_trimmed_video_trims_again() {
    let mut session = running(Some(true));
    step(&mut session, vec![SessionInput::SelectIndex { index: 2 }]);
    step(&mut session, vec![time_update(Element::Video, 96.0)]);
    assert_eq!(active_id(&session), "m1");

    let out = step(&mut session, vec![SessionInput::Previous]);
    assert_eq!(active_id(&session), "v1");
    assert!(!has_load(&out, Element::Video));
    assert!(out.commands.contains(&Command::Seek {
        element: Element::Video,
        time: 0.0
    }));
    assert!(has_play(&out, Element::Video));

    step(&mut session, vec![time_update(Element::Video, 97.0)]);
    assert_eq!(active_id(&session), "m1");
}

#[test]
fn revisited_video_advances_when_it_ends() {
    let mut session = running(Some(true));
    step(&mut session, vec![SessionInput::SelectIndex { index: 2 }]);
    step(&mut session, vec![time_update(Element::Video, 96.0)]);
    step(&mut session, vec![SessionInput::Previous]);
    assert_eq!(active_id(&session), "v1");

    step(
        &mut session,
        vec![
            time_update(Element::Video, 40.0),
            SessionInput::Ended { element: Element::Video },
        ],
    );
    assert_eq!(active_id(&session), "m1");
}

#[test]
fn reselecting_the_active_item_resumes_without_reloading() {
    let mut session = running(Some(true));
    step(&mut session, vec![SessionInput::SelectIndex { index: 2 }]);
    step(&mut session, vec![SessionInput::TogglePause]);
    assert!(session.flags().is_session_paused);

    let out = step(&mut session, vec![SessionInput::SelectIndex { index: 2 }]);
    assert_eq!(active_id(&session), "v1");
    assert!(out.events.contains(&SessionEvent::PausedChanged { paused: false }));
    assert!(has_play(&out, Element::Video));
    assert!(!has_load(&out, Element::Video));
    assert!(!out
        .commands
        .iter()
        .any(|c| matches!(c, Command::Seek { .. })));
    assert!(!out
        .events
        .iter()
        .any(|e| matches!(e, SessionEvent::ActiveItemChanged { .. })));
}

#[test]
fn returning_to_a_mantra_restarts_its_audio() {
    let mut session = running(Some(true));
    step(&mut session, vec![SessionInput::SelectIndex { index: 3 }]);
    step(&mut session, vec![time_update(Element::Audio, 30.0)]);
    step(&mut session, vec![SessionInput::Next]);
    assert_eq!(active_id(&session), "v2");

    let out = step(&mut session, vec![SessionInput::Previous]);
    assert_eq!(active_id(&session), "m1");
    assert!(!has_load(&out, Element::Audio));
    assert!(out.commands.contains(&Command::Seek {
        element: Element::Audio,
        time: 0.0
    }));
    assert!(has_play(&out, Element::Audio));
}

#[test]
fn a_lone_trimmed_video_loops_instead_of_sticking() {
    let lone = Catalog {
        start_sequence: Vec::new(),
        videos: vec![
            PlaylistItem::video("solo", "/videos/solo.mp4", "Solo", "").with_trim_end(4.0),
        ],
        mantras: Vec::new(),
        library: Vec::new(),
        intro: Vec::new(),
    };
    let mut session = Session::new(config(), lone, Some(false)).unwrap();
    let out = session.update(0.0, Inputs::default());
    assert!(has_play(out, Element::Video));

    let rewind = Command::Seek {
        element: Element::Video,
        time: 0.0,
    };
    let out = step(&mut session, vec![time_update(Element::Video, 96.0)]);
    assert_eq!(active_id(&session), "solo");
    assert!(out.commands.contains(&rewind));
    assert!(!has_load(&out, Element::Video));

    let out = step(&mut session, vec![time_update(Element::Video, 97.0)]);
    assert!(out.commands.contains(&rewind));
}

#[test]
fn video_waits_for_mantra_audio_to_stop() {
    let mut session = running(Some(true));
    step(&mut session, vec![SessionInput::SelectIndex { index: 3 }]);
    step(&mut session, vec![SessionInput::Playing { element: Element::Audio }]);
    assert!(session.flags().is_mantra_playing);

    let out = step(&mut session, vec![SessionInput::Next]);
    assert_eq!(active_id(&session), "v2");
    assert!(out.commands.contains(&Command::Pause {
        element: Element::Audio
    }));
    assert!(out.commands.contains(&Command::Seek {
        element: Element::Video,
        time: 10.0
    }));
    assert!(!has_play(&out, Element::Video));

    let out = step(&mut session, vec![SessionInput::Paused { element: Element::Audio }]);
    assert!(!session.flags().is_mantra_playing);
    assert!(has_play(&out, Element::Video));
}

#[test]
fn burst_of_selections_settles_on_the_last() {
    let mut session = running(Some(true));
    let out = step(
        &mut session,
        vec![
            SessionInput::SelectIndex { index: 2 },
            SessionInput::SelectIndex { index: 4 },
            SessionInput::SelectIndex { index: 5 },
        ],
    );
    assert_eq!(active_id(&session), "m2");
    let loads: Vec<_> = out
        .commands
        .iter()
        .filter(|c| matches!(c, Command::Load { .. }))
        .collect();
    assert_eq!(loads.len(), 1);
}

#[test]
fn out_of_range_selection_is_ignored() {
    let mut session = running(Some(true));
    let out = step(&mut session, vec![SessionInput::SelectIndex { index: 99 }]);
    assert!(out.is_empty());
    assert_eq!(active_id(&session), "guidance");
}

#[test]
fn autoplay_block_mutes_and_unmute_clears_the_notice() {
    let mut session = running(Some(true));
    let out = step(
        &mut session,
        vec![SessionInput::PlayFailed {
            element: Element::Audio,
            failure: PlayFailure::NotAllowed,
        }],
    );
    assert!(out.commands.contains(&Command::Play {
        element: Element::Audio,
        muted: true
    }));
    assert!(out.events.contains(&SessionEvent::MutedChanged { muted: true }));
    let view = session.transport_view();
    assert!(view.is_muted);
    assert!(view.muted_by_autoplay);

    let out = step(&mut session, vec![SessionInput::ToggleMute]);
    assert!(out.commands.contains(&Command::SetMuted {
        element: Element::Audio,
        muted: false
    }));
    assert!(!session.transport_view().muted_by_autoplay);
}

#[test]
fn toggling_pause_pauses_the_active_element() {
    let mut session = running(Some(true));
    let out = step(&mut session, vec![SessionInput::TogglePause]);
    assert!(out.events.contains(&SessionEvent::PausedChanged { paused: true }));
    assert!(out.commands.contains(&Command::Pause {
        element: Element::Audio
    }));
    assert!(session.transport_view().is_paused);

    let out = step(&mut session, vec![SessionInput::SelectIndex { index: 1 }]);
    assert!(out.events.contains(&SessionEvent::PausedChanged { paused: false }));
    assert!(has_play(&out, Element::Audio));
}

#[test]
fn library_only_track_plays_as_manual_override() {
    let mut session = running(Some(true));
    step(&mut session, vec![SessionInput::SelectIndex { index: 2 }]);
    let extra = PlaylistItem::mantra("lib_extra", "/audio/extra.mp3", "Extra Chant", "");
    let out = step(&mut session, vec![SessionInput::SelectTrack { track: extra }]);
    assert!(out.commands.contains(&Command::Load {
        element: Element::Audio,
        src: "/audio/extra.mp3".into()
    }));
    assert!(out.events.iter().any(|e| matches!(
        e,
        SessionEvent::ActiveItemChanged { index: None, manual: true, .. }
    )));

    let entries = session.library_entries();
    let current: Vec<_> = entries.iter().filter(|e| e.is_current).collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].item.id(), "lib_extra");
    assert_eq!(current[0].sequence_index, None);

    step(&mut session, vec![SessionInput::Ended { element: Element::Audio }]);
    assert!(!session.sequencer().is_manual());
    assert_eq!(active_id(&session), "m1");
}

#[test]
fn resolving_the_visitor_flag_rebuilds_around_the_current_item() {
    let mut session = running(None);
    step(&mut session, vec![SessionInput::SelectIndex { index: 2 }]);
    step(
        &mut session,
        vec![SessionInput::SetFirstTime {
            is_first_time: Some(false),
        }],
    );
    assert!(session.playlist().index_of_id("guidance").is_none());
    assert_eq!(session.sequencer().current_index(), 1);
    assert_eq!(active_id(&session), "v1");
    assert_eq!(session.playlist_builds(), 2);
}

#[test]
fn manifests_feed_library_and_ambient_pool() {
    let mut session = running(Some(true));
    let audio: MediaManifest = manifests::load("audio").unwrap();
    let images: MediaManifest = manifests::load("images").unwrap();
    let videos: MediaManifest = manifests::load("videos").unwrap();
    let out = step(
        &mut session,
        vec![
            SessionInput::ManifestLoaded {
                kind: ManifestKind::Audio,
                manifest: audio.clone(),
            },
            SessionInput::ManifestLoaded {
                kind: ManifestKind::Audio,
                manifest: audio,
            },
            SessionInput::ManifestLoaded {
                kind: ManifestKind::Images,
                manifest: images,
            },
            SessionInput::ManifestLoaded {
                kind: ManifestKind::Videos,
                manifest: videos,
            },
        ],
    );

    // 7 sequence rows, 1 catalog library track, 3 audio files.
    assert_eq!(session.library_entries().len(), 11);
    assert_eq!(session.ambient().pool().len(), 5);
    // The ambient layer starts as soon as it has something to show.
    assert!(out
        .commands
        .iter()
        .any(|c| matches!(c, Command::StageSlot { .. })));
}

#[test]
fn ambient_backdrop_stays_idle_behind_videos() {
    let mut session = running(Some(true));
    step(&mut session, vec![SessionInput::SelectIndex { index: 2 }]);
    let out = step(&mut session, vec![videos_loaded()]);
    assert!(!stages_ambient(&out));
    assert_eq!(session.ambient().pool().len(), 2);

    let out = step(&mut session, vec![SessionInput::Next]);
    assert_eq!(active_id(&session), "m1");
    assert!(stages_ambient(&out));
}

#[test]
fn ambient_backdrop_waits_for_the_intro() {
    let mut session = Session::new(config(), catalog(), Some(true)).unwrap();
    let out = session.update(0.0, Inputs::one(videos_loaded()));
    assert!(!stages_ambient(out));

    session.update(0.0, Inputs::one(SessionInput::IntroTap));
    let out = session.update(1.0, Inputs::default());
    assert!(stages_ambient(out));
}

#[test]
fn missing_manifest_degrades_gracefully() {
    let mut session = running(Some(true));
    let out = step(
        &mut session,
        vec![SessionInput::ManifestFailed {
            kind: ManifestKind::Videos,
            reason: "404".into(),
        }],
    );
    assert!(out.events.contains(&SessionEvent::PoolDegraded {
        kind: ManifestKind::Videos,
        reason: "404".into()
    }));
    assert!(session.ambient().pool().is_empty());
}

#[test]
fn narration_pauses_and_resumes_mantra_audio() {
    let mut session = running(Some(true));
    let out = step(
        &mut session,
        vec![SessionInput::SpeakRequested {
            text: "Close your eyes".into(),
        }],
    );
    assert!(out.commands.contains(&Command::Speak {
        token: SpeechToken(1),
        text: "Close your eyes".into()
    }));
    assert!(out.commands.contains(&Command::Pause {
        element: Element::Audio
    }));

    let out = step(
        &mut session,
        vec![SessionInput::SpeechEnded {
            token: SpeechToken(1),
        }],
    );
    assert!(out
        .events
        .contains(&SessionEvent::SpeechFinished { token: SpeechToken(1) }));
    assert!(has_play(&out, Element::Audio));
}

#[test]
fn superseded_narration_cannot_resume_playback() {
    let mut session = running(Some(true));
    step(
        &mut session,
        vec![
            SessionInput::SpeakRequested { text: "one".into() },
            SessionInput::SpeakRequested { text: "two".into() },
        ],
    );
    let out = step(
        &mut session,
        vec![SessionInput::SpeechEnded {
            token: SpeechToken(1),
        }],
    );
    assert!(out.is_empty());
    assert!(session.is_speaking());
}

#[test]
fn inputs_deserialize_from_host_json() {
    let inputs: Inputs = serde_json::from_str(
        r#"{ "events": [
            { "type": "select_index", "index": 2 },
            { "type": "time_update", "element": "video", "current_time": 1.5, "duration": 90 },
            { "type": "play_failed", "element": "audio", "failure": "not_allowed" },
            { "type": "media_ready", "layer": "ambient", "buffer": "b" },
            { "type": "intro_tap" }
        ] }"#,
    )
    .unwrap();
    assert_eq!(inputs.events.len(), 5);
    assert_eq!(inputs.events[0], SessionInput::SelectIndex { index: 2 });
}

#[test]
fn transport_view_tracks_position() {
    let mut session = running(Some(true));
    step(
        &mut session,
        vec![
            SessionInput::CanPlay { element: Element::Audio },
            SessionInput::TimeUpdate {
                element: Element::Audio,
                current_time: 30.0,
                duration: 120.0,
            },
        ],
    );
    let view = session.transport_view();
    assert_eq!(view.position_label, "0:30");
    assert_eq!(view.duration_label, "2:00");
    assert_eq!(view.progress, 0.25);
    assert!(!view.is_loading);
}
