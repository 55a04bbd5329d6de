use pranav_playback_core::{
    BufferId, Command, IntroClip, IntroPhase, IntroSequencer, IntroTimings, Outputs,
    SessionEvent, SlotLayer,
};

fn clips() -> Vec<IntroClip> {
    vec![
        IntroClip {
            src: "/videos/intro/a.mp4".into(),
            text: Some(vec!["Welcome".into(), "Breathe".into()]),
        },
        IntroClip {
            src: "/videos/intro/b.mp4".into(),
            text: None,
        },
    ]
}

fn texts(out: &Outputs) -> Vec<String> {
    out.commands
        .iter()
        .filter_map(|c| match c {
            Command::ShowIntroText { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Start the intro and confirm the first clip is ready.
fn started() -> (IntroSequencer, Outputs) {
    let mut intro = IntroSequencer::new(clips(), IntroTimings::default());
    let mut out = Outputs::default();
    intro.start(&mut out);
    assert_eq!(
        out.commands,
        vec![Command::StageSlot {
            layer: SlotLayer::Intro,
            buffer: BufferId::B,
            content: pranav_playback_core::SlotContent {
                src: "/videos/intro/a.mp4".into(),
                kind: pranav_playback_core::AssetKind::Video,
                start: None,
                animation_index: None,
            },
        }]
    );
    out.clear();
    intro.on_ready(BufferId::B, &mut out);
    (intro, out)
}

#[test]
fn empty_intro_is_already_complete() {
    let intro = IntroSequencer::new(Vec::new(), IntroTimings::default());
    assert!(intro.is_complete());
}

#[test]
fn first_clip_shows_text_and_preloads_the_next() {
    let (intro, out) = started();
    assert_eq!(intro.current_clip(), Some(0));
    assert_eq!(texts(&out), vec!["Welcome".to_string()]);
    assert!(out.commands.contains(&Command::ShowSlot {
        layer: SlotLayer::Intro,
        buffer: BufferId::B
    }));
    assert!(out.commands.iter().any(|c| matches!(
        c,
        Command::StageSlot { layer: SlotLayer::Intro, buffer: BufferId::A, content } if content.src == "/videos/intro/b.mp4"
    )));
}

#[test]
fn text_segments_follow_the_timeline() {
    let (mut intro, mut out) = started();
    out.clear();

    intro.tick(6.9, &mut out);
    assert!(out.commands.is_empty());
    intro.tick(0.1, &mut out);
    assert_eq!(out.commands, vec![Command::HideIntroText]);

    out.clear();
    intro.tick(0.8 + 1.4, &mut out);
    assert!(texts(&out).is_empty());
    intro.tick(0.2, &mut out);
    assert_eq!(texts(&out), vec!["Breathe".to_string()]);
    assert!(!intro.text_done());

    intro.tick(5.0 + 0.8 + 0.1, &mut out);
    assert!(intro.text_done());
}

#[test]
fn clip_waits_for_both_video_and_text() {
    let (mut intro, mut out) = started();
    intro.on_ready(BufferId::A, &mut out);

    intro.on_video_ended(BufferId::B, &mut out);
    assert!(intro.video_ended());
    assert_eq!(intro.current_clip(), Some(0));

    intro.tick(20.0, &mut out);
    assert_eq!(intro.current_clip(), Some(1));
}

#[test]
fn clip_without_text_is_text_done_immediately() {
    let (mut intro, mut out) = started();
    intro.tick(20.0, &mut out);
    intro.on_ready(BufferId::A, &mut out);
    out.clear();
    intro.on_video_ended(BufferId::B, &mut out);

    assert_eq!(intro.phase(), IntroPhase::Playing { clip: 1 });
    assert!(intro.text_done());
    assert!(texts(&out).is_empty());
    assert!(out.events.contains(&SessionEvent::IntroClipChanged { clip: 1 }));
}

#[test]
fn next_clip_shows_as_soon_as_it_is_ready() {
    let (mut intro, mut out) = started();
    intro.tick(20.0, &mut out);
    intro.on_video_ended(BufferId::B, &mut out);
    assert_eq!(intro.current_clip(), Some(0));

    intro.on_ready(BufferId::A, &mut out);
    assert_eq!(intro.current_clip(), Some(1));
}

#[test]
fn last_clip_fades_out_then_completes() {
    let (mut intro, mut out) = started();
    intro.tick(20.0, &mut out);
    intro.on_ready(BufferId::A, &mut out);
    intro.on_video_ended(BufferId::B, &mut out);
    out.clear();

    intro.on_video_ended(BufferId::A, &mut out);
    assert_eq!(intro.phase(), IntroPhase::FadingOut);
    assert_eq!(out.commands, vec![Command::FadeOutIntro { secs: 1.0 }]);

    intro.tick(1.0, &mut out);
    assert!(intro.is_complete());
    assert!(out
        .events
        .contains(&SessionEvent::IntroCompleted { skipped: false }));
}

#[test]
fn tap_skips_straight_to_fade_out() {
    let (mut intro, mut out) = started();
    out.clear();
    intro.skip(&mut out);
    assert_eq!(
        out.commands,
        vec![Command::HideIntroText, Command::FadeOutIntro { secs: 1.0 }]
    );
    intro.tick(0.5, &mut out);
    assert!(!intro.is_complete());
    intro.tick(0.5, &mut out);
    assert!(out
        .events
        .contains(&SessionEvent::IntroCompleted { skipped: true }));

    // Late signals after completion are harmless.
    out.clear();
    intro.on_video_ended(BufferId::B, &mut out);
    intro.skip(&mut out);
    assert!(out.is_empty());
}
