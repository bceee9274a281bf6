// Host-side tests for the text scramble state machine.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod scramble {
    include!("../src/core/scramble.rs");
}

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scramble::*;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};

// Manual frame clock: frames only fire when the test says so.
#[derive(Default)]
struct FakeScheduler {
    next: u32,
    outstanding: Option<u32>,
    requested: u32,
    cancelled: Vec<u32>,
}

impl FrameScheduler for FakeScheduler {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        assert!(
            self.outstanding.is_none(),
            "frame requested while another is outstanding"
        );
        self.next += 1;
        self.requested += 1;
        self.outstanding = Some(self.next);
        Some(self.next)
    }

    fn cancel_frame(&mut self, handle: u32) {
        if self.outstanding == Some(handle) {
            self.outstanding = None;
        }
        self.cancelled.push(handle);
    }
}

impl FakeScheduler {
    fn fire(&mut self) -> bool {
        self.outstanding.take().is_some()
    }
}

struct RefusingScheduler;

impl FrameScheduler for RefusingScheduler {
    type Handle = ();

    fn request_frame(&mut self) -> Option<()> {
        None
    }

    fn cancel_frame(&mut self, _handle: ()) {}
}

#[derive(Default)]
struct RecordingSurface {
    text: String,
    frames: Vec<Vec<Glyph>>,
}

impl RecordingSurface {
    fn showing(text: &str) -> Self {
        Self {
            text: text.to_string(),
            frames: Vec::new(),
        }
    }
}

impl TextSurface for RecordingSurface {
    fn read_text(&self) -> String {
        self.text.clone()
    }

    fn write_frame(&mut self, glyphs: &[Glyph]) {
        self.text = glyphs_to_text(glyphs);
        self.frames.push(glyphs.to_vec());
    }
}

type TestAnimator<R> = ScrambleAnimator<RecordingSurface, FakeScheduler, R>;

fn animator<R: Rng>(initial: &str, rng: R) -> TestAnimator<R> {
    ScrambleAnimator::new(
        RecordingSurface::showing(initial),
        FakeScheduler::default(),
        rng,
        ScrambleConfig::default(),
    )
    .expect("default config is valid")
}

fn seeded(initial: &str, seed: u64) -> TestAnimator<StdRng> {
    animator(initial, StdRng::seed_from_u64(seed))
}

/// Fire frames until the animator stops asking; returns the number fired.
fn run_to_end<R: Rng>(a: &mut TestAnimator<R>) -> u32 {
    let mut ticks = 0;
    while a.scheduler_mut().fire() {
        a.on_frame();
        ticks += 1;
        assert!(ticks < 1000, "transition never settled");
    }
    ticks
}

#[derive(Default)]
struct WakeFlag(AtomicBool);

impl Wake for WakeFlag {
    fn wake(self: Arc<Self>) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[test]
fn default_config_matches_page_tuning() {
    let cfg = ScrambleConfig::default();
    assert_eq!(cfg.charset.iter().collect::<String>(), "!<>-_\\/[]{}—=+*^?#________");
    assert_eq!(cfg.start_window, 40);
    assert_eq!(cfg.duration_window, 40);
    assert!((cfg.reroll_probability - 0.28).abs() < f64::EPSILON);
    assert_eq!(cfg.max_frames(), 79);
    assert!(cfg.validate().is_ok());
}

#[test]
fn invalid_configs_are_rejected() {
    let empty = ScrambleConfig {
        charset: Vec::new(),
        ..ScrambleConfig::default()
    };
    assert_eq!(empty.validate(), Err(ScrambleError::EmptyCharset));

    let zero = ScrambleConfig {
        duration_window: 0,
        ..ScrambleConfig::default()
    };
    assert_eq!(
        zero.validate(),
        Err(ScrambleError::ZeroWindow {
            start: 40,
            duration: 0
        })
    );

    let prob = ScrambleConfig {
        reroll_probability: 1.5,
        ..ScrambleConfig::default()
    };
    assert_eq!(prob.validate(), Err(ScrambleError::RerollProbability(1.5)));

    let huge = ScrambleConfig {
        start_window: u32::MAX,
        duration_window: 2,
        ..ScrambleConfig::default()
    };
    assert_eq!(
        huge.validate(),
        Err(ScrambleError::WindowOverflow {
            start: u32::MAX,
            duration: 2
        })
    );

    let built = ScrambleAnimator::new(
        RecordingSurface::default(),
        FakeScheduler::default(),
        StdRng::seed_from_u64(1),
        empty,
    );
    assert!(built.is_err());
}

#[test]
fn empty_to_empty_completes_without_scheduling() {
    let mut a = seeded("", 3);
    let done = a.begin_transition("");
    assert!(done.is_resolved());
    assert_eq!(a.scheduler().requested, 0);
    assert!(!a.is_animating());
    assert!(a.schedule().is_empty());
    assert_eq!(a.target().frames.len(), 1);
    assert_eq!(a.target().text, "");
}

#[test]
fn zero_draws_settle_on_the_first_update() {
    // StepRng(0, 0) makes every reveal window [0, 0)
    let mut a = animator("old text", StepRng::new(0, 0));
    let done = a.begin_transition("new");
    assert!(done.is_resolved());
    assert_eq!(a.scheduler().requested, 0);
    assert_eq!(a.target().text, "new");
    assert!(a
        .schedule()
        .iter()
        .all(|e| e.reveal_start == 0 && e.reveal_end == 0));
}

#[test]
fn hello_to_world_settles_exactly_within_bound() {
    for seed in 0..64 {
        let mut a = seeded("HELLO", seed);
        let done = a.begin_transition("WORLD!");
        assert_eq!(a.schedule().len(), 6);

        // Frame 0: no position shows `to` unless its window is empty.
        let first = a.target().frames[0].clone();
        for (i, entry) in a.schedule().iter().take(5).enumerate() {
            let expected_to = entry.to.map(Glyph::Settled);
            if entry.reveal_end == 0 {
                assert_eq!(Some(first[i]), expected_to, "seed {seed} pos {i}");
            } else if entry.reveal_start == 0 {
                assert!(matches!(first[i], Glyph::Dud(_)), "seed {seed} pos {i}");
            } else {
                assert_eq!(first[i], Glyph::Settled("HELLO".chars().nth(i).unwrap()));
            }
        }

        let ticks = run_to_end(&mut a);
        assert!(ticks + 1 <= 80, "seed {seed} took {} updates", ticks + 1);
        assert!(done.is_resolved());
        assert_eq!(a.target().text, "WORLD!");
        assert!(a
            .target()
            .frames
            .last()
            .unwrap()
            .iter()
            .all(|g| matches!(g, Glyph::Settled(_))));
    }
}

#[test]
fn settled_positions_never_revert() {
    let from = "ABCDEFGHIJ";
    let to = "0123456789";
    for seed in 0..32 {
        let mut a = seeded(from, seed);
        a.begin_transition(to);
        run_to_end(&mut a);
        let schedule = a.schedule().to_vec();
        let frames = &a.target().frames;
        for (frame, glyphs) in frames.iter().enumerate() {
            assert_eq!(glyphs.len(), 10);
            for (i, entry) in schedule.iter().enumerate() {
                let f = frame as u32;
                let g = glyphs[i];
                if f >= entry.reveal_end {
                    assert_eq!(
                        g,
                        Glyph::Settled(entry.to.unwrap()),
                        "seed {seed} frame {f} pos {i}"
                    );
                } else if f >= entry.reveal_start {
                    assert!(matches!(g, Glyph::Dud(_)));
                } else {
                    assert_eq!(g, Glyph::Settled(entry.from.unwrap()));
                }
            }
        }
    }
}

#[test]
fn reveal_windows_respect_bounds() {
    for seed in 0..128 {
        let mut a = seeded("a fairly long line of text to scramble", seed);
        a.begin_transition("short");
        for e in a.schedule() {
            assert!(e.reveal_start < 40);
            assert!(e.reveal_start <= e.reveal_end);
            assert!(e.reveal_end < 80);
        }
    }
}

#[test]
fn same_text_stays_same_or_dud() {
    let mut a = seeded("SAME", 9);
    let done = a.begin_transition("SAME");
    run_to_end(&mut a);
    for glyphs in &a.target().frames {
        for (i, g) in glyphs.iter().enumerate() {
            match g {
                Glyph::Settled(c) => assert_eq!(*c, "SAME".chars().nth(i).unwrap()),
                Glyph::Dud(_) => {}
            }
        }
    }
    assert!(done.is_resolved());
    assert_eq!(a.target().text, "SAME");
}

#[test]
fn duds_come_from_charset() {
    let mut a = seeded("", 21);
    a.begin_transition("a long target string with plenty of positions");
    run_to_end(&mut a);
    for glyphs in &a.target().frames {
        for g in glyphs {
            if let Glyph::Dud(c) = g {
                assert!(DEFAULT_CHARSET.contains(*c), "unexpected dud {c:?}");
            }
        }
    }
}

#[test]
fn fixed_seed_gives_a_deterministic_schedule() {
    let mut a = seeded("xy", 7);
    a.begin_transition("abc");

    let mut rng = StdRng::seed_from_u64(7);
    let expected: Vec<(u32, u32)> = (0..3)
        .map(|_| {
            let start = rng.gen_range(0..40u32);
            (start, start + rng.gen_range(0..40u32))
        })
        .collect();
    let actual: Vec<(u32, u32)> = a
        .schedule()
        .iter()
        .map(|e| (e.reveal_start, e.reveal_end))
        .collect();
    assert_eq!(actual, expected);

    let pairs: Vec<(Option<char>, Option<char>)> =
        a.schedule().iter().map(|e| (e.from, e.to)).collect();
    assert_eq!(
        pairs,
        vec![
            (Some('x'), Some('a')),
            (Some('y'), Some('b')),
            (None, Some('c'))
        ]
    );
}

#[test]
fn same_seed_replays_identical_frames() {
    let mut a = seeded("portfolio", 11);
    let mut b = seeded("portfolio", 11);
    a.begin_transition("engineer");
    b.begin_transition("engineer");
    run_to_end(&mut a);
    run_to_end(&mut b);
    assert_eq!(a.target().frames, b.target().frames);
}

#[test]
fn restart_cancels_and_abandons_previous_transition() {
    let mut a = seeded("", 5);
    let first = a.begin_transition("FIRST TRANSITION");
    let mut ticks = 0;
    for _ in 0..5 {
        if a.scheduler_mut().fire() {
            a.on_frame();
            ticks += 1;
        }
    }
    assert!(a.is_animating(), "seed 5 should still be scrambling");

    let shown = a.target().text.clone();
    let second = a.begin_transition("SECOND");
    assert_eq!(first.state(), CompletionState::Abandoned);
    assert_eq!(a.scheduler().cancelled.len(), 1);
    assert_eq!(a.frame(), 0);

    // The new transition starts from what was on screen, duds included.
    let from: String = a.schedule().iter().filter_map(|e| e.from).collect();
    assert_eq!(from, shown);

    ticks += run_to_end(&mut a);
    assert!(second.is_resolved());
    assert_eq!(first.state(), CompletionState::Abandoned);
    assert_eq!(a.target().text, "SECOND");
    // One synchronous write per begin plus one per fired tick.
    assert_eq!(a.target().frames.len() as u32, 2 + ticks);
}

#[test]
fn restart_after_completion_cancels_nothing() {
    let mut a = seeded("one", 13);
    let first = a.begin_transition("two");
    run_to_end(&mut a);
    assert!(first.is_resolved());

    let second = a.begin_transition("three");
    run_to_end(&mut a);
    assert!(second.is_resolved());
    assert_eq!(first.state(), CompletionState::Resolved);
    assert!(a.scheduler().cancelled.is_empty());
    assert_eq!(a.target().text, "three");
}

#[test]
fn stray_frame_callback_is_ignored() {
    let mut a = seeded("", 2);
    a.begin_transition("");
    let writes = a.target().frames.len();
    a.on_frame();
    assert_eq!(a.target().frames.len(), writes);
}

#[test]
fn completion_future_wakes_when_settled() {
    let mut a = seeded("abc", 17);
    let mut done = a.begin_transition("xyz");
    let flag = Arc::new(WakeFlag::default());
    let waker = Waker::from(flag.clone());
    let mut cx = Context::from_waker(&waker);

    if done.is_resolved() {
        return;
    }
    assert_eq!(Pin::new(&mut done).poll(&mut cx), Poll::Pending);
    run_to_end(&mut a);
    assert!(flag.0.load(Ordering::SeqCst));
    assert_eq!(Pin::new(&mut done).poll(&mut cx), Poll::Ready(()));
}

#[test]
fn widest_valid_windows_do_not_overflow() {
    let cfg = ScrambleConfig {
        start_window: u32::MAX - 1,
        duration_window: 1,
        ..ScrambleConfig::default()
    };
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.max_frames(), u32::MAX - 1);

    let mut a = ScrambleAnimator::new(
        RecordingSurface::showing("ab"),
        FakeScheduler::default(),
        StdRng::seed_from_u64(9),
        cfg,
    )
    .expect("valid config");
    a.begin_transition("cd");
    for entry in a.schedule() {
        assert!(entry.reveal_start <= entry.reveal_end);
        assert!(entry.reveal_end < u32::MAX);
    }
}

#[test]
fn every_awaiting_clone_is_woken() {
    let mut a = seeded("abc", 17);
    let done = a.begin_transition("xyz");
    if done.is_resolved() {
        return;
    }
    let mut first = done.clone();
    let mut second = done;
    let flag_a = Arc::new(WakeFlag::default());
    let flag_b = Arc::new(WakeFlag::default());
    let waker_a = Waker::from(flag_a.clone());
    let waker_b = Waker::from(flag_b.clone());
    let mut cx_a = Context::from_waker(&waker_a);
    let mut cx_b = Context::from_waker(&waker_b);

    assert_eq!(Pin::new(&mut first).poll(&mut cx_a), Poll::Pending);
    assert_eq!(Pin::new(&mut second).poll(&mut cx_b), Poll::Pending);
    // Re-polling with the same waker must not drop the other task's.
    assert_eq!(Pin::new(&mut first).poll(&mut cx_a), Poll::Pending);
    run_to_end(&mut a);

    assert!(flag_a.0.load(Ordering::SeqCst));
    assert!(flag_b.0.load(Ordering::SeqCst));
    assert_eq!(Pin::new(&mut first).poll(&mut cx_a), Poll::Ready(()));
    assert_eq!(Pin::new(&mut second).poll(&mut cx_b), Poll::Ready(()));
}

#[test]
fn abandoned_completion_never_wakes() {
    let mut a = seeded("", 5);
    let mut first = a.begin_transition("FIRST TRANSITION");
    let flag = Arc::new(WakeFlag::default());
    let waker = Waker::from(flag.clone());
    let mut cx = Context::from_waker(&waker);
    assert_eq!(Pin::new(&mut first).poll(&mut cx), Poll::Pending);

    a.begin_transition("SECOND");
    run_to_end(&mut a);
    assert!(!flag.0.load(Ordering::SeqCst));
    assert_eq!(Pin::new(&mut first).poll(&mut cx), Poll::Pending);
}

#[test]
fn refused_frame_stalls_without_resolving() {
    let mut a = ScrambleAnimator::new(
        RecordingSurface::showing("wait"),
        RefusingScheduler,
        StdRng::seed_from_u64(4),
        ScrambleConfig::default(),
    )
    .unwrap();
    let done = a.begin_transition("here");
    if a.schedule().iter().all(|e| e.reveal_end == 0) {
        return;
    }
    assert!(!a.is_animating());
    assert_eq!(done.state(), CompletionState::Pending);
}

#[test]
fn shrinking_and_unicode_targets_settle_exactly() {
    let mut a = seeded("LONGER TEXT", 23);
    a.begin_transition("ab");
    run_to_end(&mut a);
    assert_eq!(a.target().text, "ab");

    let mut b = seeded("héllo", 29);
    b.begin_transition("naïve → ünïcode");
    assert_eq!(b.schedule().len(), "naïve → ünïcode".chars().count());
    run_to_end(&mut b);
    assert_eq!(b.target().text, "naïve → ünïcode");
}

#[test]
fn markup_wraps_duds_and_escapes_html() {
    let glyphs = [Glyph::Settled('a'), Glyph::Dud('<'), Glyph::Settled('&')];
    assert_eq!(
        glyphs_to_markup(&glyphs),
        "a<span class=\"dud\">&lt;</span>&amp;"
    );
    assert_eq!(glyphs_to_text(&glyphs), "a<&");
    assert_eq!(glyphs_to_markup(&[]), "");
}

#[test]
fn target_text_prefers_non_empty_attribute() {
    assert_eq!(
        resolve_target_text(Some("From attr".into()), "Rendered".into()),
        "From attr"
    );
    assert_eq!(resolve_target_text(Some(String::new()), "Rendered".into()), "Rendered");
    assert_eq!(resolve_target_text(None, "Rendered".into()), "Rendered");
}

#[test]
fn visibility_gate_is_one_shot() {
    assert!(should_trigger_on_visible(true, false));
    assert!(!should_trigger_on_visible(true, true));
    assert!(!should_trigger_on_visible(false, false));
    assert!(!should_trigger_on_visible(false, true));
}
