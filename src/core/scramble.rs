// Text scramble animator.
//
// Moves a text surface from its current content to a target string by
// revealing each character on its own randomized frame window. Frames are
// driven by an injected `FrameScheduler`, randomness by an injected
// `rand::Rng`, so the whole state machine runs deterministically on the
// host as well as inside a `requestAnimationFrame` loop.

use rand::seq::SliceRandom;
use rand::Rng;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

pub const DEFAULT_CHARSET: &str = "!<>-_\\/[]{}—=+*^?#________";
pub const REVEAL_START_WINDOW: u32 = 40;
pub const REVEAL_DURATION_WINDOW: u32 = 40;
pub const DUD_REROLL_PROBABILITY: f64 = 0.28;
pub const DUD_CLASS: &str = "dud";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScrambleError {
    #[error("scramble charset must contain at least one character")]
    EmptyCharset,
    #[error("reveal windows must be non-zero (start={start}, duration={duration})")]
    ZeroWindow { start: u32, duration: u32 },
    #[error("reveal windows overflow a frame counter (start={start}, duration={duration})")]
    WindowOverflow { start: u32, duration: u32 },
    #[error("dud reroll probability {0} is outside [0, 1]")]
    RerollProbability(f64),
}

#[derive(Clone, Debug)]
pub struct ScrambleConfig {
    pub charset: Vec<char>,
    /// `revealStart` is drawn from `[0, start_window)`.
    pub start_window: u32,
    /// `revealEnd - revealStart` is drawn from `[0, duration_window)`.
    pub duration_window: u32,
    pub reroll_probability: f64,
}

impl Default for ScrambleConfig {
    fn default() -> Self {
        Self {
            charset: DEFAULT_CHARSET.chars().collect(),
            start_window: REVEAL_START_WINDOW,
            duration_window: REVEAL_DURATION_WINDOW,
            reroll_probability: DUD_REROLL_PROBABILITY,
        }
    }
}

impl ScrambleConfig {
    pub fn validate(&self) -> Result<(), ScrambleError> {
        if self.charset.is_empty() {
            return Err(ScrambleError::EmptyCharset);
        }
        if self.start_window == 0 || self.duration_window == 0 {
            return Err(ScrambleError::ZeroWindow {
                start: self.start_window,
                duration: self.duration_window,
            });
        }
        if self.start_window.checked_add(self.duration_window).is_none() {
            return Err(ScrambleError::WindowOverflow {
                start: self.start_window,
                duration: self.duration_window,
            });
        }
        if !(0.0..=1.0).contains(&self.reroll_probability) {
            return Err(ScrambleError::RerollProbability(self.reroll_probability));
        }
        Ok(())
    }

    /// Upper bound on update steps a transition can take, the synchronous one included.
    pub fn max_frames(&self) -> u32 {
        self.start_window
            .saturating_add(self.duration_window)
            .saturating_sub(1)
    }
}

/// One rendered character of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Settled(char),
    Dud(char),
}

impl Glyph {
    pub fn ch(self) -> char {
        match self {
            Glyph::Settled(c) | Glyph::Dud(c) => c,
        }
    }
}

/// Plain text of a frame, duds included.
pub fn glyphs_to_text(glyphs: &[Glyph]) -> String {
    glyphs.iter().map(|g| g.ch()).collect()
}

/// Markup for a frame: settled glyphs raw, duds wrapped in a `dud` span.
pub fn glyphs_to_markup(glyphs: &[Glyph]) -> String {
    let mut out = String::with_capacity(glyphs.len() * 2);
    for g in glyphs {
        match *g {
            Glyph::Settled(c) => push_escaped(&mut out, c),
            Glyph::Dud(c) => {
                out.push_str("<span class=\"");
                out.push_str(DUD_CLASS);
                out.push_str("\">");
                push_escaped(&mut out, c);
                out.push_str("</span>");
            }
        }
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '&' => out.push_str("&amp;"),
        _ => out.push(c),
    }
}

/// Text a trigger should scramble to: the `data-text` attribute when it is
/// present and non-empty, otherwise whatever the element currently shows.
pub fn resolve_target_text(attribute: Option<String>, rendered: String) -> String {
    attribute.filter(|s| !s.is_empty()).unwrap_or(rendered)
}

/// One-shot viewport gate: fires only while intersecting and not yet done.
#[inline]
pub fn should_trigger_on_visible(is_intersecting: bool, already_scrambled: bool) -> bool {
    is_intersecting && !already_scrambled
}

pub trait TextSurface {
    fn read_text(&self) -> String;
    fn write_frame(&mut self, glyphs: &[Glyph]);
}

/// "Run once before the next paint" plus its cancellation.
pub trait FrameScheduler {
    type Handle: Copy;
    /// Returns `None` when the host refused to schedule.
    fn request_frame(&mut self) -> Option<Self::Handle>;
    fn cancel_frame(&mut self, handle: Self::Handle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionState {
    Pending,
    Resolved,
    Abandoned,
}

struct CompletionShared {
    state: CompletionState,
    wakers: Vec<Waker>,
}

/// Awaitable end of a transition. Resolves once the text has fully settled;
/// stays pending forever when a newer transition replaced it.
#[derive(Clone)]
pub struct Completion {
    shared: Rc<RefCell<CompletionShared>>,
}

struct Resolver {
    shared: Rc<RefCell<CompletionShared>>,
}

impl Completion {
    fn channel() -> (Completion, Resolver) {
        let shared = Rc::new(RefCell::new(CompletionShared {
            state: CompletionState::Pending,
            wakers: Vec::new(),
        }));
        (
            Completion {
                shared: shared.clone(),
            },
            Resolver { shared },
        )
    }

    pub fn state(&self) -> CompletionState {
        self.shared.borrow().state
    }

    pub fn is_resolved(&self) -> bool {
        self.state() == CompletionState::Resolved
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut shared = self.shared.borrow_mut();
        match shared.state {
            CompletionState::Resolved => Poll::Ready(()),
            _ => {
                // Every clone awaiting the transition gets its own wake.
                let waker = cx.waker();
                if !shared.wakers.iter().any(|w| w.will_wake(waker)) {
                    shared.wakers.push(waker.clone());
                }
                Poll::Pending
            }
        }
    }
}

impl Resolver {
    fn finish(self, state: CompletionState) {
        let wakers = {
            let mut shared = self.shared.borrow_mut();
            shared.state = state;
            std::mem::take(&mut shared.wakers)
        };
        if state == CompletionState::Resolved {
            for w in wakers {
                w.wake();
            }
        }
    }

    fn resolve(self) {
        self.finish(CompletionState::Resolved);
    }

    fn abandon(self) {
        self.finish(CompletionState::Abandoned);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub from: Option<char>,
    pub to: Option<char>,
    pub reveal_start: u32,
    pub reveal_end: u32,
    pub glyph: Option<char>,
}

pub struct ScrambleAnimator<T, S, R>
where
    T: TextSurface,
    S: FrameScheduler,
    R: Rng,
{
    target: T,
    scheduler: S,
    rng: R,
    config: ScrambleConfig,
    schedule: Vec<ScheduleEntry>,
    frame: u32,
    pending_frame: Option<S::Handle>,
    resolver: Option<Resolver>,
    output: Vec<Glyph>,
}

impl<T, S, R> ScrambleAnimator<T, S, R>
where
    T: TextSurface,
    S: FrameScheduler,
    R: Rng,
{
    pub fn new(
        target: T,
        scheduler: S,
        rng: R,
        config: ScrambleConfig,
    ) -> Result<Self, ScrambleError> {
        config.validate()?;
        Ok(Self {
            target,
            scheduler,
            rng,
            config,
            schedule: Vec::new(),
            frame: 0,
            pending_frame: None,
            resolver: None,
            output: Vec::new(),
        })
    }

    pub fn begin_transition(&mut self, new_text: &str) -> Completion {
        let old: Vec<char> = self.target.read_text().chars().collect();
        let new: Vec<char> = new_text.chars().collect();
        let length = old.len().max(new.len());

        self.schedule.clear();
        for i in 0..length {
            let reveal_start = self.rng.gen_range(0..self.config.start_window);
            let reveal_end =
                reveal_start.saturating_add(self.rng.gen_range(0..self.config.duration_window));
            self.schedule.push(ScheduleEntry {
                from: old.get(i).copied(),
                to: new.get(i).copied(),
                reveal_start,
                reveal_end,
                glyph: None,
            });
        }
        log::debug!(
            "[scramble] begin old_len={} new_len={}",
            old.len(),
            new.len()
        );

        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.frame = 0;

        let (completion, resolver) = Completion::channel();
        if let Some(prev) = self.resolver.replace(resolver) {
            prev.abandon();
        }

        self.update();
        completion
    }

    /// Host callback for a frame previously requested from the scheduler.
    pub fn on_frame(&mut self) {
        if self.pending_frame.take().is_none() {
            return;
        }
        self.update();
    }

    fn update(&mut self) {
        let frame = self.frame;
        let mut complete = 0;
        self.output.clear();

        for entry in self.schedule.iter_mut() {
            if frame >= entry.reveal_end {
                complete += 1;
                self.output.extend(entry.to.map(Glyph::Settled));
            } else if frame >= entry.reveal_start {
                if entry.glyph.is_none() || self.rng.gen_bool(self.config.reroll_probability) {
                    entry.glyph = self.config.charset.choose(&mut self.rng).copied();
                }
                self.output.extend(entry.glyph.map(Glyph::Dud));
            } else {
                self.output.extend(entry.from.map(Glyph::Settled));
            }
        }

        self.target.write_frame(&self.output);

        if complete == self.schedule.len() {
            if let Some(resolver) = self.resolver.take() {
                resolver.resolve();
            }
            return;
        }

        match self.scheduler.request_frame() {
            Some(handle) => self.pending_frame = Some(handle),
            None => log::warn!("[scramble] scheduler refused frame {}", frame + 1),
        }
        self.frame += 1;
    }

    pub fn is_animating(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
