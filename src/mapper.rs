//! Input mapper: turns a held-button snapshot into tokens once per sampling tick.
//!
//! ```text
//! keyboard ─┐
//!           ├─► InputSnapshot ──► InputMapper ──► [↘, P, K]
//! gamepad  ─┘      (held?)          │
//!                                   ▼
//!                             InputBindings
//! ```
//!
//! A sampling tick yields at most one direction and any number of attacks.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Default sampling cadence.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(80);

/// Default analog trigger press threshold.
pub const DEFAULT_TRIGGER_THRESHOLD: f32 = 0.3;

/// Logical digital button on a pad. Keyboard keys are mapped onto these too.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PadButton {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    LeftShoulder,
    RightShoulder,
}

/// Analog trigger, normalized to `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    Left,
    Right,
}

impl Trigger {
    #[inline]
    const fn index(self) -> usize {
        match self {
            Trigger::Left => 0,
            Trigger::Right => 1,
        }
    }
}

/// Where the mapper reads held state from.
///
/// `device` indexes the list of connected devices. A device can be fed by
/// several sources at once (the keyboard and a pad). Button combinations
/// only count when one source holds every part of them.
pub trait InputSource {
    /// Every source feeding `device`. Sources for an unknown index are simply
    /// absent; a stale index is normal while a controller is being unplugged.
    fn sources(&self, device: usize) -> impl Iterator<Item = &PadState>;

    fn pressed(&self, device: usize, button: PadButton) -> bool {
        self.sources(device).any(|pad| pad.pressed(button))
    }

    fn trigger(&self, device: usize, trigger: Trigger) -> f32 {
        self.sources(device)
            .map(|pad| pad.trigger(trigger))
            .fold(0.0, f32::max)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// Held state of one pad (or of the keyboard, mapped onto pad buttons).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PadState {
    buttons: HashSet<PadButton>,
    triggers: [f32; 2],
}

impl PadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: hold a button and return self.
    pub fn with(mut self, button: PadButton) -> Self {
        self.press(button);
        self
    }

    /// Builder method: set a trigger value and return self.
    pub fn with_trigger(mut self, trigger: Trigger, value: f32) -> Self {
        self.set_trigger(trigger, value);
        self
    }

    #[inline]
    pub fn press(&mut self, button: PadButton) {
        self.buttons.insert(button);
    }

    #[inline]
    pub fn set_trigger(&mut self, trigger: Trigger, value: f32) {
        self.triggers[trigger.index()] = value.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn pressed(&self, button: PadButton) -> bool {
        self.buttons.contains(&button)
    }

    #[inline]
    pub fn trigger(&self, trigger: Trigger) -> f32 {
        self.triggers[trigger.index()]
    }

    pub fn is_idle(&self) -> bool {
        self.buttons.is_empty() && self.triggers.iter().all(|&v| v == 0.0)
    }
}

/// One frame of held input: the keyboard plus every connected pad, in
/// connection order.
///
/// The keyboard drives every device index, so it keeps working with no pad
/// connected. It counts as its own source: holding up on a pad and left on
/// the keyboard is two separate directions, not a diagonal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub keyboard: PadState,
    pub pads: Vec<PadState>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keyboard(keyboard: PadState) -> Self {
        Self {
            keyboard,
            pads: Vec::new(),
        }
    }

    pub fn with_pad(mut self, pad: PadState) -> Self {
        self.pads.push(pad);
        self
    }
}

impl InputSource for InputSnapshot {
    fn sources(&self, device: usize) -> impl Iterator<Item = &PadState> {
        std::iter::once(&self.keyboard).chain(self.pads.get(device))
    }
}

// =============================================================================
// Bindings
// =============================================================================

/// A physical input that can produce an attack token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhysicalInput {
    Button(PadButton),
    Trigger(Trigger),
}

impl From<PadButton> for PhysicalInput {
    fn from(button: PadButton) -> Self {
        Self::Button(button)
    }
}

impl From<Trigger> for PhysicalInput {
    fn from(trigger: Trigger) -> Self {
        Self::Trigger(trigger)
    }
}

/// Directions in priority order: diagonals first, first match wins.
const DIRECTION_PRIORITY: [(Token, &[PadButton]); 8] = [
    (Token::UpLeft, &[PadButton::Up, PadButton::Left]),
    (Token::UpRight, &[PadButton::Up, PadButton::Right]),
    (Token::DownLeft, &[PadButton::Down, PadButton::Left]),
    (Token::DownRight, &[PadButton::Down, PadButton::Right]),
    (Token::Up, &[PadButton::Up]),
    (Token::Down, &[PadButton::Down]),
    (Token::Left, &[PadButton::Left]),
    (Token::Right, &[PadButton::Right]),
];

/// Which physical inputs produce which attack tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct InputBindings {
    attacks: Vec<(PhysicalInput, Token)>,
    composites: Vec<(PhysicalInput, PhysicalInput, Token)>,
    trigger_threshold: f32,
    emit_neutral: bool,
}

impl Default for InputBindings {
    /// X, Y and right shoulder punch; A, B and the right trigger kick;
    /// X + A grabs.
    fn default() -> Self {
        Self::empty()
            .with_attack(PadButton::X, Token::Punch)
            .with_attack(PadButton::Y, Token::Punch)
            .with_attack(PadButton::RightShoulder, Token::Punch)
            .with_attack(PadButton::A, Token::Kick)
            .with_attack(PadButton::B, Token::Kick)
            .with_attack(Trigger::Right, Token::Kick)
            .with_composite(PadButton::X, PadButton::A, Token::Grab)
    }
}

impl InputBindings {
    /// Directions only, no attack bindings.
    pub fn empty() -> Self {
        Self {
            attacks: Vec::new(),
            composites: Vec::new(),
            trigger_threshold: DEFAULT_TRIGGER_THRESHOLD,
            emit_neutral: false,
        }
    }

    /// Builder method: bind an input to an attack token.
    ///
    /// Several inputs may share a token; each held one emits its own copy.
    pub fn with_attack(mut self, input: impl Into<PhysicalInput>, token: Token) -> Self {
        self.attacks.push((input.into(), token));
        self
    }

    /// Builder method: bind a simultaneous pair to a composite token.
    ///
    /// When both are held the pair emits only `token`; their own attack
    /// bindings are suppressed for that tick.
    pub fn with_composite(
        mut self,
        first: impl Into<PhysicalInput>,
        second: impl Into<PhysicalInput>,
        token: Token,
    ) -> Self {
        self.composites.push((first.into(), second.into(), token));
        self
    }

    /// Builder method: analog level at which a trigger counts as pressed.
    ///
    /// Clamped to `(0.0, 1.0]`: a resting trigger reads `0.0` and must never
    /// count as pressed.
    pub fn trigger_threshold(mut self, threshold: f32) -> Self {
        self.trigger_threshold = threshold.clamp(f32::MIN_POSITIVE, 1.0);
        self
    }

    /// Emit [`Token::Neutral`] on ticks where no direction is held.
    pub fn emit_neutral(mut self, enabled: bool) -> Self {
        self.emit_neutral = enabled;
        self
    }

    fn active(&self, pad: &PadState, input: PhysicalInput) -> bool {
        match input {
            PhysicalInput::Button(button) => pad.pressed(button),
            PhysicalInput::Trigger(trigger) => pad.trigger(trigger) >= self.trigger_threshold,
        }
    }
}

// =============================================================================
// Sampling
// =============================================================================

/// Fixed-cadence timer, independent of the frame rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleTimer {
    interval: Duration,
    elapsed: Duration,
}

impl SampleTimer {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by `dt`. Returns `true` when the interval is reached, and then
    /// restarts from zero rather than carrying the remainder.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Samples one device of an [`InputSource`] and emits tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct InputMapper {
    bindings: InputBindings,
    device: usize,
    timer: SampleTimer,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(InputBindings::default(), DEFAULT_SAMPLE_INTERVAL)
    }
}

impl InputMapper {
    pub fn new(bindings: InputBindings, sample_interval: Duration) -> Self {
        Self {
            bindings,
            device: 0,
            timer: SampleTimer::new(sample_interval),
        }
    }

    /// Builder method: read from another device index (default 0).
    pub fn with_device(mut self, device: usize) -> Self {
        self.device = device;
        self
    }

    #[inline]
    pub fn device(&self) -> usize {
        self.device
    }

    #[inline]
    pub fn bindings(&self) -> &InputBindings {
        &self.bindings
    }

    /// Advance the sampling clock and map the source if a tick is due.
    ///
    /// Returns no tokens between ticks.
    pub fn sample(&mut self, dt: Duration, source: &impl InputSource) -> Vec<Token> {
        if self.timer.tick(dt) {
            self.map(source)
        } else {
            Vec::new()
        }
    }

    /// Map the currently held inputs to tokens, ignoring the sampling clock.
    pub fn map(&self, source: &impl InputSource) -> Vec<Token> {
        let device = self.device;
        let mut tokens = Vec::new();

        let direction = DIRECTION_PRIORITY
            .iter()
            .find(|(_, buttons)| {
                source
                    .sources(device)
                    .any(|pad| buttons.iter().all(|&b| pad.pressed(b)))
            })
            .map(|&(token, _)| token);
        match direction {
            Some(token) => tokens.push(token),
            None if self.bindings.emit_neutral => tokens.push(Token::Neutral),
            None => {}
        }

        let mut consumed: HashSet<PhysicalInput> = HashSet::new();
        for &(first, second, token) in &self.bindings.composites {
            let held = source.sources(device).any(|pad| {
                self.bindings.active(pad, first) && self.bindings.active(pad, second)
            });
            if held {
                tokens.push(token);
                consumed.insert(first);
                consumed.insert(second);
            }
        }

        for &(input, token) in &self.bindings.attacks {
            if !consumed.contains(&input)
                && source
                    .sources(device)
                    .any(|pad| self.bindings.active(pad, input))
            {
                tokens.push(token);
            }
        }

        tokens
    }
}
