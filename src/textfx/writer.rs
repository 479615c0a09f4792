//! Sequential reveal
//!
//!     The [Writer] reveals a processed document one character at a time. It is a plain
//!     state machine advanced by [Writer::tick]; the host calls it once per frame with the
//!     elapsed time.
//!
//!         Idle --start--> Writing --wait--> Waiting { remaining } --elapsed--> Writing
//!                           |  \--wait_for--> WaitingFor { condition } --met--> Writing
//!                           |  \--pause--> Paused --resume--> (previous state)
//!                           \--last index--> Finished
//!
//!     Before index `i` is revealed, every command starting at `i` runs once through
//!     [WriterHost::command]. A command may change the per-character delay, or suspend the
//!     writer through [WriterControl]. After `i` is revealed, every event starting at `i` is
//!     emitted once. Commands and events starting at the document length fire right before
//!     the writer finishes.
//!
//!     Commands and events are looked up in the command and event caches of a [Script],
//!     usually borrowed from an [EffectPipeline](crate::textfx::pipeline::EffectPipeline).

use crate::textfx::cache::{BasicTag, CachedTag, CachedTagId, TagCache};
use crate::textfx::parameters::parse_bool;
use crate::textfx::tags::EffectTag;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Seconds per character.
    pub delay: f32,
    pub auto_start: bool,
    pub skippable: bool,
    /// Whether [Writer::skip] still fires commands and events it jumps over.
    pub fire_on_skip: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            delay: 0.075,
            auto_start: true,
            skippable: true,
            fire_on_skip: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriterState {
    Idle,
    Writing,
    Waiting { remaining: f32 },
    WaitingFor { condition: String },
    Paused,
    Finished,
}

/// Requests a command can make of the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct WriterControl {
    delay: f32,
    wait: Option<f32>,
    wait_for: Option<String>,
    pause: bool,
    skippable: Option<bool>,
}

impl WriterControl {
    fn new(delay: f32) -> Self {
        Self {
            delay,
            wait: None,
            wait_for: None,
            pause: false,
            skippable: None,
        }
    }

    /// Current seconds per character.
    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Change the seconds per character from now on. Negative values count as zero.
    pub fn set_delay(&mut self, delay: f32) {
        self.delay = delay.max(0.0);
    }

    /// Stop writing for `seconds`.
    pub fn wait(&mut self, seconds: f32) {
        self.wait = Some(seconds.max(0.0));
    }

    /// Stop writing until the host reports `condition` as met.
    pub fn wait_for(&mut self, condition: impl Into<String>) {
        self.wait_for = Some(condition.into());
    }

    pub fn pause(&mut self) {
        self.pause = true;
    }

    /// Allow or forbid [Writer::skip] until the writer restarts.
    pub fn set_skippable(&mut self, skippable: bool) {
        self.skippable = Some(skippable);
    }
}

/// The writer's view of the host.
pub trait WriterHost {
    /// Run a command. The default handles the built-in commands only.
    fn command(&mut self, _index: usize, tag: &EffectTag, control: &mut WriterControl) {
        builtin_command(tag, control);
    }

    fn event(&mut self, _index: usize, _tag: &EffectTag) {}

    fn reveal(&mut self, _index: usize) {}

    fn condition_met(&mut self, _condition: &str) -> bool {
        true
    }

    fn finished(&mut self) {}
}

/// Built-in commands:
///
///     <!delay=0.1>        seconds per character from here on
///     <!wait=1.5>         stop for 1.5 seconds
///     <!waitfor=input>    stop until the host reports "input" as met
///     <!pause>            pause until resumed
///     <!pause=false>      ignored
///     <!skippable=false>  forbid skipping from here on (`<!skippable>` allows it again)
///
/// Returns whether the tag was one of them.
pub fn builtin_command(tag: &EffectTag, control: &mut WriterControl) -> bool {
    let parameters = tag.parameters();
    let default_f32 = || parameters.f32_of(&["", "value"]).ok().flatten();
    match tag.name().to_ascii_lowercase().as_str() {
        "delay" => {
            if let Some(delay) = default_f32() {
                control.set_delay(delay);
            }
            true
        }
        "wait" => {
            if let Some(seconds) = default_f32() {
                control.wait(seconds);
            }
            true
        }
        "waitfor" => {
            if let Some(condition) = parameters.default_value().filter(|v| !v.is_empty()) {
                control.wait_for(condition);
            }
            true
        }
        "pause" => {
            let enabled = parameters
                .default_value()
                .and_then(parse_bool)
                .unwrap_or(true);
            if enabled {
                control.pause();
            }
            true
        }
        "skippable" => {
            let skippable = parameters
                .default_value()
                .and_then(parse_bool)
                .unwrap_or(true);
            control.set_skippable(skippable);
            true
        }
        _ => false,
    }
}

/// Command and event caches a writer reads from.
#[derive(Debug, Clone, Copy)]
pub struct Script<'a> {
    pub commands: &'a TagCache<BasicTag>,
    pub events: &'a TagCache<BasicTag>,
}

#[derive(Debug, Clone)]
pub struct Writer {
    config: WriterConfig,
    state: WriterState,
    resume_to: Option<WriterState>,
    len: usize,
    revealed: usize,
    timer: f32,
    delay: f32,
    skippable: bool,
    fired_commands: HashSet<CachedTagId>,
    fired_events: HashSet<CachedTagId>,
}

impl Writer {
    /// A writer for a document of `len` characters.
    pub fn new(config: WriterConfig, len: usize) -> Self {
        let state = if config.auto_start {
            WriterState::Writing
        } else {
            WriterState::Idle
        };
        let delay = config.delay.max(0.0);
        let skippable = config.skippable;
        Self {
            config,
            state,
            resume_to: None,
            len,
            revealed: 0,
            timer: 0.0,
            delay,
            skippable,
            fired_commands: HashSet::new(),
            fired_events: HashSet::new(),
        }
    }

    pub fn state(&self) -> &WriterState {
        &self.state
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Number of characters revealed so far.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Whether [Writer::skip] is currently allowed. Starts from the config and follows
    /// `skippable` commands.
    pub fn is_skippable(&self) -> bool {
        self.skippable
    }

    pub fn is_finished(&self) -> bool {
        self.state == WriterState::Finished
    }

    /// Whether index `i` is visible.
    pub fn is_revealed(&self, index: usize) -> bool {
        index < self.revealed
    }

    /// Adopt a new document length, after reconciliation for instance. Characters already
    /// revealed stay revealed.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.revealed = self.revealed.min(len);
        if self.state == WriterState::Finished && self.revealed < len {
            self.set_state(WriterState::Writing);
        }
    }

    pub fn start(&mut self) {
        if self.state == WriterState::Idle {
            self.set_state(WriterState::Writing);
        }
    }

    pub fn pause(&mut self) {
        if matches!(self.state, WriterState::Idle | WriterState::Paused | WriterState::Finished) {
            return;
        }
        self.resume_to = Some(self.state.clone());
        self.set_state(WriterState::Paused);
    }

    pub fn resume(&mut self) {
        if self.state == WriterState::Paused {
            let state = self.resume_to.take().unwrap_or(WriterState::Writing);
            self.set_state(state);
        }
    }

    /// Back to the first character, with nothing revealed or fired.
    pub fn restart(&mut self) {
        self.revealed = 0;
        self.timer = 0.0;
        self.delay = self.config.delay.max(0.0);
        self.skippable = self.config.skippable;
        self.resume_to = None;
        self.fired_commands.clear();
        self.fired_events.clear();
        let state = if self.config.auto_start {
            WriterState::Writing
        } else {
            WriterState::Idle
        };
        self.set_state(state);
    }

    /// Reveal everything at once. Returns false if skipping is disabled.
    pub fn skip<H: WriterHost + ?Sized>(&mut self, script: Script<'_>, host: &mut H) -> bool {
        if !self.skippable {
            return false;
        }
        if self.state == WriterState::Finished {
            return true;
        }
        let fire = self.config.fire_on_skip;
        while self.revealed < self.len {
            let index = self.revealed;
            if fire {
                self.run_commands(index, script.commands, host);
            }
            host.reveal(index);
            self.revealed += 1;
            if fire {
                self.emit_events(index, script.events, host);
            }
        }
        if fire {
            self.run_commands(self.len, script.commands, host);
            self.emit_events(self.len, script.events, host);
        }
        self.resume_to = None;
        self.finish(host);
        true
    }

    /// Advance by `delta` seconds.
    pub fn tick<H: WriterHost + ?Sized>(&mut self, delta: f32, script: Script<'_>, host: &mut H) {
        let mut delta = delta.max(0.0);
        match &self.state {
            WriterState::Idle | WriterState::Paused | WriterState::Finished => return,
            WriterState::Waiting { remaining } => {
                let remaining = remaining - delta;
                if remaining > 0.0 {
                    self.state = WriterState::Waiting { remaining };
                    return;
                }
                delta = -remaining;
                self.set_state(WriterState::Writing);
            }
            WriterState::WaitingFor { condition } => {
                if !host.condition_met(condition) {
                    return;
                }
                self.set_state(WriterState::Writing);
            }
            WriterState::Writing => {}
        }

        self.timer += delta;
        while self.state == WriterState::Writing {
            let index = self.revealed;
            if self.run_commands(index, script.commands, host) {
                break;
            }
            if index >= self.len {
                self.emit_events(index, script.events, host);
                self.finish(host);
                break;
            }
            if self.timer < self.delay {
                break;
            }
            self.timer -= self.delay;
            host.reveal(index);
            self.revealed += 1;
            self.emit_events(index, script.events, host);
        }
    }

    /// Run unfired commands starting at `index`. Returns true if one of them suspended the
    /// writer; the rest run once it is writing again.
    fn run_commands<H: WriterHost + ?Sized>(
        &mut self,
        index: usize,
        commands: &TagCache<BasicTag>,
        host: &mut H,
    ) -> bool {
        for (id, command) in commands.starting_at(index) {
            if !self.fired_commands.insert(id) {
                continue;
            }
            let mut control = WriterControl::new(self.delay);
            host.command(index, command.tag(), &mut control);
            self.delay = control.delay;
            if let Some(skippable) = control.skippable {
                self.skippable = skippable;
            }

            let suspended = if control.pause {
                self.resume_to = Some(WriterState::Writing);
                Some(WriterState::Paused)
            } else if let Some(seconds) = control.wait {
                Some(WriterState::Waiting { remaining: seconds })
            } else {
                control
                    .wait_for
                    .take()
                    .map(|condition| WriterState::WaitingFor { condition })
            };
            if let Some(state) = suspended {
                self.timer = 0.0;
                self.set_state(state);
                return true;
            }
        }
        false
    }

    fn emit_events<H: WriterHost + ?Sized>(
        &mut self,
        index: usize,
        events: &TagCache<BasicTag>,
        host: &mut H,
    ) {
        for (id, event) in events.starting_at(index) {
            if self.fired_events.insert(id) {
                host.event(index, event.tag());
            }
        }
    }

    fn finish<H: WriterHost + ?Sized>(&mut self, host: &mut H) {
        self.set_state(WriterState::Finished);
        host.finished();
    }

    fn set_state(&mut self, state: WriterState) {
        if self.state != state {
            tracing::trace!(
                target: "textfx::writer",
                from = ?self.state,
                to = ?state,
                revealed = self.revealed,
                "writer state"
            );
        }
        self.state = state;
    }
}
