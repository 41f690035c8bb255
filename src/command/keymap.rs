//! Per-scope key bindings
//!
//! Each [`Scope`] has its own table from [`KeyChord`] to [`Command`]. Only
//! the active scope's table is consulted, and a chord it does not bind is
//! ignored.
//!
//! # Chord syntax
//!
//! Chords are `+`-separated, e.g. `ctrl+shift+right`. They are normalized
//! before lookup: lowercase, modifiers in `ctrl`, `alt`, `shift` order, and
//! the aliases `esc` → `escape`, `return` → `enter`, `control` → `ctrl`,
//! `option` → `alt`.

use crate::command::Command;
use crate::config::KeymapOverrides;
use crate::error::{MaidrError, Result, ResultExt};
use crate::types::Scope;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const MODIFIERS: [&str; 3] = ["ctrl", "alt", "shift"];

/// A normalized key chord
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord(String);

impl KeyChord {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for KeyChord {
    type Err = MaidrError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<String> = s
            .split('+')
            .map(|part| alias(&part.trim().to_lowercase()).to_string())
            .collect();
        let Some((key, modifiers)) = parts.split_last() else {
            return Err(MaidrError::Config(format!("empty key chord '{}'", s)));
        };
        if key.is_empty() {
            return Err(MaidrError::Config(format!("key chord '{}' has no key", s)));
        }
        if let Some(unknown) = modifiers.iter().find(|m| !MODIFIERS.contains(&m.as_str())) {
            return Err(MaidrError::Config(format!(
                "unknown modifier '{}' in key chord '{}'",
                unknown, s
            )));
        }

        let mut normalized: Vec<&str> = MODIFIERS
            .iter()
            .copied()
            .filter(|m| modifiers.iter().any(|given| given == m))
            .collect();
        normalized.push(key);
        Ok(Self(normalized.join("+")))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn alias(part: &str) -> &str {
    match part {
        "esc" => "escape",
        "return" => "enter",
        "control" => "ctrl",
        "option" => "alt",
        other => other,
    }
}

const TRACE_BINDINGS: &[(&str, Command)] = &[
    ("l", Command::ActivateTraceLabelScope),
    ("ctrl+shift+up", Command::AutoplayUpward),
    ("ctrl+shift+down", Command::AutoplayDownward),
    ("ctrl+shift+right", Command::AutoplayForward),
    ("ctrl+shift+left", Command::AutoplayBackward),
    ("ctrl", Command::StopAutoplay),
    (".", Command::SpeedUpAutoplay),
    (",", Command::SpeedDownAutoplay),
    ("/", Command::ResetAutoplaySpeed),
    ("up", Command::MoveUp),
    ("down", Command::MoveDown),
    ("right", Command::MoveRight),
    ("left", Command::MoveLeft),
    ("ctrl+up", Command::MoveToTopExtreme),
    ("ctrl+down", Command::MoveToBottomExtreme),
    ("ctrl+left", Command::MoveToLeftExtreme),
    ("ctrl+right", Command::MoveToRightExtreme),
    ("escape", Command::MoveToSubplotContext),
    ("pageup", Command::MoveToNextTrace),
    ("pagedown", Command::MoveToPrevTrace),
    ("b", Command::ToggleBraille),
    ("t", Command::ToggleText),
    ("s", Command::ToggleAudio),
    ("r", Command::ToggleReview),
    ("space", Command::DescribePoint),
    ("alt+shift+up", Command::RotorNextNav),
    ("alt+shift+down", Command::RotorPrevNav),
];

const SUBPLOT_BINDINGS: &[(&str, Command)] = &[
    ("l", Command::ActivateFigureLabelScope),
    ("t", Command::DescribeTitle),
    ("space", Command::DescribePoint),
    ("up", Command::MoveUp),
    ("down", Command::MoveDown),
    ("right", Command::MoveRight),
    ("left", Command::MoveLeft),
    ("ctrl+up", Command::MoveToTopExtreme),
    ("ctrl+down", Command::MoveToBottomExtreme),
    ("ctrl+left", Command::MoveToLeftExtreme),
    ("ctrl+right", Command::MoveToRightExtreme),
    ("enter", Command::MoveToTraceContext),
];

const FIGURE_LABEL_BINDINGS: &[(&str, Command)] = &[
    ("escape", Command::DeactivateFigureLabelScope),
    ("t", Command::DescribeTitle),
    ("s", Command::DescribeSubtitle),
    ("c", Command::DescribeCaption),
];

const TRACE_LABEL_BINDINGS: &[(&str, Command)] = &[
    ("escape", Command::DeactivateTraceLabelScope),
    ("x", Command::DescribeX),
    ("y", Command::DescribeY),
    ("f", Command::DescribeFill),
    ("t", Command::DescribeTitle),
    ("s", Command::DescribeSubtitle),
    ("c", Command::DescribeCaption),
];

const REVIEW_BINDINGS: &[(&str, Command)] = &[
    ("b", Command::ToggleBraille),
    ("r", Command::ToggleReview),
];

/// Key bindings for every scope
#[derive(Debug, Clone)]
pub struct Keymap {
    tables: HashMap<Scope, HashMap<KeyChord, Command>>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut tables = HashMap::new();
        for scope in Scope::ALL {
            let bindings = match scope {
                Scope::Trace => TRACE_BINDINGS,
                Scope::Subplot => SUBPLOT_BINDINGS,
                Scope::FigureLabel => FIGURE_LABEL_BINDINGS,
                Scope::TraceLabel => TRACE_LABEL_BINDINGS,
                Scope::Review => REVIEW_BINDINGS,
                Scope::Braille => TRACE_BINDINGS,
            };
            let table = bindings
                .iter()
                .filter(|(_, command)| {
                    // Braille keeps the trace keys but cannot leave the subplot
                    !(scope == Scope::Braille && *command == Command::MoveToSubplotContext)
                })
                .map(|(chord, command)| (KeyChord(chord.to_string()), *command))
                .collect();
            tables.insert(scope, table);
        }
        Self { tables }
    }
}

impl Keymap {
    /// Default bindings with user overrides applied
    pub fn with_overrides(overrides: &KeymapOverrides) -> Result<Self> {
        let mut keymap = Self::default();
        for (scope_name, bindings) in overrides {
            let scope = Scope::ALL
                .into_iter()
                .find(|s| s.display_name().eq_ignore_ascii_case(scope_name))
                .ok_or_else(|| MaidrError::Config(format!("unknown keymap scope '{}'", scope_name)))?;
            for (command_name, chord) in bindings {
                let command: Command = command_name
                    .parse()
                    .with_context(|| format!("keymap.{}", scope_name))?;
                let chord: KeyChord = chord
                    .parse()
                    .with_context(|| format!("keymap.{}.{}", scope_name, command_name))?;
                keymap.bind(scope, chord, command);
            }
        }
        Ok(keymap)
    }

    /// Bind `chord` to `command` in `scope`, replacing the command's old chord
    pub fn bind(&mut self, scope: Scope, chord: KeyChord, command: Command) {
        let table = self.tables.entry(scope).or_default();
        table.retain(|_, bound| *bound != command);
        tracing::debug!(%scope, %chord, %command, "key bound");
        table.insert(chord, command);
    }

    /// Command bound to `chord` in `scope`, if any
    pub fn lookup(&self, scope: Scope, chord: &KeyChord) -> Option<Command> {
        self.tables.get(&scope)?.get(chord).copied()
    }

    /// Chord bound to `command` in `scope`, if any
    pub fn chord_for(&self, scope: Scope, command: Command) -> Option<&KeyChord> {
        self.tables
            .get(&scope)?
            .iter()
            .find(|(_, bound)| **bound == command)
            .map(|(chord, _)| chord)
    }
}
