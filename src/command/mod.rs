//! Commands the input layer can issue
//!
//! A [`Command`] is what a key chord resolves to in the active scope's
//! keymap (see [`keymap`]). Commands are named in SCREAMING_SNAKE_CASE in
//! settings files and parse with [`str::parse`].

pub mod keymap;

pub use keymap::{KeyChord, Keymap};

use crate::error::MaidrError;
use crate::types::Direction;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Movement
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MoveToTopExtreme,
    MoveToBottomExtreme,
    MoveToLeftExtreme,
    MoveToRightExtreme,
    MoveToNextTrace,
    MoveToPrevTrace,
    MoveToTraceContext,
    MoveToSubplotContext,

    // Autoplay
    AutoplayUpward,
    AutoplayDownward,
    AutoplayForward,
    AutoplayBackward,
    StopAutoplay,
    SpeedUpAutoplay,
    SpeedDownAutoplay,
    ResetAutoplaySpeed,

    // Modes
    ToggleBraille,
    ToggleText,
    ToggleAudio,
    ToggleReview,

    // Scopes
    ActivateFigureLabelScope,
    ActivateTraceLabelScope,
    DeactivateFigureLabelScope,
    DeactivateTraceLabelScope,

    // Descriptions
    DescribeX,
    DescribeY,
    DescribeFill,
    DescribeTitle,
    DescribeSubtitle,
    DescribeCaption,
    DescribePoint,

    // Rotor
    RotorNextNav,
    RotorPrevNav,
}

impl Command {
    pub const ALL: [Command; 37] = [
        Command::MoveUp,
        Command::MoveDown,
        Command::MoveLeft,
        Command::MoveRight,
        Command::MoveToTopExtreme,
        Command::MoveToBottomExtreme,
        Command::MoveToLeftExtreme,
        Command::MoveToRightExtreme,
        Command::MoveToNextTrace,
        Command::MoveToPrevTrace,
        Command::MoveToTraceContext,
        Command::MoveToSubplotContext,
        Command::AutoplayUpward,
        Command::AutoplayDownward,
        Command::AutoplayForward,
        Command::AutoplayBackward,
        Command::StopAutoplay,
        Command::SpeedUpAutoplay,
        Command::SpeedDownAutoplay,
        Command::ResetAutoplaySpeed,
        Command::ToggleBraille,
        Command::ToggleText,
        Command::ToggleAudio,
        Command::ToggleReview,
        Command::ActivateFigureLabelScope,
        Command::ActivateTraceLabelScope,
        Command::DeactivateFigureLabelScope,
        Command::DeactivateTraceLabelScope,
        Command::DescribeX,
        Command::DescribeY,
        Command::DescribeFill,
        Command::DescribeTitle,
        Command::DescribeSubtitle,
        Command::DescribeCaption,
        Command::DescribePoint,
        Command::RotorNextNav,
        Command::RotorPrevNav,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::MoveUp => "MOVE_UP",
            Command::MoveDown => "MOVE_DOWN",
            Command::MoveLeft => "MOVE_LEFT",
            Command::MoveRight => "MOVE_RIGHT",
            Command::MoveToTopExtreme => "MOVE_TO_TOP_EXTREME",
            Command::MoveToBottomExtreme => "MOVE_TO_BOTTOM_EXTREME",
            Command::MoveToLeftExtreme => "MOVE_TO_LEFT_EXTREME",
            Command::MoveToRightExtreme => "MOVE_TO_RIGHT_EXTREME",
            Command::MoveToNextTrace => "MOVE_TO_NEXT_TRACE",
            Command::MoveToPrevTrace => "MOVE_TO_PREV_TRACE",
            Command::MoveToTraceContext => "MOVE_TO_TRACE_CONTEXT",
            Command::MoveToSubplotContext => "MOVE_TO_SUBPLOT_CONTEXT",
            Command::AutoplayUpward => "AUTOPLAY_UPWARD",
            Command::AutoplayDownward => "AUTOPLAY_DOWNWARD",
            Command::AutoplayForward => "AUTOPLAY_FORWARD",
            Command::AutoplayBackward => "AUTOPLAY_BACKWARD",
            Command::StopAutoplay => "STOP_AUTOPLAY",
            Command::SpeedUpAutoplay => "SPEED_UP_AUTOPLAY",
            Command::SpeedDownAutoplay => "SPEED_DOWN_AUTOPLAY",
            Command::ResetAutoplaySpeed => "RESET_AUTOPLAY_SPEED",
            Command::ToggleBraille => "TOGGLE_BRAILLE",
            Command::ToggleText => "TOGGLE_TEXT",
            Command::ToggleAudio => "TOGGLE_AUDIO",
            Command::ToggleReview => "TOGGLE_REVIEW",
            Command::ActivateFigureLabelScope => "ACTIVATE_FIGURE_LABEL_SCOPE",
            Command::ActivateTraceLabelScope => "ACTIVATE_TRACE_LABEL_SCOPE",
            Command::DeactivateFigureLabelScope => "DEACTIVATE_FIGURE_LABEL_SCOPE",
            Command::DeactivateTraceLabelScope => "DEACTIVATE_TRACE_LABEL_SCOPE",
            Command::DescribeX => "DESCRIBE_X",
            Command::DescribeY => "DESCRIBE_Y",
            Command::DescribeFill => "DESCRIBE_FILL",
            Command::DescribeTitle => "DESCRIBE_TITLE",
            Command::DescribeSubtitle => "DESCRIBE_SUBTITLE",
            Command::DescribeCaption => "DESCRIBE_CAPTION",
            Command::DescribePoint => "DESCRIBE_POINT",
            Command::RotorNextNav => "ROTOR_NEXT_NAV",
            Command::RotorPrevNav => "ROTOR_PREV_NAV",
        }
    }

    /// Direction of a single-step movement command
    pub fn step_direction(&self) -> Option<Direction> {
        match self {
            Command::MoveUp => Some(Direction::Upward),
            Command::MoveDown => Some(Direction::Downward),
            Command::MoveLeft => Some(Direction::Backward),
            Command::MoveRight => Some(Direction::Forward),
            _ => None,
        }
    }

    /// Direction of a move-to-extreme command
    pub fn extreme_direction(&self) -> Option<Direction> {
        match self {
            Command::MoveToTopExtreme => Some(Direction::Upward),
            Command::MoveToBottomExtreme => Some(Direction::Downward),
            Command::MoveToLeftExtreme => Some(Direction::Backward),
            Command::MoveToRightExtreme => Some(Direction::Forward),
            _ => None,
        }
    }

    /// Direction of an autoplay start command
    pub fn autoplay_direction(&self) -> Option<Direction> {
        match self {
            Command::AutoplayUpward => Some(Direction::Upward),
            Command::AutoplayDownward => Some(Direction::Downward),
            Command::AutoplayForward => Some(Direction::Forward),
            Command::AutoplayBackward => Some(Direction::Backward),
            _ => None,
        }
    }

    /// Whether the command moves a cursor by hand
    pub fn is_manual_move(&self) -> bool {
        self.step_direction().is_some()
            || self.extreme_direction().is_some()
            || matches!(
                self,
                Command::MoveToNextTrace
                    | Command::MoveToPrevTrace
                    | Command::MoveToTraceContext
                    | Command::MoveToSubplotContext
            )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Command {
    type Err = MaidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Command::ALL
            .iter()
            .copied()
            .find(|command| command.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| MaidrError::UnknownCommand(name.to_string()))
    }
}
