//! Output channels
//!
//! Each channel is an [`Observer`](crate::model::observer::Observer)
//! registered on every plot node. Channels decide on their own whether an
//! update produces output, and publish [`OutputEvent`]s through the bridge.
//!
//! # Main Types
//!
//! - [`OutputBridge`] / [`OutputSender`] - bounded event channel to the front end
//! - [`Notifier`] - status message sink
//! - [`AudioChannel`], [`BrailleChannel`], [`TextChannel`], [`ReviewChannel`],
//!   [`HighlightChannel`] - the observers

pub mod audio;
pub mod braille;
pub mod bridge;
pub mod highlight;
pub mod notification;
pub mod review;
pub mod text;

pub use audio::AudioChannel;
pub use braille::BrailleChannel;
pub use bridge::{OutputBridge, OutputEvent, OutputSender, Tone, OUTPUT_CHANNEL_CAPACITY};
pub use highlight::HighlightChannel;
pub use notification::{MuteFlag, Notifier};
pub use review::ReviewChannel;
pub use text::TextChannel;
