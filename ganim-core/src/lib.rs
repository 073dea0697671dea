//! ganim-core: the diff-replay engine behind `ganim`.
//!
//! Given a list of commits with line-level added/deleted maps, the engine
//! reconstructs each file's content and replays every change as individual
//! character erasures and insertions, paced by a words-per-minute rate.
//!
//! Module map:
//!
//! - [`types`]: `Commit`, `Modification`, `ChangeKind`
//! - [`iter`]: the line-visit order for one modification
//! - [`file`] and [`registry`]: reconstructed files and their identity across
//!   adds, renames and deletes
//! - [`playback`]: the driver and the [`Stage`] trait the renderer implements
//! - [`transport`]: play/pause, live WPM and cancellation
//!
//! Nothing here touches the terminal or a git repository.

pub mod config;
pub mod error;
pub mod file;
pub mod iter;
pub mod playback;
pub mod registry;
pub mod transport;
pub mod types;

pub use config::{char_interval, IterationPolicy, PlaybackConfig};
pub use error::{Error, Result};
pub use file::File;
pub use iter::{iterate, LineVisit, ModificationIter};
pub use playback::{Outcome, Playback, PlaybackState, Stage, EMPTY_HISTORY_NOTICE};
pub use registry::{FileRegistry, Tab, TAB_LIMIT};
pub use transport::{transport, Controller, Pacer, Transport};
pub use types::{line_map, ChangeKind, Commit, LineMap, Modification};
