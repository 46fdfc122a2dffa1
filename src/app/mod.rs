//! Application helpers used by the `run_*` entry points.
//!
//! Feed reading, Ctrl-C handling, and track summaries.

pub mod feed;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use feed::{open_feed, parse_position_line, FeedLines};
pub use shutdown::cancel_on_ctrl_c;
pub use statistics::{log_track_summary, TrackEvent, TrackReport};
