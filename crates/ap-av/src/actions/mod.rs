//! ffmpeg actions: audio extraction and segment cutting.

mod cut;
mod extract;

pub use cut::format_seconds;
pub use extract::audio_path_for;
