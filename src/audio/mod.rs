//! PCM audio buffers and the primitives that transform them.
//!
//! Everything here is mono 16-bit PCM at a fixed sample rate. Transforms never
//! mutate a clip in place; they return a new one whose duration matches its
//! sample count.

pub mod clip;
pub mod speed;
pub mod track;
pub mod wav;

pub use clip::{AudioClip, seconds_to_samples};
pub use track::Track;
