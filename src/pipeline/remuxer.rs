use crate::audio::Track;
use crate::error::{RedubError, Result};
use crate::media::MediaTool;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// File name of the assembled track inside the run's working directory.
pub const TRACK_FILE_NAME: &str = "dubbed_track.wav";

/// File name the muxer writes to inside the working directory.
pub const MUXED_FILE_NAME: &str = "dubbed_video.mp4";

/// Puts the assembled track back under the original video stream.
pub struct Remuxer {
    media: Arc<dyn MediaTool>,
}

impl Remuxer {
    pub fn new(media: Arc<dyn MediaTool>) -> Self {
        Self { media }
    }

    /// Write `track` into `work_dir` and mux it with `video` into `output`.
    ///
    /// The muxer writes inside `work_dir`; the result is moved to `output`
    /// only once muxing succeeded. A failed run leaves `output` as it was.
    pub fn remux(&self, video: &Path, track: Track, work_dir: &Path, output: &Path) -> Result<()> {
        let track_path = work_dir.join(TRACK_FILE_NAME);
        track.into_clip().write_wav_file(&track_path)?;

        let staged = work_dir.join(MUXED_FILE_NAME);
        if let Err(e) = self.media.replace_audio(video, &track_path, &staged) {
            return Err(RedubError::RemuxFailed {
                message: e.to_string(),
            });
        }

        if !staged.exists() {
            return Err(RedubError::RemuxFailed {
                message: "muxer reported success but wrote no file".to_string(),
            });
        }
        move_into_place(&staged, output)
    }
}

/// Rename `staged` to `output`, copying when they sit on different filesystems.
fn move_into_place(staged: &Path, output: &Path) -> Result<()> {
    if fs::rename(staged, output).is_ok() {
        return Ok(());
    }
    fs::copy(staged, output).map_err(|e| RedubError::RemuxFailed {
        message: format!("failed to write {}: {}", output.display(), e),
    })?;
    Ok(())
}
