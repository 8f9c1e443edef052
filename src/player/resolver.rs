//! Audio locator resolution.
//!
//! Local deployments keep audio files next to the catalog, named after the
//! song; since naming drifted over time several candidate names are tried.
//! Remote deployments hand the song id to a streaming host that redirects to
//! the actual media.

use std::path::PathBuf;

use crate::model::Song;

/// Characters that never appear in stored audio file names.
const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// How audio locators are built for a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioMode {
    /// Probe files under `base_dir`, trying each extension in order
    LocalFiles {
        base_dir: PathBuf,
        extensions: Vec<String>,
    },
    /// Ask the streaming host at `base_url`
    Remote { base_url: String },
}

/// Strip characters unsafe in file names and collapse whitespace runs.
pub fn sanitize_for_filename(name: &str) -> String {
    name.split(|c: char| UNSAFE_FILENAME_CHARS.contains(&c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds audio locators for songs.
#[derive(Debug, Clone)]
pub struct AudioResolver {
    mode: AudioMode,
}

impl AudioResolver {
    pub fn new(mode: AudioMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> &AudioMode {
        &self.mode
    }

    /// Whether a failed locator should be followed by the next candidate.
    pub fn retries(&self) -> bool {
        matches!(self.mode, AudioMode::LocalFiles { .. })
    }

    /// Locators to try for a song, in order.
    ///
    /// Local mode yields `<title>-<id>` for each extension, then `<id>` for
    /// each extension. A title that sanitizes to nothing is replaced by the
    /// id. Remote mode yields the single `/play/<id>` URL.
    pub fn locators(&self, song: &Song) -> Vec<String> {
        match &self.mode {
            AudioMode::LocalFiles { base_dir, extensions } => {
                let mut name = sanitize_for_filename(&song.title);
                if name.is_empty() {
                    name = song.id.clone();
                }
                let stems = [format!("{}-{}", name, song.id), song.id.clone()];

                stems
                    .iter()
                    .flat_map(|stem| {
                        extensions
                            .iter()
                            .map(move |ext| base_dir.join(format!("{}.{}", stem, ext)))
                    })
                    .map(|path| path.display().to_string())
                    .collect()
            }
            AudioMode::Remote { base_url } => {
                vec![format!("{}/play/{}", base_url, urlencoding::encode(&song.id))]
            }
        }
    }
}
