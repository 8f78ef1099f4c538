//! High score persistence
//!
//! A single best score stored as one line of text. The line is the decimal
//! score XOR-ed with the SHA-256 digest of a fixed key and hex encoded. This
//! only deters casual edits; it is kept for compatibility with existing
//! `highscore.dat` files, not as protection.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Key whose digest obfuscates the stored score
pub const OBFUSCATION_KEY: &str = "ee7d5971-c06e-485d-8b09-abae73aef66d";

/// Default file name in the app data directory
pub const HIGHSCORE_FILE: &str = "highscore.dat";

/// Application name used for the per-user data directory
pub const APP_NAME: &str = "dino-runner";

/// Per-user app data directory (`~/.local/share/dino-runner` on Linux,
/// `%APPDATA%\dino-runner\data` on Windows). `None` without a home directory.
pub fn app_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Why a stored high score could not be read
#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("high score file unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score file is empty")]
    Empty,
    #[error("high score data is not valid hex")]
    InvalidHex,
    #[error("decoded high score is not UTF-8")]
    InvalidUtf8,
    #[error("decoded high score is not a number: {0:?}")]
    InvalidNumber(String),
}

fn key_digest() -> [u8; 32] {
    Sha256::digest(OBFUSCATION_KEY.as_bytes()).into()
}

fn xor_with_key(data: &mut [u8]) {
    let key = key_digest();
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= key[i % key.len()];
    }
}

/// Encode a score into its on-disk line
pub fn encode_score(score: u64) -> String {
    let mut bytes = score.to_string().into_bytes();
    xor_with_key(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode an on-disk line back into a score
pub fn decode_score(line: &str) -> Result<u64, HighScoreError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(HighScoreError::Empty);
    }
    if line.len() % 2 != 0 || !line.is_ascii() {
        return Err(HighScoreError::InvalidHex);
    }
    let mut bytes = (0..line.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&line[i..i + 2], 16))
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| HighScoreError::InvalidHex)?;
    xor_with_key(&mut bytes);
    let text = String::from_utf8(bytes).map_err(|_| HighScoreError::InvalidUtf8)?;
    text.parse::<u64>()
        .map_err(|_| HighScoreError::InvalidNumber(text))
}

/// Where the best score lives
pub trait HighScoreStore {
    /// Stored best score, 0 if none could be read
    fn load_high_score(&self) -> u64;
    /// Persist a new best score. Failures are logged, never fatal.
    fn save_high_score(&mut self, score: u64);
}

/// File-backed store using the obfuscated line format
#[derive(Debug, Clone)]
pub struct FileHighScores {
    path: PathBuf,
}

impl FileHighScores {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store `highscore.dat` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(HIGHSCORE_FILE))
    }

    /// Store `highscore.dat` in the per-user app data directory
    pub fn per_user() -> Option<Self> {
        app_data_dir().map(Self::in_dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the first line of the file
    pub fn read(&self) -> Result<u64, HighScoreError> {
        let contents = fs::read_to_string(&self.path)?;
        let line = contents.lines().next().unwrap_or_default();
        decode_score(line)
    }

    /// Encode and write the score, creating parent directories as needed
    pub fn write(&self, score: u64) -> Result<(), HighScoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, encode_score(score))?;
        Ok(())
    }
}

impl HighScoreStore for FileHighScores {
    fn load_high_score(&self) -> u64 {
        match self.read() {
            Ok(score) => {
                log::info!("Loaded high score {} from {}", score, self.path.display());
                score
            }
            Err(HighScoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring high score in {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        match self.write(score) {
            Ok(()) => log::info!("High score {} saved", score),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    pub score: u64,
    /// Number of times a score was saved
    pub saves: u32,
}

impl MemoryHighScores {
    pub fn new(score: u64) -> Self {
        Self { score, saves: 0 }
    }
}

impl HighScoreStore for MemoryHighScores {
    fn load_high_score(&self) -> u64 {
        self.score
    }

    fn save_high_score(&mut self, score: u64) {
        self.score = score;
        self.saves += 1;
    }
}
