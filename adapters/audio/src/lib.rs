#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Best-effort sound cache keyed by logical cue names.
//!
//! Cues are declared in a versioned TOML manifest. Each entry is loaded once
//! through an [`AudioBackend`]; entries that fail to load are remembered as
//! missing, and playing a missing cue logs a warning instead of failing.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use echo_defence_core::Event;
use tracing::{debug, warn};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Logical sounds the game can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoundCue {
    /// A new wave begins.
    WaveCreate,
    /// An enemy was defeated.
    EnemyHit,
    /// The run ended.
    GameOver,
    /// A burst bonus was collected.
    PowerupCollect,
    /// The player fired an echo wave.
    EchoBurst,
}

impl SoundCue {
    /// Every cue in manifest order.
    pub const ALL: [Self; 5] = [
        Self::WaveCreate,
        Self::EnemyHit,
        Self::GameOver,
        Self::PowerupCollect,
        Self::EchoBurst,
    ];

    /// Manifest key of the cue.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WaveCreate => "wave_create",
            Self::EnemyHit => "enemy_hit",
            Self::GameOver => "game_over",
            Self::PowerupCollect => "powerup_collect",
            Self::EchoBurst => "echo_burst",
        }
    }

    /// Cue that accompanies a simulation event, if any.
    #[must_use]
    pub fn for_event(event: &Event) -> Option<Self> {
        match event {
            Event::WaveStarted { .. } => Some(Self::WaveCreate),
            Event::EnemyDefeated { .. } => Some(Self::EnemyHit),
            Event::FeverActivated => Some(Self::PowerupCollect),
            Event::EnemySpawned { .. }
            | Event::WaveCleared { .. }
            | Event::ComboBroken { .. }
            | Event::FeverEnded => None,
        }
    }

    fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|cue| cue.name() == name)
            .with_context(|| format!("unknown sound cue `{name}`"))
    }
}

/// Platform hook that decodes and plays sound assets.
pub trait AudioBackend {
    /// Decoded, playable resource.
    type Handle;

    /// Loads the asset stored at `path`.
    fn load(&mut self, path: &Path) -> Result<Self::Handle>;

    /// Starts playback of a loaded resource.
    fn play(&mut self, handle: &Self::Handle);
}

/// Backend for headless runs: checks assets exist and logs playback.
#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    type Handle = PathBuf;

    fn load(&mut self, path: &Path) -> Result<PathBuf> {
        let _ = fs::metadata(path)
            .with_context(|| format!("failed to stat sound asset at {}", path.display()))?;
        Ok(path.to_path_buf())
    }

    fn play(&mut self, handle: &PathBuf) {
        debug!(path = %handle.display(), "sound played");
    }
}

/// Sound cache that degrades to logged no-ops for missing cues.
#[derive(Debug)]
pub struct SoundBank<B: AudioBackend> {
    backend: B,
    sounds: BTreeMap<SoundCue, Option<B::Handle>>,
}

impl<B: AudioBackend> SoundBank<B> {
    /// Creates a bank with no loaded cues.
    #[must_use]
    pub fn empty(backend: B) -> Self {
        Self {
            backend,
            sounds: BTreeMap::new(),
        }
    }

    /// Loads every cue listed in the manifest at `path`.
    ///
    /// A malformed manifest is an error; individual assets that fail to load
    /// are logged and left missing.
    pub fn from_manifest_path(path: impl AsRef<Path>, backend: B) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sound manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let entries = parse_manifest(&contents, &base)?;
        Ok(Self::from_entries(entries, backend))
    }

    fn from_entries(entries: Vec<(SoundCue, PathBuf)>, mut backend: B) -> Self {
        let sounds = entries
            .into_iter()
            .map(|(cue, path)| {
                let handle = match backend.load(&path) {
                    Ok(handle) => Some(handle),
                    Err(error) => {
                        warn!(cue = cue.name(), error = %format!("{error:#}"), "sound unavailable");
                        None
                    }
                };
                (cue, handle)
            })
            .collect();
        Self { backend, sounds }
    }

    /// Plays `cue`, or logs a warning when it is not loaded.
    pub fn play(&mut self, cue: SoundCue) {
        match self.sounds.get(&cue) {
            Some(Some(handle)) => self.backend.play(handle),
            _ => warn!(cue = cue.name(), "sound not loaded"),
        }
    }

    /// Reports whether `cue` is ready to play.
    #[must_use]
    pub fn is_loaded(&self, cue: SoundCue) -> bool {
        matches!(self.sounds.get(&cue), Some(Some(_)))
    }

    /// Number of cues ready to play.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.sounds.values().filter(|handle| handle.is_some()).count()
    }

    /// Backend driving playback.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sounds: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SoundCue, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sound manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sound manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut entries = manifest
        .sounds
        .into_iter()
        .map(|(name, relative_path)| Ok((SoundCue::parse(&name)?, base_path.join(relative_path))))
        .collect::<Result<Vec<_>>>()?;
    entries.sort_by_key(|(cue, _)| *cue);
    Ok(entries)
}
