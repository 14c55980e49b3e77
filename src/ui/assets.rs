/// Sprite loading.
///
/// Four text sprites: background, player, keeper, ball. Each is a plain
/// text file, one row per line; spaces are transparent.
///
/// Loading reports one `Loaded` or `Failed` event per sprite, then a
/// single `Ready` if (and only if) every sprite loaded. A failed sprite is
/// simply absent from the store and the renderer skips it.
///
/// Sources:
///   - `DirSource`      : `<sprites_dir>/<kind>.txt` on disk
///   - `EmbeddedSource` : copies compiled into the binary, used when no
///                        sprite directory exists

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AssetKind {
    Background,
    Player,
    Keeper,
    Ball,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Background,
        AssetKind::Player,
        AssetKind::Keeper,
        AssetKind::Ball,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AssetKind::Background => "background",
            AssetKind::Player => "player",
            AssetKind::Keeper => "keeper",
            AssetKind::Ball => "ball",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sprite has zero width or height")]
    Empty,
}

/// A character grid. Rows are padded to a common width.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
    width: usize,
}

impl Sprite {
    /// Parse sprite text. Trailing blank lines are ignored.
    pub fn parse(text: &str) -> Result<Sprite, AssetError> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|l| l.trim_end_matches('\r').chars().collect())
            .collect();
        while rows.last().map_or(false, |r| r.iter().all(|c| *c == ' ')) {
            rows.pop();
        }

        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        if width == 0 || rows.is_empty() {
            return Err(AssetError::Empty);
        }
        for r in &mut rows {
            r.resize(width, ' ');
        }
        Ok(Sprite { rows, width })
    }

    pub fn height(&self) -> usize { self.rows.len() }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> char {
        self.rows[y % self.rows.len()][x % self.width]
    }

    /// Nearest-neighbour sample for drawing into a `w`×`h` cell box.
    pub fn sample(&self, x: usize, y: usize, w: usize, h: usize) -> char {
        let sx = x * self.width / w.max(1);
        let sy = y * self.height() / h.max(1);
        self.at(sx.min(self.width - 1), sy.min(self.height() - 1))
    }
}

/// Where sprite text comes from.
pub trait SpriteSource {
    fn describe(&self) -> String;
    fn fetch(&self, kind: AssetKind) -> Result<String, AssetError>;
}

pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: &Path) -> Self {
        DirSource { dir: dir.to_path_buf() }
    }
}

impl SpriteSource for DirSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    fn fetch(&self, kind: AssetKind) -> Result<String, AssetError> {
        let path = self.dir.join(format!("{}.txt", kind.name()));
        std::fs::read_to_string(&path).map_err(|source| AssetError::Io { path, source })
    }
}

pub struct EmbeddedSource;

impl SpriteSource for EmbeddedSource {
    fn describe(&self) -> String {
        "built-in sprites".into()
    }

    fn fetch(&self, kind: AssetKind) -> Result<String, AssetError> {
        let text = match kind {
            AssetKind::Background => include_str!("../../sprites/background.txt"),
            AssetKind::Player => include_str!("../../sprites/player.txt"),
            AssetKind::Keeper => include_str!("../../sprites/keeper.txt"),
            AssetKind::Ball => include_str!("../../sprites/ball.txt"),
        };
        Ok(text.to_string())
    }
}

#[derive(Debug)]
pub enum AssetEvent {
    Loaded(AssetKind),
    Failed { kind: AssetKind, error: AssetError },
    /// Every sprite loaded. Emitted at most once per load.
    Ready,
}

#[derive(Debug, Default)]
pub struct AssetStore {
    sprites: [Option<Sprite>; 4],
}

impl AssetStore {
    /// Load every sprite from `source`.
    pub fn load(source: &dyn SpriteSource) -> (AssetStore, Vec<AssetEvent>) {
        let mut store = AssetStore::default();
        let mut events = Vec::with_capacity(AssetKind::ALL.len() + 1);

        for kind in AssetKind::ALL {
            match source.fetch(kind).and_then(|text| Sprite::parse(&text)) {
                Ok(sprite) => {
                    store.sprites[kind.index()] = Some(sprite);
                    events.push(AssetEvent::Loaded(kind));
                }
                Err(error) => events.push(AssetEvent::Failed { kind, error }),
            }
        }

        if store.all_loaded() {
            events.push(AssetEvent::Ready);
        }
        (store, events)
    }

    /// The sprite, if it loaded.
    pub fn get(&self, kind: AssetKind) -> Option<&Sprite> {
        self.sprites[kind.index()].as_ref()
    }

    pub fn all_loaded(&self) -> bool {
        self.sprites.iter().all(|s| s.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory source: missing kinds fail like a missing file.
    struct MapSource(HashMap<AssetKind, &'static str>);

    impl SpriteSource for MapSource {
        fn describe(&self) -> String { "memory".into() }

        fn fetch(&self, kind: AssetKind) -> Result<String, AssetError> {
            self.0.get(&kind).map(|s| s.to_string()).ok_or_else(|| AssetError::Io {
                path: PathBuf::from(kind.name()),
                source: io::Error::new(io::ErrorKind::NotFound, "missing"),
            })
        }
    }

    fn full() -> HashMap<AssetKind, &'static str> {
        let mut m = HashMap::new();
        m.insert(AssetKind::Background, ". ,");
        m.insert(AssetKind::Player, " o \n/|\\");
        m.insert(AssetKind::Keeper, "\\O/");
        m.insert(AssetKind::Ball, "()");
        m
    }

    #[test]
    fn parse_pads_rows() {
        let s = Sprite::parse(" o\n/|\\\n\n").unwrap();
        assert_eq!(s.width, 3);
        assert_eq!(s.height(), 2);
        assert_eq!(s.at(2, 0), ' ');
        assert_eq!(s.at(1, 1), '|');
    }

    #[test]
    fn blank_sprite_is_empty() {
        assert!(matches!(Sprite::parse(""), Err(AssetError::Empty)));
        assert!(matches!(Sprite::parse("   \n  \n"), Err(AssetError::Empty)));
    }

    #[test]
    fn sample_stretches_and_shrinks() {
        let s = Sprite::parse("ab\ncd").unwrap();
        // 4x2 box: each source column doubled
        assert_eq!(s.sample(0, 0, 4, 2), 'a');
        assert_eq!(s.sample(1, 0, 4, 2), 'a');
        assert_eq!(s.sample(2, 1, 4, 2), 'd');
        // 1x1 box: top-left
        assert_eq!(s.sample(0, 0, 1, 1), 'a');
    }

    #[test]
    fn ready_when_all_load() {
        let (store, events) = AssetStore::load(&MapSource(full()));
        assert!(store.all_loaded());
        assert_eq!(events.len(), 5);
        assert!(matches!(events.last(), Some(AssetEvent::Ready)));
        assert_eq!(events.iter().filter(|e| matches!(e, AssetEvent::Ready)).count(), 1);
    }

    #[test]
    fn failures_reported_per_asset_and_no_ready() {
        let mut m = full();
        m.remove(&AssetKind::Keeper);
        m.insert(AssetKind::Ball, "  \n");
        let (store, events) = AssetStore::load(&MapSource(m));

        assert!(store.get(AssetKind::Player).is_some());
        assert!(store.get(AssetKind::Keeper).is_none());
        assert!(store.get(AssetKind::Ball).is_none());
        assert!(!store.all_loaded());

        let failed: Vec<AssetKind> = events.iter().filter_map(|e| match e {
            AssetEvent::Failed { kind, .. } => Some(*kind),
            _ => None,
        }).collect();
        assert_eq!(failed, vec![AssetKind::Keeper, AssetKind::Ball]);
        assert!(!events.iter().any(|e| matches!(e, AssetEvent::Ready)));
    }

    #[test]
    fn embedded_sprites_all_load() {
        let (store, _) = AssetStore::load(&EmbeddedSource);
        assert!(store.all_loaded());
    }

    #[test]
    fn missing_dir_fails_every_asset() {
        let src = DirSource::new(Path::new("/nonexistent-penalty-sprites"));
        let (store, events) = AssetStore::load(&src);
        assert!(store.get(AssetKind::Background).is_none());
        assert_eq!(events.iter().filter(|e| matches!(e, AssetEvent::Failed { .. })).count(), 4);
    }
}
