use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use anyhow::Result;

use crate::puzzle::{Layout, PuzzleId};
use crate::store::schema::SavedProgress;

/// Why [`ProgressStore::load`] came back empty-handed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartFresh {
    NothingSaved,
    Unreadable,
    Corrupt,
    ShapeMismatch,
}

/// Per-puzzle saved progress, one JSON file per puzzle identity.
pub struct ProgressStore {
    base_dir: PathBuf,
}

impl ProgressStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn key(id: &PuzzleId) -> String {
        format!("puzzle-progress-{}-{}", id.series, id.number)
    }

    fn file_path(&self, id: &PuzzleId) -> PathBuf {
        let key: String = Self::key(id)
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(format!("{key}.json"))
    }

    fn write(&self, id: &PuzzleId, data: &SavedProgress) -> Result<()> {
        let path = self.file_path(id);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Best effort: a failed write is logged and otherwise ignored.
    pub fn save(&self, id: &PuzzleId, data: &SavedProgress) {
        if let Err(e) = self.write(id, data) {
            log::warn!("could not save progress for {id}: {e:#}");
        }
    }

    /// Saved progress for `id`, trusted only when its grid has exactly the
    /// shape of `layout` and its cursor sits on an open cell. Anything
    /// unusable is cleared.
    pub fn load(&self, id: &PuzzleId, layout: &Layout) -> Result<SavedProgress, StartFresh> {
        let path = self.file_path(id);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StartFresh::NothingSaved),
            Err(e) => {
                log::warn!("could not read saved progress for {id}: {e}");
                self.clear(id);
                return Err(StartFresh::Unreadable);
            }
        };
        let data: SavedProgress = match serde_json::from_str(&content) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("discarding corrupt progress for {id}: {e}");
                self.clear(id);
                return Err(StartFresh::Corrupt);
            }
        };
        if !data.user_grid.matches_layout(layout) {
            log::info!("saved grid for {id} does not fit the puzzle; starting fresh");
            self.clear(id);
            return Err(StartFresh::ShapeMismatch);
        }
        if data.cursor.is_some_and(|pos| layout.is_black(pos)) {
            log::info!("saved cursor for {id} is not on an open cell; starting fresh");
            self.clear(id);
            return Err(StartFresh::ShapeMismatch);
        }
        Ok(data)
    }

    /// Idempotent.
    pub fn clear(&self, id: &PuzzleId) {
        match fs::remove_file(self.file_path(id)) {
            Ok(()) => log::debug!("cleared saved progress for {id}"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("could not clear progress for {id}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::grid::UserGrid;
    use crate::puzzle::{Direction, Pos};
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, ProgressStore) {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn id() -> PuzzleId {
        PuzzleId {
            series: "cryptic".to_string(),
            number: 29001,
        }
    }

    #[test]
    fn test_key_format() {
        assert_eq!(ProgressStore::key(&id()), "puzzle-progress-cryptic-29001");
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = make_test_store();
        let layout = Layout::from_rows(&["..#", "..."]);
        let mut grid = UserGrid::new(&layout);
        grid.set_letter(Pos::new(1, 2), 'k');
        let saved = SavedProgress::new(grid, Some(Pos::new(1, 2)), Direction::Down);
        store.save(&id(), &saved);

        let loaded = store.load(&id(), &layout).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_nothing_saved() {
        let (_dir, store) = make_test_store();
        let layout = Layout::from_rows(&["..."]);
        assert_eq!(store.load(&id(), &layout), Err(StartFresh::NothingSaved));
    }

    #[test]
    fn test_dimension_mismatch_clears() {
        let (_dir, store) = make_test_store();
        let big = Layout::from_rows(&["....", "....", "...."]);
        let small = Layout::from_rows(&["...", "...", "..."]);
        store.save(&id(), &SavedProgress::new(UserGrid::new(&big), None, Direction::Across));

        assert_eq!(store.load(&id(), &small), Err(StartFresh::ShapeMismatch));
        assert!(!store.file_path(&id()).exists());
        assert_eq!(store.load(&id(), &big), Err(StartFresh::NothingSaved));
    }

    #[test]
    fn test_cursor_on_black_cell_clears() {
        let (_dir, store) = make_test_store();
        let layout = Layout::from_rows(&["..#", "..."]);
        let mut grid = UserGrid::new(&layout);
        grid.set_letter(Pos::new(1, 1), 'z');
        store.save(
            &id(),
            &SavedProgress::new(grid.clone(), Some(Pos::new(0, 2)), Direction::Across),
        );
        assert_eq!(store.load(&id(), &layout), Err(StartFresh::ShapeMismatch));
        assert!(!store.file_path(&id()).exists());

        store.save(
            &id(),
            &SavedProgress::new(grid, Some(Pos::new(4, 0)), Direction::Down),
        );
        assert_eq!(store.load(&id(), &layout), Err(StartFresh::ShapeMismatch));
        assert_eq!(store.load(&id(), &layout), Err(StartFresh::NothingSaved));
    }

    #[test]
    fn test_corrupt_file_clears() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path(&id()), "{\"userGrid\": [[").unwrap();
        let layout = Layout::from_rows(&["..."]);
        assert_eq!(store.load(&id(), &layout), Err(StartFresh::Corrupt));
        assert!(!store.file_path(&id()).exists());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_dir, store) = make_test_store();
        store.clear(&id());
        store.clear(&id());
        assert!(!store.file_path(&id()).exists());
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore {
            base_dir: dir.path().join("missing_subdir"),
        };
        let layout = Layout::from_rows(&["."]);
        store.save(&id(), &SavedProgress::new(UserGrid::new(&layout), None, Direction::Across));
        assert!(!dir.path().join("missing_subdir").exists());
    }
}
