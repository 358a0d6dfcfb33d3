use super::*;
use crate::error::Error;
use crate::error::Result;
use std::path::Path;
use std::path::PathBuf;

/// File-backed store of recent snapshots.
///
/// Each snapshot lives in `save-{id}.json`; `index.json` lists ids newest
/// first and is written last, so a save only counts once all of it is on disk.
/// At most [`crate::MAX_SAVES`] are kept.
#[derive(Debug, Clone)]
pub struct Saves {
    root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Entry {
    pub id: String,
    pub saved_at: u64,
}

impl Saves {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Newest first.
    pub fn list(&self) -> Result<Vec<Entry>> {
        match std::fs::read_to_string(self.index()) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        Self::check(&snapshot.id)?;
        let mut entries = self.list()?;
        entries.retain(|e| e.id != snapshot.id);
        while entries.len() >= crate::MAX_SAVES {
            if let Some(evicted) = entries.pop() {
                log::debug!("[saves] evicting {}", evicted.id);
                self.remove(&evicted.id)?;
            }
        }
        std::fs::write(self.path(&snapshot.id), snapshot.to_json()?)?;
        entries.insert(
            0,
            Entry {
                id: snapshot.id.clone(),
                saved_at: snapshot.saved_at,
            },
        );
        std::fs::write(self.index(), serde_json::to_string(&entries)?)?;
        log::info!("[saves] saved {} at move {}", snapshot.id, snapshot.move_number);
        Ok(())
    }

    pub fn load(&self, id: &str) -> Result<Option<Snapshot>> {
        Self::check(id)?;
        match std::fs::read_to_string(self.path(id)) {
            Ok(json) => Snapshot::from_json(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Newest fresh save whose id the peer also holds.
    pub fn find_matching(&self, peer: &[String]) -> Result<Option<String>> {
        self.find_matching_at(peer, now())
    }

    pub fn find_matching_at(&self, peer: &[String], now: u64) -> Result<Option<String>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|e| now.saturating_sub(e.saved_at) <= crate::STALE_SAVE_SECS)
            .find(|e| peer.contains(&e.id))
            .map(|e| e.id))
    }

    /// Forget every save, as when starting a fresh session.
    pub fn clear(&self) -> Result<()> {
        self.list()?
            .iter()
            .try_for_each(|e| self.remove(&e.id))?;
        match std::fs::remove_file(self.index()) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl Saves {
    fn index(&self) -> PathBuf {
        self.root.join("index.json")
    }
    fn path(&self, id: &str) -> PathBuf {
        self.root.join(format!("save-{}.json", id))
    }
    fn remove(&self, id: &str) -> Result<()> {
        match std::fs::remove_file(self.path(id)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
    /// ids become file names
    fn check(id: &str) -> Result<()> {
        match !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            true => Ok(()),
            false => Err(Error::Save(format!("invalid save id: {:?}", id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: &str, saved_at: u64) -> Snapshot {
        Snapshot {
            id: id.to_string(),
            saved_at,
            engine: format!("blob-{}", id),
            unique_id: "me".to_string(),
            i_started: true,
            amount: 100,
            move_number: 1,
            my_turn: false,
            card_selections: Default::default(),
            handshake_done: true,
            player_hand: Vec::new(),
            opponent_hand: Vec::new(),
            game_ids: Vec::new(),
            result: None,
        }
    }

    #[test]
    fn round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let saves = Saves::open(dir.path()).unwrap();
        saves.save(&snapshot("a", 10)).unwrap();
        assert_eq!(saves.load("a").unwrap(), Some(snapshot("a", 10)));
        assert_eq!(saves.load("b").unwrap(), None);
    }

    #[test]
    fn keeps_three_newest() {
        let dir = tempfile::tempdir().unwrap();
        let saves = Saves::open(dir.path()).unwrap();
        ["a", "b", "c", "d"]
            .iter()
            .enumerate()
            .for_each(|(i, id)| saves.save(&snapshot(id, i as u64)).unwrap());
        let ids = saves.list().unwrap().into_iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["d", "c", "b"]);
        assert_eq!(saves.load("a").unwrap(), None);
        assert!(!dir.path().join("save-a.json").exists());
    }

    #[test]
    fn resave_moves_to_front() {
        let dir = tempfile::tempdir().unwrap();
        let saves = Saves::open(dir.path()).unwrap();
        saves.save(&snapshot("a", 1)).unwrap();
        saves.save(&snapshot("b", 2)).unwrap();
        saves.save(&snapshot("a", 3)).unwrap();
        let ids = saves.list().unwrap().into_iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn matches_fresh_shared_save() {
        let dir = tempfile::tempdir().unwrap();
        let saves = Saves::open(dir.path()).unwrap();
        saves.save(&snapshot("old", 0)).unwrap();
        saves.save(&snapshot("new", 5000)).unwrap();
        let peer = vec!["old".to_string(), "new".to_string()];
        assert_eq!(saves.find_matching_at(&peer, 5100).unwrap(), Some("new".into()));
        assert_eq!(saves.find_matching_at(&peer[..1], 5100).unwrap(), None);
        assert_eq!(saves.find_matching_at(&peer[..1], 3600).unwrap(), Some("old".into()));
        assert_eq!(saves.find_matching_at(&[], 5100).unwrap(), None);
    }

    #[test]
    fn clears() {
        let dir = tempfile::tempdir().unwrap();
        let saves = Saves::open(dir.path()).unwrap();
        saves.save(&snapshot("a", 1)).unwrap();
        saves.clear().unwrap();
        assert!(saves.list().unwrap().is_empty());
        assert_eq!(saves.load("a").unwrap(), None);
        saves.clear().unwrap();
    }

    #[test]
    fn rejects_path_ids() {
        let dir = tempfile::tempdir().unwrap();
        let saves = Saves::open(dir.path()).unwrap();
        assert!(matches!(saves.save(&snapshot("../x", 1)), Err(Error::Save(_))));
        assert!(matches!(saves.load(""), Err(Error::Save(_))));
    }
}
