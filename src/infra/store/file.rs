//! File-backed slot store using JSON lines.
//!
//! The whole store is loaded on open and the file is rewritten on every
//! write, which keeps it a plain, greppable snapshot of committed slots.
//! Rewrites go to a sibling temp file that is renamed over the snapshot, so
//! a failed write leaves the previous snapshot intact.

use std::fs::{create_dir_all, rename, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{clear, merge, SlotAssignment, SlotStore};
use crate::core::EngineError;
use crate::model::{ClassId, Term};

const FILE_NAME: &str = "slots.jsonl";
const TEMP_NAME: &str = "slots.jsonl.tmp";

fn store_err(e: impl std::fmt::Display) -> EngineError {
    EngineError::Store(e.to_string())
}

/// Slot store persisted as `slots.jsonl` inside a directory.
#[derive(Debug)]
pub struct FileSlotStore {
    dir: PathBuf,
    slots: Vec<SlotAssignment>,
}

impl FileSlotStore {
    /// Open the store in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// [`EngineError::Store`] when the directory cannot be created or an
    /// existing file cannot be parsed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, EngineError> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir).map_err(store_err)?;
        let mut store = Self {
            dir,
            slots: Vec::new(),
        };
        store.load_from_disk()?;
        tracing::debug!(
            "opened slot store {} with {} slots",
            store.file_path().display(),
            store.slots.len()
        );
        Ok(store)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(FILE_NAME)
    }

    fn load_from_disk(&mut self) -> Result<(), EngineError> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(());
        }
        let file = OpenOptions::new().read(true).open(&path).map_err(store_err)?;
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(store_err)?;
            if line.trim().is_empty() {
                continue;
            }
            let slot: SlotAssignment = serde_json::from_str(&line)
                .map_err(|e| store_err(format!("{}:{}: {e}", path.display(), n + 1)))?;
            self.slots.push(slot);
        }
        Ok(())
    }

    fn rewrite_disk(&self, slots: &[SlotAssignment]) -> Result<(), EngineError> {
        let temp = self.dir.join(TEMP_NAME);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp)
            .map_err(store_err)?;
        let mut out = BufWriter::new(file);
        for slot in slots {
            let line = serde_json::to_string(slot).map_err(store_err)?;
            writeln!(out, "{line}").map_err(store_err)?;
        }
        let file = out.into_inner().map_err(|e| store_err(e.error()))?;
        file.sync_all().map_err(store_err)?;
        drop(file);
        rename(&temp, self.file_path()).map_err(store_err)
    }
}

impl SlotStore for FileSlotStore {
    fn slots(&self, term: Term) -> Result<Vec<SlotAssignment>, EngineError> {
        Ok(self.slots.iter().filter(|s| s.term == term).cloned().collect())
    }

    fn upsert_all(&mut self, slots: &[SlotAssignment]) -> Result<(), EngineError> {
        let mut next = self.slots.clone();
        merge(&mut next, slots);
        self.rewrite_disk(&next)?;
        self.slots = next;
        Ok(())
    }

    fn replace_classes(
        &mut self,
        term: Term,
        classes: &[ClassId],
        slots: &[SlotAssignment],
    ) -> Result<(), EngineError> {
        let mut next = self.slots.clone();
        clear(&mut next, term, classes);
        merge(&mut next, slots);
        self.rewrite_disk(&next)?;
        self.slots = next;
        Ok(())
    }
}
