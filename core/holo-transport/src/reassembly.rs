use crate::error::Result;
use holo_container::chunk_file_name;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

struct ChunkReasm {
    seg_count: u16,
    slots: Vec<Option<Vec<u8>>>,
    written: bool,
}

impl ChunkReasm {
    fn new(seg_count: u16) -> Self {
        Self {
            seg_count,
            slots: vec![None; seg_count as usize],
            written: false,
        }
    }

    /// Stores `payload` at `seg_index`. Duplicate arrivals are a no-op when
    /// the bytes match; a mismatch is logged and the existing slot kept,
    /// per spec.md §4.7.
    fn insert(&mut self, seg_index: u16, payload: Vec<u8>) {
        let idx = seg_index as usize;
        if idx >= self.slots.len() {
            log::warn!("segment index {seg_index} out of range for seg_count {}", self.seg_count);
            return;
        }
        match &self.slots[idx] {
            Some(existing) if *existing == payload => {}
            Some(existing) if *existing != payload => {
                log::warn!("segment {seg_index} re-received with different bytes; keeping original");
            }
            _ => self.slots[idx] = Some(payload),
        }
    }

    fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    fn concat(&self) -> Vec<u8> {
        self.slots.iter().flatten().flat_map(|s| s.iter().copied()).collect()
    }
}

/// Per-`transfer_id` receive state: one META plus a stream of DATA segments
/// reassembling into chunk files under `dir_path`.
pub struct TransferState {
    pub transfer_id: u32,
    pub chunk_total: u32,
    pub name: Option<String>,
    pub dir_path: PathBuf,
    chunks: std::collections::HashMap<u32, ChunkReasm>,
    completed: std::collections::HashSet<u32>,
    pub last_activity: Instant,
}

impl TransferState {
    pub fn new(transfer_id: u32, chunk_total: u32, dir_path: PathBuf) -> Self {
        Self {
            transfer_id,
            chunk_total,
            name: None,
            dir_path,
            chunks: std::collections::HashMap::new(),
            completed: std::collections::HashSet::new(),
            last_activity: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Renames the working directory from `transfer_<id>.holo` to
    /// `<name>.holo` on the first META packet carrying a name.
    pub fn set_name(&mut self, name: String, base_dir: &std::path::Path) -> Result<()> {
        if self.name.is_some() {
            return Ok(());
        }
        let new_dir = base_dir.join(holo_container::holo_dir_name(&name));
        if self.dir_path.exists() {
            fs::rename(&self.dir_path, &new_dir)?;
        }
        self.dir_path = new_dir;
        self.name = Some(name);
        Ok(())
    }

    pub fn completed_chunk_count(&self) -> u32 {
        self.completed.len() as u32
    }

    /// Applies one DATA segment. Packets whose `(seg_count, chunk_total)`
    /// disagree with this transfer are dropped; a chunk already completed
    /// is discarded silently.
    pub fn on_data(
        &mut self,
        chunk_total: u32,
        chunk_index: u32,
        seg_index: u16,
        seg_count: u16,
        payload: Vec<u8>,
    ) -> Result<()> {
        if chunk_total != self.chunk_total {
            log::warn!(
                "dropping DATA for transfer {}: chunk_total {chunk_total} disagrees with {}",
                self.transfer_id,
                self.chunk_total
            );
            return Ok(());
        }
        if self.completed.contains(&chunk_index) {
            return Ok(());
        }

        let reasm = self.chunks.entry(chunk_index).or_insert_with(|| ChunkReasm::new(seg_count));
        if reasm.seg_count != seg_count {
            log::warn!(
                "dropping DATA for transfer {} chunk {chunk_index}: seg_count {seg_count} disagrees with {}",
                self.transfer_id,
                reasm.seg_count
            );
            return Ok(());
        }
        reasm.insert(seg_index, payload);

        if reasm.is_complete() && !reasm.written {
            let bytes = reasm.concat();
            fs::create_dir_all(&self.dir_path)?;
            let final_name = chunk_file_name(chunk_index, self.chunk_total);
            let tmp_name = format!(".{final_name}.tmp");
            let tmp_path = self.dir_path.join(&tmp_name);
            let final_path = self.dir_path.join(&final_name);
            fs::write(&tmp_path, &bytes)?;
            fs::rename(&tmp_path, &final_path)?;
            reasm.written = true;
            self.completed.insert(chunk_index);
            self.chunks.remove(&chunk_index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_segment_with_matching_bytes_is_a_no_op() {
        let mut reasm = ChunkReasm::new(2);
        reasm.insert(0, vec![1, 2]);
        reasm.insert(0, vec![1, 2]);
        assert_eq!(reasm.slots[0], Some(vec![1, 2]));
    }

    #[test]
    fn conflicting_segment_keeps_original() {
        let mut reasm = ChunkReasm::new(2);
        reasm.insert(0, vec![1, 2]);
        reasm.insert(0, vec![9, 9]);
        assert_eq!(reasm.slots[0], Some(vec![1, 2]));
    }

    #[test]
    fn completion_requires_every_slot() {
        let mut reasm = ChunkReasm::new(2);
        assert!(!reasm.is_complete());
        reasm.insert(0, vec![1]);
        assert!(!reasm.is_complete());
        reasm.insert(1, vec![2]);
        assert!(reasm.is_complete());
        assert_eq!(reasm.concat(), vec![1, 2]);
    }

    #[test]
    fn chunk_becomes_complete_and_file_appears_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let mut transfer = TransferState::new(1, 4, tmp.path().join("transfer_1.holo"));
        transfer.on_data(4, 0, 0, 2, b"ab".to_vec()).unwrap();
        assert_eq!(transfer.completed_chunk_count(), 0);
        transfer.on_data(4, 0, 1, 2, b"cd".to_vec()).unwrap();
        assert_eq!(transfer.completed_chunk_count(), 1);
        let written = fs::read(transfer.dir_path.join(chunk_file_name(0, 4))).unwrap();
        assert_eq!(written, b"abcd");
    }

    #[test]
    fn already_completed_chunk_is_discarded_silently() {
        let tmp = tempfile::tempdir().unwrap();
        let mut transfer = TransferState::new(2, 1, tmp.path().join("transfer_2.holo"));
        transfer.on_data(1, 0, 0, 1, b"x".to_vec()).unwrap();
        assert_eq!(transfer.completed_chunk_count(), 1);
        // Replaying the same segment again must not error or change state.
        transfer.on_data(1, 0, 0, 1, b"x".to_vec()).unwrap();
        assert_eq!(transfer.completed_chunk_count(), 1);
    }

    #[test]
    fn mismatched_seg_count_for_same_chunk_is_dropped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut transfer = TransferState::new(3, 1, tmp.path().join("transfer_3.holo"));
        transfer.on_data(1, 0, 0, 2, b"a".to_vec()).unwrap();
        transfer.on_data(1, 0, 0, 3, b"a".to_vec()).unwrap();
        assert_eq!(transfer.completed_chunk_count(), 0);
    }
}
