use crate::error::ConvertError;

use super::tensor_record::TensorRecord;

/// Records produced by one converter invocation for one frame.
pub type TensorGroup = Vec<TensorRecord>;

/// Per-frame output of one `convert()` call: frame -> converter groups -> records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TensorsTable {
    frames: Vec<Vec<TensorGroup>>,
}

impl TensorsTable {
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            frames: vec![Vec::new(); batch_size],
        }
    }

    pub fn push_group(&mut self, frame_index: usize, group: TensorGroup) -> Result<(), ConvertError> {
        let batch_size = self.frames.len();
        let frame = self
            .frames
            .get_mut(frame_index)
            .ok_or(ConvertError::FrameOutOfRange { frame_index, batch_size })?;
        frame.push(group);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, frame_index: usize) -> Option<&[TensorGroup]> {
        self.frames.get(frame_index).map(Vec::as_slice)
    }

    pub fn frames(&self) -> impl Iterator<Item = &[TensorGroup]> {
        self.frames.iter().map(Vec::as_slice)
    }

    /// Every record of the table, frame by frame.
    pub fn records(&self) -> impl Iterator<Item = &TensorRecord> {
        self.frames.iter().flatten().flatten()
    }

    pub fn into_frames(self) -> Vec<Vec<TensorGroup>> {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::precision::{Layout, Precision};

    fn record(name: &str) -> TensorRecord {
        TensorRecord::new(name, Precision::U8, Layout::C, vec![1], vec![0]).unwrap()
    }

    #[test]
    fn sized_up_front() {
        let table = TensorsTable::with_batch_size(4);
        assert_eq!(table.len(), 4);
        assert!(table.frames().all(|frame| frame.is_empty()));
        assert_eq!(table.records().count(), 0);
    }

    #[test]
    fn groups_land_in_their_frame() {
        let mut table = TensorsTable::with_batch_size(2);
        table.push_group(1, vec![record("a")]).unwrap();
        table.push_group(1, vec![record("b"), record("c")]).unwrap();

        assert!(table.frame(0).unwrap().is_empty());
        let frame = table.frame(1).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame[1][1].name(), "c");
        assert_eq!(table.records().count(), 3);
    }

    #[test]
    fn push_out_of_range() {
        let mut table = TensorsTable::with_batch_size(1);
        let err = table.push_group(1, vec![record("a")]).unwrap_err();
        assert!(matches!(err, ConvertError::FrameOutOfRange { frame_index: 1, batch_size: 1 }));
    }
}
