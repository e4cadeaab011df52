//! Snapshot persistence

pub mod sink;
pub mod snapshot;

pub use sink::{FileSnapshotSink, MemorySnapshotSink, NullSnapshotSink, SnapshotSink};
pub use snapshot::{
    load_grid, save_grid, snapshot_len, CellRecord, RecordError, SnapshotError, SnapshotNaming,
    RECORD_SIZE,
};
