use std::sync::Arc;

use crate::model::snapshot::Snapshot;

#[derive(Debug, Clone)]
pub enum AppEvent {
    SnapshotLoaded(Arc<Snapshot>),
    SnapshotFailed(String),
}
