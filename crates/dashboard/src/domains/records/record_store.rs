use std::sync::Arc;
use tokio::sync::watch;

use super::{HistoricalRecord, RecordPage};

/// Latest fetched record page, shared with any number of observers.
///
/// Single writer (the data gateway), many readers. Subscribers see the current page
/// immediately and every wholesale replacement after that.
#[derive(Clone)]
pub struct RecordStore {
    sender: Arc<watch::Sender<RecordPage>>,
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(RecordPage::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Replace the current page in full.
    pub fn replace(&self, records: Vec<HistoricalRecord>) -> RecordPage {
        let page: RecordPage = Arc::new(records);
        self.sender.send_replace(Arc::clone(&page));
        page
    }

    pub fn current(&self) -> RecordPage {
        Arc::clone(&self.sender.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<RecordPage> {
        self.sender.subscribe()
    }
}
