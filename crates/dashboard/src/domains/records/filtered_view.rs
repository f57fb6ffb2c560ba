use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::{HistoricalRecord, RecordPage};
use crate::normalize_term;

/// Rows currently visible in the records table.
pub type VisibleRecords = Arc<Vec<HistoricalRecord>>;

/// Keep the records matching a search term.
///
/// Empty (after trimming) matches everything. Otherwise a record matches when the
/// lowercased term occurs in the driver name, station name or plate, or verbatim in the
/// driver's CPF.
pub fn filter_records(records: &[HistoricalRecord], term: &str) -> Vec<HistoricalRecord> {
    let needle = normalize_term(term);
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| matches_term(record, &needle))
        .cloned()
        .collect()
}

fn matches_term(record: &HistoricalRecord, needle: &str) -> bool {
    record.motorista_nome.to_lowercase().contains(needle)
        || record.posto_nome.to_lowercase().contains(needle)
        || record.veiculo_placa.to_lowercase().contains(needle)
        || record.motorista_cpf.contains(needle)
}

/// Combine-latest join of the record page and the committed search term.
///
/// Whichever side changes, the output is recomputed with the other side's last value.
/// The task stops when `cancel` fires, either input closes, or every output receiver
/// is gone. Must be called inside a tokio runtime.
pub fn spawn_filtered_view(
    mut records: watch::Receiver<RecordPage>,
    mut terms: watch::Receiver<String>,
    cancel: CancellationToken,
) -> watch::Receiver<VisibleRecords> {
    let initial = filter_records(&records.borrow_and_update(), &terms.borrow_and_update());
    let (sender, receiver) = watch::channel(Arc::new(initial));

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = records.changed() => if changed.is_err() { break },
                changed = terms.changed() => if changed.is_err() { break },
            }

            let visible =
                filter_records(&records.borrow_and_update(), &terms.borrow_and_update());
            if sender.send(Arc::new(visible)).is_err() {
                break;
            }
        }
    });

    receiver
}
