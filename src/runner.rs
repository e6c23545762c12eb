use std::io::Write;

use crate::accumulator::{Disposition, NoteAccumulator};
use crate::config::Config;
use crate::recorder::{unix_millis, LedgerRecorder};
use crate::rpc::{NoteFilter, WalletApi};
use crate::submitter::BatchSubmitter;

#[derive(Clone, Copy, Debug, Default)]
pub struct RunStats {
    pub processed: u64,
    pub submitted_batches: u64,
    pub submitted_notes: u64,
}

/// Drives the whole run: pages notes out of the wallet, feeds them through
/// the accumulator and submits the batch at every trigger boundary until the
/// target count of considered notes is reached. Any failure aborts the run;
/// ledger rows written so far stay valid.
pub async fn run<W: WalletApi, O: Write>(
    rpc: &W,
    config: &Config,
    recorder: &mut LedgerRecorder<O>,
) -> anyhow::Result<RunStats> {
    recorder.write_header()?;

    // consolidation sends the combined value back to the account itself
    let destination = rpc.get_account_public_key(&config.account).await?;
    let submitter = BatchSubmitter::new(
        rpc,
        config.account.clone(),
        destination,
        config.fee,
        config.expiration_delta,
    );

    let filter = NoteFilter::native_unspent();
    let mut accumulator = NoteAccumulator::new(config.max_note_value, config.batch_trigger);
    let mut stats = RunStats::default();

    while accumulator.processed() < config.target_notes {
        let page = rpc
            .get_notes(&config.account, config.page_size, &filter)
            .await?;
        if page.is_empty() {
            tracing::warn!(
                "note source returned an empty page, stopping after {} notes",
                accumulator.processed()
            );
            break;
        }

        let processed_before_page = accumulator.processed();
        for note in page.iter() {
            if accumulator.consider(note) == Disposition::Duplicate {
                continue;
            }
            if accumulator.at_trigger() {
                let batch = accumulator.take_batch();
                if batch.is_empty() {
                    tracing::warn!(
                        "every note since the last submission was filtered out, nothing to submit"
                    );
                    continue;
                }
                let result = submitter.submit(&batch).await?;
                recorder.append_row(unix_millis()?, &result.hash, result.note_count)?;
                stats.submitted_batches += 1;
                stats.submitted_notes += result.note_count as u64;
            }
        }

        if accumulator.processed() == processed_before_page {
            // the whole page was already consumed earlier in the run
            tracing::warn!(
                "note source repeated an already-consumed page, stopping after {} notes",
                accumulator.processed()
            );
            break;
        }
        tracing::info!("Processed {} notes", accumulator.processed());
    }

    stats.processed = accumulator.processed();
    Ok(stats)
}
