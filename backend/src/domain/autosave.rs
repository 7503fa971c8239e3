use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use shared::BoardPatch;

use super::board_service::BoardService;
use crate::error::Result;

/// Quiet period after the last edit before an auto-save fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(5);

/// Per-board save slot. At most one save per board is ever in flight;
/// edits arriving mid-flight coalesce into `pending` and trigger exactly
/// one follow-up save when the running one completes.
#[derive(Default)]
struct SaveSlot {
    pending: Option<BoardPatch>,
    timer: Option<JoinHandle<()>>,
    in_flight: bool,
}

/// Debounced auto-save for board edits: a single-flight, latest-write-wins
/// scheduler keyed by board id.
#[derive(Clone)]
pub struct AutoSaveScheduler {
    boards: BoardService,
    quiet_period: Duration,
    slots: Arc<Mutex<HashMap<String, SaveSlot>>>,
}

impl AutoSaveScheduler {
    pub fn new(boards: BoardService) -> Self {
        Self::with_quiet_period(boards, DEFAULT_QUIET_PERIOD)
    }

    /// Scheduler with an explicit quiet period (tests use short ones).
    pub fn with_quiet_period(boards: BoardService, quiet_period: Duration) -> Self {
        Self {
            boards,
            quiet_period,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Coalesce an edit into the board's pending patch and restart the
    /// quiet-period timer. While a save is in flight no timer is armed; the
    /// completing save schedules the follow-up itself.
    pub fn record_edit(&self, board_id: &str, patch: BoardPatch) {
        let mut slots = self.slots.lock().unwrap();
        let slot = slots.entry(board_id.to_string()).or_default();

        match slot.pending.as_mut() {
            Some(pending) => pending.merge(patch),
            None => slot.pending = Some(patch),
        }

        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        if slot.in_flight {
            debug!("Edit for board {} queued behind in-flight save", board_id);
            return;
        }

        let scheduler = self.clone();
        let id = board_id.to_string();
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(scheduler.quiet_period).await;
            scheduler.flush(&id).await;
        }));
    }

    /// Save the pending edits immediately (explicit save action).
    pub async fn save_now(&self, board_id: &str) -> Result<()> {
        self.try_flush(board_id).await
    }

    /// Whether the board still has unsaved edits.
    pub fn has_pending(&self, board_id: &str) -> bool {
        let slots = self.slots.lock().unwrap();
        slots
            .get(board_id)
            .is_some_and(|slot| slot.pending.is_some() || slot.in_flight)
    }

    fn flush<'a>(
        &'a self,
        board_id: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'a>> {
        // Boxed to give the recursive `spawn(flush(..))` in `try_flush` a
        // concrete `Send` future type; without it the Send auto-trait check
        // cycles through the spawn and cannot be resolved.
        Box::pin(async move {
            if let Err(e) = self.try_flush(board_id).await {
                // Non-fatal: the next edit or explicit save starts a new cycle
                error!("Auto-save failed for board {}: {}", board_id, e);
            }
        })
    }

    async fn try_flush(&self, board_id: &str) -> Result<()> {
        let patch = {
            let mut slots = self.slots.lock().unwrap();
            let slot = match slots.get_mut(board_id) {
                Some(slot) => slot,
                None => return Ok(()),
            };

            if let Some(timer) = slot.timer.take() {
                timer.abort();
            }
            if slot.in_flight {
                // The running save picks up the pending patch when it ends
                return Ok(());
            }

            match slot.pending.take() {
                Some(patch) => {
                    slot.in_flight = true;
                    patch
                }
                None => return Ok(()),
            }
        };

        info!("Saving board {}", board_id);
        let result = self.boards.update_board_details(board_id, patch).await;

        let rerun = {
            let mut slots = self.slots.lock().unwrap();
            match slots.get_mut(board_id) {
                Some(slot) => {
                    slot.in_flight = false;
                    slot.pending.is_some()
                }
                None => false,
            }
        };

        if rerun {
            // Edits landed while saving; run exactly one follow-up save
            let scheduler = self.clone();
            let id = board_id.to_string();
            tokio::spawn(async move {
                scheduler.flush(&id).await;
            });
        }

        result
    }
}
