use crate::activity::{self, ActivityLog, Entry};
use crate::calendar::CalendarView;
use crate::storage::{KeyValueStore, Persister, load_log};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Everything the page needs: the current log snapshot and the month on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarState {
    pub log: ActivityLog,
    pub view: CalendarView,
}

/// Owns the one live [`CalendarState`]. Log transitions go through the pure
/// functions in [`crate::activity`]; every accepted change is handed to the
/// background writer.
#[derive(Clone)]
pub struct AppState {
    calendar: Arc<Mutex<CalendarState>>,
    persister: Persister,
}

impl AppState {
    pub fn new(log: ActivityLog, view: CalendarView, persister: Persister) -> Self {
        Self {
            calendar: Arc::new(Mutex::new(CalendarState { log, view })),
            persister,
        }
    }

    /// Loads the saved log from `store` and starts the writer for it.
    pub fn open(store: Arc<dyn KeyValueStore>, view: CalendarView) -> Self {
        let log = load_log(store.as_ref());
        info!(entries = log.entry_count(), "activity log loaded");
        Self::new(log, view, Persister::spawn(store))
    }

    pub async fn snapshot(&self) -> CalendarState {
        self.calendar.lock().await.clone()
    }

    pub async fn save_day(&self, date_key: &str, entry: Entry) -> ActivityLog {
        self.transition(|log| activity::save_day(log, date_key, entry))
            .await
    }

    pub async fn clear_day(&self, date_key: &str) -> ActivityLog {
        self.transition(|log| activity::clear_day(log, date_key))
            .await
    }

    pub async fn show(&self, view: CalendarView) -> CalendarView {
        let mut calendar = self.calendar.lock().await;
        calendar.view = view;
        view
    }

    pub async fn show_prev(&self) -> CalendarView {
        let mut calendar = self.calendar.lock().await;
        calendar.view = calendar.view.prev_month();
        calendar.view
    }

    pub async fn show_next(&self) -> CalendarView {
        let mut calendar = self.calendar.lock().await;
        calendar.view = calendar.view.next_month();
        calendar.view
    }

    /// Writes the current log now and reports whether the write succeeded.
    pub async fn manual_save(&self) -> bool {
        let log = self.calendar.lock().await.log.clone();
        self.persister.flush(&log).await
    }

    async fn transition(&self, step: impl FnOnce(&ActivityLog) -> ActivityLog) -> ActivityLog {
        let mut calendar = self.calendar.lock().await;
        let next = step(&calendar.log);
        if next == calendar.log {
            debug!("activity log unchanged; nothing to persist");
            return next;
        }

        // Scheduled under the lock so writes keep mutation order.
        self.persister.schedule(&next);
        calendar.log = next.clone();
        next
    }
}
