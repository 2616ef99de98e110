use std::time::SystemTime;

use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use super::{reduce, Action, AppState};

/// Cloneable handle for sending actions to a [`StateStore`] from any task.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<Action>,
}

impl Dispatcher {
    /// Queue an action. If the store is gone the action is dropped.
    pub fn dispatch(&self, action: Action) {
        let kind = action.kind();
        if self.tx.send(action).is_err() {
            debug!(action = kind, "State store dropped, discarding action");
        }
    }

    /// Whether the store on the other end has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owner of the application state.
///
/// Exactly one task holds the store and applies actions; everyone else
/// sends through a [`Dispatcher`] and observes through [`subscribe`](Self::subscribe).
pub struct StateStore {
    state: AppState,
    tx: mpsc::UnboundedSender<Action>,
    inbox: mpsc::UnboundedReceiver<Action>,
    observers: watch::Sender<AppState>,
}

impl StateStore {
    pub fn new(initial: AppState) -> Self {
        let (tx, inbox) = mpsc::unbounded_channel();
        let (observers, _) = watch::channel(initial.clone());
        Self {
            state: initial,
            tx,
            inbox,
            observers,
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Receive every state published from now on.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.observers.subscribe()
    }

    /// Apply one action immediately and publish the result.
    pub fn dispatch(&mut self, action: Action) -> &AppState {
        self.apply(action);
        self.publish();
        &self.state
    }

    /// Apply every queued action in arrival order, publishing once at the
    /// end. Returns the number of actions applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.inbox.try_recv() {
            self.apply(action);
            applied += 1;
        }
        if applied > 0 {
            self.publish();
        }
        applied
    }

    /// Wait for the next queued action, apply it and publish.
    pub async fn next(&mut self) -> &AppState {
        // The store keeps a sender of its own, so the inbox never closes.
        if let Some(action) = self.inbox.recv().await {
            self.apply(action);
            self.publish();
        }
        &self.state
    }

    fn apply(&mut self, action: Action) {
        trace!(action = action.kind(), "Applying action");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action, SystemTime::now());
    }

    fn publish(&self) {
        self.observers.send_replace(self.state.clone());
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Status;
    use pidash_types::ReportWindow;

    #[test]
    fn test_dispatch_applies_immediately() {
        let mut store = StateStore::default();
        let state = store.dispatch(Action::SetError {
            error_msg: "nope".into(),
        });
        assert_eq!(state.status, Status::Error("nope".into()));
    }

    #[test]
    fn test_pump_applies_in_arrival_order() {
        let mut store = StateStore::default();
        let dispatcher = store.dispatcher();

        dispatcher.dispatch(Action::ClickedDays {
            clicked_days: ReportWindow::SevenDays,
        });
        dispatcher.dispatch(Action::ClickedDays {
            clicked_days: ReportWindow::ThreeDays,
        });
        assert_eq!(store.state().clicked_days, ReportWindow::OneDay);

        assert_eq!(store.pump(), 2);
        assert_eq!(store.state().clicked_days, ReportWindow::ThreeDays);
        assert_eq!(store.pump(), 0);
    }

    #[test]
    fn test_subscribers_see_published_state() {
        let mut store = StateStore::default();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.dispatcher().dispatch(Action::SetLoading);
        store.dispatcher().dispatch(Action::SetError {
            error_msg: "x".into(),
        });
        store.pump();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().status, Status::Error("x".into()));
    }

    #[test]
    fn test_dispatcher_outliving_store_is_harmless() {
        let store = StateStore::default();
        let dispatcher = store.dispatcher();
        drop(store);
        assert!(dispatcher.is_closed());
        dispatcher.dispatch(Action::SetLoading);
    }

    #[tokio::test]
    async fn test_next_waits_for_remote_action() {
        let mut store = StateStore::default();
        let dispatcher = store.dispatcher();
        tokio::spawn(async move {
            dispatcher.dispatch(Action::ClickedDays {
                clicked_days: ReportWindow::FourteenDays,
            });
        });
        let state = store.next().await;
        assert_eq!(state.clicked_days, ReportWindow::FourteenDays);
    }
}
