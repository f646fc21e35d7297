//! Forwards navigator and event-bus traffic into the action channel.
//!
//! Controllers navigate and publish from background tasks; the bridge
//! turns both streams into [`Action`]s so the app loop stays the single
//! place where screens change.

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use mockctl_core::Admin;

use crate::action::Action;

/// Run until cancelled or until the action channel closes.
///
/// The current route is sent first so the initial screen activates
/// without waiting for a change.
pub async fn run_bridge(
    admin: Admin,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut routes = admin.navigator().subscribe();
    let mut bus = admin.bus().subscribe();

    let initial = routes.borrow_and_update().clone();
    if action_tx.send(Action::RouteChanged(initial)).is_err() {
        return;
    }

    loop {
        let action = tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = routes.changed() => {
                if changed.is_err() {
                    break;
                }
                let route = routes.borrow_and_update().clone();
                debug!(%route, "route changed");
                Action::RouteChanged(route)
            }

            message = bus.recv() => match message {
                Ok(message) => Action::Bus(message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "bus receiver lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        };

        if action_tx.send(action).is_err() {
            break;
        }
    }
}
