//! Observer side of the controller: views render whatever state the
//! controller currently holds and never mutate it.

use std::sync::Arc;

use shared::domain::ButtonAppearance;
use tokio::task::JoinHandle;

use crate::controller::TriggerController;

pub trait ButtonView: Send + Sync + 'static {
    fn render(&self, appearance: &ButtonAppearance);
}

impl<V: ButtonView> ButtonView for Arc<V> {
    fn render(&self, appearance: &ButtonAppearance) {
        (**self).render(appearance);
    }
}

/// Renders the current appearance right away, then once per observed change.
/// Changes that land between two polls are coalesced into the latest one.
pub fn spawn_view<V: ButtonView>(controller: &TriggerController, view: V) -> JoinHandle<()> {
    let mut state = controller.subscribe_state();
    tokio::spawn(async move {
        loop {
            let current = *state.borrow_and_update();
            view.render(&current.appearance());
            if state.changed().await.is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
