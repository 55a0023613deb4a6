use std::sync::Weak;

use tracing::trace;

use crate::container::core::ContainerCore;
use crate::lifecycle::Owner;

/// Subscribes the container to the terminal event of `owner`.
///
/// The observer holds a weak reference, so an owner outliving the container
/// neither keeps the container alive nor fails when it terminates.
pub(super) fn bind(core: Weak<ContainerCore>, owner: &dyn Owner) {
    let id = owner.owner_id();
    trace!(owner = %id, "subscribing to owner termination");
    owner.on_terminate(Box::new(move || {
        if let Some(core) = core.upgrade() {
            core.terminate(id);
        } else {
            trace!(owner = %id, "owner terminated after its container");
        }
    }));
}
