use tracing::{info, warn};

use crate::clients::twilio::SmsClient;
use crate::db::{Store, StoreError};
use crate::models::NewWorkOrder;

/// Creation with the best-effort alert side channel.
///
/// The repository insert commits first; only then is the notification
/// attempted, and a failed (or unconfigured) send can never abort or roll
/// back the create.
pub struct WorkOrderService {
    store: Store,
    notifier: Option<SmsClient>,
}

impl WorkOrderService {
    #[must_use]
    pub const fn new(store: Store, notifier: Option<SmsClient>) -> Self {
        Self { store, notifier }
    }

    pub async fn create(&self, new: &NewWorkOrder) -> Result<i64, StoreError> {
        let id = self.store.add_work_order(new).await?;
        info!("Created work order #{id} for machine {}", new.machine_id);

        if let Some(notifier) = &self.notifier {
            let message = format!(
                "New work order #{id} [{}] {}: {}",
                new.priority, new.machine_id, new.issue
            );
            if let Err(err) = notifier.send(&message).await {
                warn!("Work order #{id} created but SMS alert failed: {err:#}");
            }
        }

        Ok(id)
    }
}
