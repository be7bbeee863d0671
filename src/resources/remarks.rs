//! Remarks: customer-focus action plans and the incoming/outgoing feedback
//! exchanged between departments.

use async_trait::async_trait;

use crate::framework::{RemoteResource, ResourceActor, ResourceHandle};
use crate::http::{ApiClient, ApiError};
use crate::model::{CustomerFocusItem, IncomingFeedback, OutgoingFeedback};

use super::{spawnable, FailureMessage, JsonEndpoint};

pub const CUSTOMER_FOCUS_PATH: &str = "/api/remarks/customer-focus";
pub const INCOMING_PATH: &str = "/api/remarks/incoming";
pub const OUTGOING_PATH: &str = "/api/remarks/outgoing";

pub type CustomerFocus = JsonEndpoint<Vec<CustomerFocusItem>>;
pub type IncomingRemarks = JsonEndpoint<Vec<IncomingFeedback>>;

pub fn customer_focus() -> CustomerFocus {
    JsonEndpoint::new("customer-focus", CUSTOMER_FOCUS_PATH)
        .with_failure(FailureMessage::Fixed("Failed to load data".into()))
}

pub fn incoming_remarks() -> IncomingRemarks {
    JsonEndpoint::new("incoming-remarks", INCOMING_PATH)
}

/// Local edits to the outgoing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutgoingPatch {
    /// Drops the feedback with this id once the backend has acknowledged it.
    Remove(i64),
}

/// Feedback the user's department gave, awaiting acknowledgement.
pub struct OutgoingRemarks;

#[async_trait]
impl RemoteResource for OutgoingRemarks {
    type Value = Vec<OutgoingFeedback>;
    type Patch = OutgoingPatch;
    type Context = ApiClient;

    fn name(&self) -> &str {
        "outgoing-remarks"
    }

    async fn fetch(&self, ctx: &ApiClient) -> Result<Vec<OutgoingFeedback>, ApiError> {
        ctx.get_json(OUTGOING_PATH).await
    }

    fn apply_patch(&self, value: &mut Vec<OutgoingFeedback>, patch: OutgoingPatch) -> Result<(), String> {
        match patch {
            OutgoingPatch::Remove(id) => {
                let before = value.len();
                value.retain(|item| item.id != id);
                if value.len() == before {
                    return Err(format!("feedback {id} is not in the outgoing list"));
                }
                Ok(())
            }
        }
    }
}

pub fn new_customer_focus() -> (ResourceActor<CustomerFocus>, ResourceHandle<CustomerFocus>) {
    spawnable(customer_focus())
}

pub fn new_incoming() -> (ResourceActor<IncomingRemarks>, ResourceHandle<IncomingRemarks>) {
    spawnable(incoming_remarks())
}

pub fn new_outgoing() -> (ResourceActor<OutgoingRemarks>, ResourceHandle<OutgoingRemarks>) {
    spawnable(OutgoingRemarks)
}
