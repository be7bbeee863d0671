//! Spawning and joining resource actors.

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::framework::{FetchTrigger, RemoteResource, ResourceActor, ResourceHandle};

/// Join handles of every actor a system started.
#[derive(Default)]
pub struct ActorSet {
    handles: Vec<JoinHandle<()>>,
}

impl ActorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `actor` with its injected context and returns its handle.
    pub fn spawn<R: RemoteResource>(
        &mut self,
        (actor, handle): (ResourceActor<R>, ResourceHandle<R>),
        context: R::Context,
        trigger: FetchTrigger,
    ) -> ResourceHandle<R> {
        self.handles.push(tokio::spawn(actor.run(context, trigger)));
        handle
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every actor to exit. Actors exit once all their handles are
    /// dropped, so callers drop handles first.
    pub async fn join(self) -> Result<(), String> {
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }
        info!("All resource actors stopped.");
        Ok(())
    }
}
