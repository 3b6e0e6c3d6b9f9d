//! Tick notifications.
//!
//! Turns tick events into the one-line messages posted to the channel the
//! effect was applied from. Until a chat client is attached they go to the
//! log.

use gotvalis_runtime::{EffectEvent, Event};
use tokio::sync::broadcast::{self, error::RecvError};

pub async fn run(mut events: broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(Event::Effects(event)) => notify(&event),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "tick notifications lagged behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn notify(event: &EffectEvent) {
    match event {
        EffectEvent::Tick(report) => {
            let channel = report.route.channel_id.as_deref().unwrap_or("-");
            tracing::info!(
                entity = %report.entity_id,
                channel,
                "{}",
                report.summary()
            );
        }
        EffectEvent::Expired { entity, kinds } => {
            tracing::debug!(entity = %entity, ?kinds, "status effects expired");
        }
        _ => {}
    }
}
