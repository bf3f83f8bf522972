//! Particle highlight shown when an entity is inspected or levelled by hand.

use std::sync::Arc;
use std::time::Duration;

use moblevels_domain::Location;

use crate::infrastructure::ports::{ParticleSink, SchedulerPort};

const BURSTS: u32 = 10;
const PARTICLES_PER_BURST: u32 = 20;
const BURST_INTERVAL: Duration = Duration::from_millis(50);

/// Plays a short particle sequence off the main loop. Touches no engine
/// state; failures only end the sequence early.
pub struct CosmeticFeedback {
    scheduler: Arc<dyn SchedulerPort>,
    sink: Arc<dyn ParticleSink>,
}

impl CosmeticFeedback {
    pub fn new(scheduler: Arc<dyn SchedulerPort>, sink: Arc<dyn ParticleSink>) -> Self {
        Self { scheduler, sink }
    }

    pub fn highlight(&self, location: Location) {
        let sink = self.sink.clone();
        self.scheduler.run_async(Box::new(move || {
            for burst in 0..BURSTS {
                if let Err(e) = sink.spawn(&location, PARTICLES_PER_BURST) {
                    tracing::debug!(error = %e, burst, "Particle highlight stopped");
                    return;
                }
                std::thread::sleep(BURST_INTERVAL);
            }
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockParticleSink, ParticleError};
    use crate::infrastructure::scheduler::TickScheduler;
    use moblevels_domain::Position;

    #[tokio::test]
    async fn highlight_plays_every_burst() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let tx = std::sync::Mutex::new(Some(tx));
        let mut sink = MockParticleSink::new();
        let mut calls = 0;
        sink.expect_spawn()
            .times(BURSTS as usize)
            .returning(move |_, count| {
                assert_eq!(count, PARTICLES_PER_BURST);
                calls += 1;
                if calls == BURSTS {
                    if let Some(tx) = tx.lock().unwrap_or_else(std::sync::PoisonError::into_inner).take() {
                        let _ = tx.send(());
                    }
                }
                Ok(())
            });

        let feedback = CosmeticFeedback::new(Arc::new(TickScheduler::new()), Arc::new(sink));
        feedback.highlight(Location::new("world", Position::new(0.0, 64.0, 0.0)));

        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn sink_errors_end_the_sequence() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let tx = std::sync::Mutex::new(Some(tx));
        let mut sink = MockParticleSink::new();
        sink.expect_spawn().times(1).returning(move |_, _| {
            if let Some(tx) = tx.lock().unwrap_or_else(std::sync::PoisonError::into_inner).take() {
                let _ = tx.send(());
            }
            Err(ParticleError::WorldUnloaded("world".into()))
        });

        let feedback = CosmeticFeedback::new(Arc::new(TickScheduler::new()), Arc::new(sink));
        feedback.highlight(Location::default());

        assert!(rx.await.is_ok());
    }
}
