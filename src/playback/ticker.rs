use std::time::Duration;

use flume::Sender;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::event::events::Event;

use super::widget::WidgetId;

/// Emits `Event::PlayerTick(id)` every `period` until aborted or until the
/// receiving side of the channel is gone.
pub fn spawn_ticker(id: WidgetId, period: Duration, event_tx: Sender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if event_tx.send_async(Event::PlayerTick(id)).await.is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_on_cadence_until_aborted() {
        let (tx, rx) = flume::unbounded();
        let start = Instant::now();
        let handle = spawn_ticker(WidgetId(4), Duration::from_secs(1), tx);

        for _ in 0..2 {
            match rx.recv_async().await.unwrap() {
                Event::PlayerTick(id) => assert_eq!(id, WidgetId(4)),
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(start.elapsed(), Duration::from_secs(2));

        handle.abort();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_receiver_is_dropped() {
        let (tx, rx) = flume::unbounded();
        let handle = spawn_ticker(WidgetId(1), Duration::from_secs(1), tx);
        drop(rx);

        assert!(handle.await.is_ok());
    }
}
