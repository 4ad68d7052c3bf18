//! Notifications from the core to whatever renders it.

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

use crate::clock::ClockReading;
use crate::environment::Season;
use crate::field::Plot;
use crate::player::PlayerProfile;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    SquareSelected(Plot),
    PlotCultivated(Plot),
    TimeChanged(ClockReading),
    EnvironmentChanged { temperature: i32, season: Season },
    DayStarted { day: u32, season: Season },
    /// Sent after every accepted profile write, carrying the whole profile.
    PlayerUpdated(PlayerProfile),
}

/// Receiver registered on the engine. Sinks are called synchronously, in
/// registration order, from within the operation that produced the event.
pub trait EventSink {
    fn notify(&mut self, event: &GameEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&GameEvent),
{
    fn notify(&mut self, event: &GameEvent) {
        self(event);
    }
}

impl EventSink for UnboundedSender<GameEvent> {
    fn notify(&mut self, event: &GameEvent) {
        if self.send(event.clone()).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_forwards_events() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sink = tx;
        let event = GameEvent::DayStarted {
            day: 2,
            season: Season::Summer,
        };
        sink.notify(&event);
        assert_eq!(rx.try_recv().ok(), Some(event));
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<GameEvent>();
        drop(rx);
        let mut sink = tx;
        sink.notify(&GameEvent::EnvironmentChanged {
            temperature: 30,
            season: Season::Summer,
        });
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = GameEvent::EnvironmentChanged {
            temperature: 25,
            season: Season::Spring,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"type":"environment_changed","temperature":25,"season":"Spring"}"#
        );
    }
}
