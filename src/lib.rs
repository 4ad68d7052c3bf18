pub mod clock;
pub mod config;
pub mod engine;
pub mod environment;
pub mod events;
pub mod field;
pub mod player;
pub mod realtime;
pub mod rng;
pub mod snapshot;
pub mod state;

pub use clock::{ClockReading, WorldClock};
pub use config::{ConfigLoader, GameConfig};
pub use engine::{Engine, EngineBuilder, FrameSummary};
pub use environment::{temperature, Season};
pub use events::{EventSink, GameEvent};
pub use field::{FieldError, FieldGrid, Plot, ReplantPolicy};
pub use state::GameState;
