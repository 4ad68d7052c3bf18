use crate::clock::WorldClock;
use crate::environment::{EnvironmentState, Location};
use crate::field::FieldGrid;
use crate::player::{PlayerProfile, Resources};

/// Everything the game knows, owned in one place and passed explicitly to
/// whoever needs it.
#[derive(Debug, Clone)]
pub struct GameState {
    pub name: String,
    pub field: FieldGrid,
    pub clock: WorldClock,
    pub location: Location,
    pub player: PlayerProfile,
    pub resources: Resources,
    environment: EnvironmentState,
}

impl GameState {
    pub fn new(
        name: impl Into<String>,
        field: FieldGrid,
        clock: WorldClock,
        location: Location,
    ) -> Self {
        let environment = EnvironmentState::compute(clock.season(), clock.hours(), &location);
        Self {
            name: name.into(),
            field,
            clock,
            location,
            player: PlayerProfile::default(),
            resources: Resources::default(),
            environment,
        }
    }

    pub fn with_player(mut self, player: PlayerProfile) -> Self {
        self.player = player;
        self
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    pub fn environment(&self) -> &EnvironmentState {
        &self.environment
    }

    pub fn refresh_environment(&mut self) -> EnvironmentState {
        self.environment =
            EnvironmentState::compute(self.clock.season(), self.clock.hours(), &self.location);
        self.environment
    }
}
