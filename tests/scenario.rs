use green_area::{config::ConfigLoader, engine::Engine, field::ReplantPolicy, Season};

fn loader() -> ConfigLoader {
    ConfigLoader::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn loreto_fixture_parses() {
    let config = loader().load("scenarios/loreto.yaml").expect("scenario parses");
    assert_eq!(config.name, "loreto");
    assert_eq!(config.seed, Some(2024));
    assert_eq!(config.field.size, 8);
    assert_eq!(config.field.replant, ReplantPolicy::Reject);
    assert_eq!(config.clock.settings().time_speed_ms, 2_000);
    assert_eq!(config.location.name, "Loreto, Perú");
}

#[test]
fn missing_file_reports_path() {
    let err = loader().load("scenarios/nope.yaml").unwrap_err();
    assert!(err.to_string().contains("nope.yaml"), "{err}");
}

#[test]
fn fixture_builds_a_ready_state() {
    let config = loader().load("scenarios/loreto.yaml").unwrap();
    let state = config.build_state().unwrap();
    assert_eq!(state.field.total_count(), 64);
    assert_eq!(state.field.available_count(), 64);
    assert_eq!(state.clock.day(), 1);
    assert_eq!(state.environment().season, Season::Summer);
    assert_eq!(state.environment().temperature, 30);
    assert_eq!(state.resources.coins, 100);
}

#[test]
fn same_seed_same_run() {
    let config = loader().load("scenarios/loreto.yaml").unwrap();
    let mut a = Engine::new(config.build_state().unwrap());
    let mut b = Engine::new(config.build_state().unwrap());
    a.run_frames(500, 100).unwrap();
    b.run_frames(500, 100).unwrap();
    assert_eq!(a.state().clock.reading(), b.state().clock.reading());
    assert_eq!(
        a.state().field.average_fertility(),
        b.state().field.average_fertility()
    );
}
