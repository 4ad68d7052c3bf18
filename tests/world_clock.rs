use green_area::{
    clock::{ClockSettings, WorldClock},
    environment::{season_index, temperature, Season},
};

#[test]
fn last_minute_of_day_rolls_over() {
    let mut clock = WorldClock::starting_at(ClockSettings::default(), 13, 23, 59, 0).unwrap();
    assert_eq!(clock.season(), Season::Autumn);

    // One real interval is one simulated minute.
    assert!(clock.advance(2_000));

    let reading = clock.reading();
    assert_eq!(
        (reading.day, reading.hours, reading.minutes, reading.seconds),
        (14, 0, 0, 0)
    );
    assert_eq!(reading.season, Season::Winter);
}

#[test]
fn a_day_takes_1440_ticks() {
    let mut clock = WorldClock::starting_at(ClockSettings::default(), 1, 0, 0, 0).unwrap();
    for _ in 0..1_439 {
        assert!(!clock.tick().new_day);
    }
    assert_eq!((clock.day(), clock.hours(), clock.minutes()), (1, 23, 59));

    assert!(clock.tick().new_day);
    assert_eq!((clock.day(), clock.hours(), clock.minutes()), (2, 0, 0));
    assert_eq!(clock.total_ticks(), 1_440);
}

#[test]
fn invariants_hold_over_long_runs() {
    let mut clock = WorldClock::default();
    let mut last_day = clock.day();
    for frame in 0..50_000u64 {
        clock.advance(16 + frame % 40);
        assert!(clock.seconds() < 60);
        assert!(clock.minutes() < 60);
        assert!(clock.hours() < 24);
        assert!(clock.day() >= last_day);
        last_day = clock.day();
        assert_eq!(clock.season(), Season::for_day(clock.day()));
    }
}

#[test]
fn seasons_repeat_every_28_days() {
    for day in 1..=365 {
        assert_eq!(season_index(day), season_index(day + 28));
    }
    let order: Vec<Season> = [1, 7, 14, 21, 28, 35]
        .into_iter()
        .map(Season::for_day)
        .collect();
    assert_eq!(
        order,
        vec![
            Season::Summer,
            Season::Autumn,
            Season::Winter,
            Season::Spring,
            Season::Summer,
            Season::Autumn
        ]
    );
}

#[test]
fn temperature_reference_points() {
    let verano: Season = "Verano".parse().unwrap();
    let invierno: Season = "Invierno".parse().unwrap();
    assert_eq!(temperature(verano, 6), 30);
    assert_eq!(temperature(invierno, 18), 15);
    for season in Season::CYCLE {
        for hour in 0..24 {
            let t = temperature(season, hour);
            let base = season.base_temperature() as i32;
            assert!((base - 10..=base + 10).contains(&t));
        }
    }
}
