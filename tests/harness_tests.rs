use nagsim::diagnostics::{DiagError, LocalRecord};
use nagsim::scenario::{Action, Scenario, ScheduledAction, MAX_SCENARIO_ACTIONS};
use nagsim::*;

fn quiet_sim() -> VehicleSim {
    let mut sim = VehicleSim::with_scenario(SimConfig::default(), Scenario::new());
    sim.start();
    sim
}

#[test]
fn test_tick_requires_start() {
    let mut sim = VehicleSim::with_scenario(SimConfig::default(), Scenario::new());
    assert!(!sim.is_running());
    assert!(sim.tick().is_none());

    sim.start();
    let report = sim.tick().unwrap();
    assert_eq!(report.tick, 1);

    sim.stop();
    assert!(sim.tick().is_none());
    assert_eq!(sim.current_tick(), 1);
}

#[test]
fn test_idle_in_park() {
    let mut sim = quiet_sim();
    let reports = sim.run(10);

    assert_eq!(reports.len(), 10);
    let last = reports.last().unwrap();
    assert_eq!(last.selector, SelectorRange::Park);
    assert_eq!(last.virtual_gear, VirtualGear::Park);
    assert_eq!(last.forward_gear.get(), 1);
    assert_eq!(last.output_shaft_rpm, 0);
    assert_eq!(last.engine_rpm, sim.engine().limits().idle_rpm);
    assert!(reports.iter().all(|r| r.shift.is_none()));
}

#[test]
fn test_drive_cycle() {
    let mut sim = VehicleSim::new(SimConfig::default()).unwrap();
    sim.start();
    let reports = sim.run(150);
    assert_eq!(reports.len(), 150);

    let tick4 = &reports[3];
    assert_eq!(tick4.selector, SelectorRange::Drive);
    assert_eq!(tick4.virtual_gear, VirtualGear::Drive1);

    let log = sim.transmission().shift_log();
    assert_eq!(log.total_upshifts(), 4);
    assert!(log.total_downshifts() >= 1);
    assert!(reports.iter().any(|r| r.virtual_gear == VirtualGear::Drive5));

    let limping: Vec<_> = reports.iter().filter(|r| r.limp_mode).collect();
    assert!(!limping.is_empty());
    assert!(limping.iter().all(|r| r.program == DrivingProgram::Fail));

    let last = reports.last().unwrap();
    assert_eq!(last.selector, SelectorRange::Park);
    assert_eq!(last.virtual_gear, VirtualGear::Park);
    assert_eq!(last.program, DrivingProgram::Sport);
    assert!(!last.limp_mode);
    assert!(sim.scenario().is_empty());
}

#[test]
fn test_shift_reported_on_its_tick() {
    let mut sim = quiet_sim();
    sim.selector_mut().set_position(SelectorRange::Drive);
    sim.tick().unwrap();

    sim.engine_mut().set_rpm(3200);
    let report = sim.tick().unwrap();

    let shift = report.shift.unwrap();
    assert_eq!(shift.from.get(), 1);
    assert_eq!(shift.to.get(), 2);
    assert_eq!(report.forward_gear.get(), 2);
    assert_eq!(report.virtual_gear, VirtualGear::Drive2);
    assert_eq!(report.engine_rpm, shift.target_rpm);

    assert!(sim.tick().unwrap().shift.is_none());
}

#[test]
fn test_scheduled_actions_apply_on_their_tick() {
    let mut sim = quiet_sim();
    sim.schedule(2, Action::PressButton).unwrap();
    sim.schedule(3, Action::ReleaseButton).unwrap();
    sim.schedule(3, Action::EnterLimp).unwrap();

    let first = sim.tick().unwrap();
    assert!(!first.program_button);

    let second = sim.tick().unwrap();
    assert!(second.program_button);
    assert_eq!(second.program, DrivingProgram::Comfort);

    let third = sim.tick().unwrap();
    assert!(third.limp_mode);
    assert_eq!(third.program, DrivingProgram::Fail);
    assert_eq!(third.frames.gs418.program.as_char(), 'F');
}

#[test]
fn test_schedule_in_past_rejected() {
    let mut sim = quiet_sim();
    sim.run(5);
    let err = sim.schedule(2, Action::EnterLimp).unwrap_err();
    assert!(matches!(
        err,
        SimError::ScenarioInPast { at_tick: 2, current_tick: 5 }
    ));
}

#[test]
fn test_scenario_capacity() {
    let mut scenario = Scenario::new();
    for tick in 0..MAX_SCENARIO_ACTIONS as u64 {
        scenario.schedule(tick, Action::PressButton, 0).unwrap();
    }
    let err = scenario.schedule(999, Action::ReleaseButton, 0).unwrap_err();
    assert!(matches!(err, SimError::ScenarioFull { .. }));
}

#[test]
fn test_take_due_drains_in_order() {
    let mut scenario = Scenario::new();
    scenario.schedule(1, Action::Throttle { on: true }, 0).unwrap();
    scenario.schedule(3, Action::EnterLimp, 0).unwrap();
    scenario.schedule(1, Action::PressButton, 0).unwrap();

    let due = scenario.take_due(2);
    assert_eq!(due.as_slice(), &[Action::Throttle { on: true }, Action::PressButton]);
    assert_eq!(scenario.pending().len(), 1);
    assert_eq!(scenario.stats().total_applied, 2);
    assert!(scenario.take_due(2).is_empty());
}

#[test]
fn test_diagnostic_records() {
    let mut sim = quiet_sim();
    sim.tick().unwrap();

    match sim.read_diagnostic(0x20).unwrap() {
        LocalRecord::Sensors(sensors) => {
            assert!(sensors.parking_lock);
            assert_eq!(sensors.n2_rpm, 0);
            assert_eq!(sensors.calc_ratio, 0);
            assert_eq!(sensors.v_batt_mv, 14300);
            assert_eq!(sensors.atf_temp_c, 80);
        }
        other => panic!("unexpected record {other:?}"),
    }

    assert!(matches!(sim.read_diagnostic(0x21), Ok(LocalRecord::Solenoids(_))));
    assert_eq!(
        sim.read_diagnostic(0x99).unwrap_err(),
        DiagError::UnsupportedIdentifier(0x99)
    );
}

#[test]
fn test_diagnostics_follow_shifts() {
    let mut sim = quiet_sim();
    sim.selector_mut().set_position(SelectorRange::Drive);
    sim.tick().unwrap();
    sim.engine_mut().set_rpm(3200);
    sim.tick().unwrap();

    match sim.read_diagnostic(0x20).unwrap() {
        LocalRecord::Sensors(sensors) => {
            assert!(!sensors.parking_lock);
            assert!(sensors.n2_rpm > 0);
            // Engaged D2, ratio 2.19
            assert!((218..=220).contains(&sensors.calc_ratio));
        }
        other => panic!("unexpected record {other:?}"),
    }

    match sim.read_diagnostic(0x21).unwrap() {
        LocalRecord::Solenoids(solenoids) => assert_eq!(solenoids.y3_pwm, 255),
        other => panic!("unexpected record {other:?}"),
    }
}

#[test]
fn test_telemetry_json() {
    let mut sim = quiet_sim();
    sim.tick().unwrap();
    let json = sim.telemetry_json().unwrap();
    let report: TickReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report.tick, 1);
    assert_eq!(report.selector, SelectorRange::Park);
}

#[test]
fn test_config_from_json() {
    let config = SimConfig::from_json(
        r#"{
            "tick_period_ms": 20,
            "engine": { "idle_rpm": 800 },
            "scenario": [
                { "at_tick": 1, "action": { "type": "set_selector", "range": "Drive" } },
                { "at_tick": 2, "action": { "type": "set_engine_rpm", "rpm": 3300 } }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(config.tick_period_ms, 20);
    assert_eq!(config.ticks, 150);
    assert_eq!(config.engine.idle_rpm, 800);
    assert_eq!(config.engine.redline_rpm, 6000);

    let mut sim = VehicleSim::new(config).unwrap();
    sim.start();
    sim.run(2);
    assert_eq!(sim.transmission().gear().get(), 2);
}

#[test]
fn test_config_validation() {
    let bad = [
        r#"{ "tick_period_ms": 0 }"#,
        r#"{ "engine": { "idle_rpm": 7000 } }"#,
        r#"{ "engine": { "coast_rpm_per_tick": 0 } }"#,
    ];
    for json in bad {
        assert!(
            matches!(SimConfig::from_json(json), Err(SimError::InvalidConfig(_))),
            "{json}"
        );
    }

    assert!(matches!(SimConfig::from_json("not json"), Err(SimError::Json(_))));
    assert!(matches!(
        SimConfig::load("/nonexistent/nagsim.json"),
        Err(SimError::Io(_))
    ));
}

#[test]
fn test_scenario_from_actions() {
    let actions = [
        ScheduledAction { at_tick: 4, action: Action::ClearLimp },
        ScheduledAction { at_tick: 1, action: Action::EnterLimp },
    ];
    let scenario = Scenario::from_actions(actions).unwrap();
    assert_eq!(scenario.pending()[0].action, Action::EnterLimp);
    assert_eq!(scenario.stats().total_scheduled, 2);
}

#[test]
fn test_extreme_engine_speed_is_clamped() {
    let mut sim = quiet_sim();
    sim.schedule(1, Action::SetEngineRpm { rpm: i32::MAX }).unwrap();
    sim.schedule(1, Action::Throttle { on: true }).unwrap();

    let report = sim.tick().unwrap();
    assert_eq!(report.engine_rpm, sim.engine().limits().redline_rpm);

    sim.schedule(2, Action::Throttle { on: false }).unwrap();
    sim.engine_mut().set_rpm(i32::MIN);
    let report = sim.tick().unwrap();
    assert_eq!(report.engine_rpm, sim.engine().limits().idle_rpm);
}
