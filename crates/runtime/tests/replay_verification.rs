//! Replay: record, persist, verify, tamper.

mod common;

use battle_runtime::{ReplayLog, Simulation, replay};
use common::skirmish_scenario;

fn recorded_run(seed: u64) -> (battle_runtime::ScenarioDescriptor, ReplayLog) {
    let scenario = skirmish_scenario();
    let mut sim = Simulation::new(&scenario, seed).unwrap();
    sim.run_until_outcome(2000).unwrap();
    assert!(sim.outcome().is_some());
    let log = sim.replay_log();
    (scenario, log)
}

#[test]
fn replaying_a_recorded_run_reproduces_the_final_root() {
    let (scenario, log) = recorded_run(0xCAFE);

    let report = replay(&scenario, &log).expect("replay should verify");
    assert_eq!(report.final_root, log.final_root);
    assert_eq!(report.commands_applied, log.entries.len());
    assert!(report.outcome.is_some());
}

#[test]
fn tampered_root_fails_verification() {
    let (scenario, mut log) = recorded_run(0xCAFE);
    log.final_root = format!("{:0>64}", "bad");

    let err = replay(&scenario, &log).unwrap_err();
    assert_eq!(err.error_code(), "REPLAY_HASH_MISMATCH");
}

#[test]
fn truncated_log_fails_verification() {
    let (scenario, mut log) = recorded_run(0xCAFE);
    log.entries.pop();

    let err = replay(&scenario, &log).unwrap_err();
    assert_eq!(err.error_code(), "REPLAY_HASH_MISMATCH");
}

#[test]
fn wrong_seed_diverges() {
    let (scenario, mut log) = recorded_run(0xCAFE);
    log.seed ^= 1;

    // A different variance stream diverges somewhere: either a recorded
    // command stops matching the schedule or the final root differs.
    assert!(replay(&scenario, &log).is_err());
}

#[test]
fn log_survives_a_file_round_trip() {
    let (scenario, log) = recorded_run(7);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("battle.replay.ron");
    log.write_file(&path).unwrap();
    let loaded = ReplayLog::read_file(&path).unwrap();

    assert_eq!(loaded, log);
    assert!(replay(&scenario, &loaded).is_ok());
}
