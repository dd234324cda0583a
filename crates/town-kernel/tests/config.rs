use std::io::Write;

use tempfile::NamedTempFile;
use town_kernel::SimConfig;
use town_policy::PolicyKind;

#[test]
fn defaults_match_documented_values() {
    let config = SimConfig::default();
    assert_eq!(config.ticks, None);
    assert_eq!(config.retrieve_k, 3);
    assert_eq!(config.reflection_threshold, 10);
    assert_eq!(config.hour_chunk_ticks, 2);
    assert_eq!(config.action_chunk_ticks, 1);
    assert_eq!(config.embedding_dim, 8);
    assert!((config.recency_decay - 0.01).abs() < f64::EPSILON);
    assert_eq!(config.policy, PolicyKind::Scripted);
}

#[test]
fn partial_yaml_keeps_other_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ticks: 12\npolicy: patrol\nretrieve_k: 5").unwrap();

    let config = SimConfig::load(file.path()).unwrap();
    assert_eq!(config.ticks, Some(12));
    assert_eq!(config.policy, PolicyKind::Patrol);
    assert_eq!(config.retrieve_k, 5);
    assert_eq!(config.reflection_threshold, 10);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = SimConfig::load_or_default(&dir.path().join("town.yaml")).unwrap();
    assert_eq!(config, SimConfig::default());
}

#[test]
fn malformed_yaml_names_the_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "ticks: [not, a, number]").unwrap();

    let err = SimConfig::load(file.path()).unwrap_err();
    assert!(format!("{err}").contains("Failed to parse config"));
}
