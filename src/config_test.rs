use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_environment_uses_defaults() {
    let config = Config::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.port, 3000);
    assert_eq!(config.roster_limit, 12);
    assert_eq!(config.max_logo_bytes, 2 * 1024 * 1024);
    assert!(config.seed_schools.is_empty());
}

#[test]
fn values_are_parsed() {
    let config = Config::from_lookup(lookup_from(&[
        ("PORT", "8080"),
        ("ROLLCALL_ROSTER_LIMIT", " 20 "),
        ("ROLLCALL_MAX_LOGO_BYTES", "1024"),
    ]))
    .unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.roster_limit, 20);
    assert_eq!(config.max_logo_bytes, 1024);
}

#[test]
fn invalid_port_is_an_error() {
    let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "eighty".into() });
}

#[test]
fn zero_roster_limit_is_an_error() {
    let err = Config::from_lookup(lookup_from(&[("ROLLCALL_ROSTER_LIMIT", "0")])).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "ROLLCALL_ROSTER_LIMIT", .. }));
}

#[test]
fn seed_schools_are_split_and_trimmed() {
    let config = Config::from_lookup(lookup_from(&[("ROLLCALL_SCHOOLS", "Al Noor, Green Valley ,,")])).unwrap();
    assert_eq!(config.seed_schools, vec!["Al Noor".to_owned(), "Green Valley".to_owned()]);
}

#[test]
fn message_limit_leaves_room_for_logo() {
    let config = Config { max_logo_bytes: 100, ..Config::default() };
    assert!(config.max_message_bytes() > 100);
}
