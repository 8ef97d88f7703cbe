//! Bulk registration through providers and priority files.

use std::collections::HashMap;

use muster::{
    BoxedTask, Controller, Error, Priority, PriorityFile, Provider, Registry, TaskResult,
};

use crate::fixtures::emit;

/// Provider contributing three bootstrapping entities, two of them with
/// relative declarations.
struct Bootstrap;

fn appending(marker: &'static str) -> BoxedTask<String> {
    Box::new(move |_: &mut Controller, out: &mut String| -> TaskResult {
        out.push_str(marker);
        Ok(())
    })
}

impl Provider<String> for Bootstrap {
    fn entities(self) -> Vec<(String, BoxedTask<String>)> {
        vec![
            ("config".to_string(), appending("config ")),
            ("database".to_string(), appending("database ")),
            ("migrations".to_string(), appending("migrations")),
        ]
    }

    fn priorities(&self) -> HashMap<String, Priority> {
        let mut map = HashMap::new();
        map.insert("database".to_string(), Priority::after("config"));
        map.insert("migrations".to_string(), Priority::after("database"));
        map
    }
}

#[test]
fn registered_provider_entities_execute_in_declared_order() {
    let mut registry: Registry<String> = Registry::new();
    registry.register(Bootstrap);

    let mut out = String::new();
    let report = registry.execute(&mut out).unwrap();

    assert_eq!(out, "config database migrations");
    assert_eq!(report.executed, vec!["config", "database", "migrations"]);
}

#[test]
fn provider_entities_without_a_priority_entry_get_the_default() {
    let mut registry: Registry<String> = Registry::new();
    registry.register(Bootstrap);

    assert_eq!(registry.priority("config"), Some(&Priority::Absolute(0)));
    assert_eq!(
        registry.priority("database"),
        Some(&Priority::after("config"))
    );
}

#[test]
fn provider_entries_mix_with_directly_attached_ones() {
    let mut registry: Registry<String> = Registry::new();
    registry.register(Bootstrap);
    registry.attach_with_priority("banner", Priority::before("config"), emit("banner "));

    let mut out = String::new();
    registry.execute(&mut out).unwrap();

    assert_eq!(out, "banner config database migrations");
}

#[test]
fn priority_file_reorders_an_existing_registry() {
    let mut registry: Registry<String> = Registry::new();
    registry.attach("alpha", emit("alpha "));
    registry.attach("beta", emit("beta "));

    let file: PriorityFile = r#"
        [priorities]
        beta = { before = "alpha" }
    "#
    .parse()
    .unwrap();
    file.apply_to(&mut registry).unwrap();

    let mut out = String::new();
    registry.execute(&mut out).unwrap();

    assert_eq!(out, "beta alpha ");
}

#[test]
fn priority_file_with_unknown_name_is_rejected() {
    let mut registry: Registry<String> = Registry::new();
    registry.attach("alpha", emit("alpha"));

    let file: PriorityFile = r#"
        [priorities]
        ghost = 3
    "#
    .parse()
    .unwrap();

    let err = file.apply_to(&mut registry).unwrap_err();

    assert!(matches!(err, Error::UnknownEntity(name) if name == "ghost"));
}

#[test]
fn priority_file_loads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("priorities.toml");
    std::fs::write(
        &path,
        r#"
            [priorities]
            setup = -1
            teardown = { after = "setup" }
        "#,
    )
    .unwrap();

    let file = PriorityFile::load(&path).unwrap();

    assert_eq!(file.priorities["setup"], Priority::Absolute(-1));
    assert_eq!(file.priorities["teardown"], Priority::after("setup"));
}

#[test]
fn priority_file_round_trips_through_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("priorities.toml");

    let mut file = PriorityFile::default();
    file.priorities
        .insert("setup".to_string(), Priority::absolute(2));
    file.priorities
        .insert("verify".to_string(), Priority::before("setup"));
    file.save(&path).unwrap();

    let loaded = PriorityFile::load(&path).unwrap();

    assert_eq!(loaded.priorities["setup"], Priority::Absolute(2));
    assert_eq!(loaded.priorities["verify"], Priority::before("setup"));
}
