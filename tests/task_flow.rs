mod support;

use predicates::str::contains;
use serde_json::Value;

use support::{due_in_days, TestStore};

/// Add a task via the JSON surface and return its id.
fn add_task_json(store: &TestStore, assigned_to: &str) -> String {
    let output = store
        .cmd_as_admin()
        .args([
            "task",
            "add",
            "--to",
            assigned_to,
            "--title",
            "Review PR",
            "--description",
            "Look over the open pull request",
            "--due",
            &due_in_days(7),
            "--json",
        ])
        .output()
        .expect("run");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(payload["schema_version"], "taskman.v1");
    assert_eq!(payload["status"], "success");
    payload["data"]["id"].as_str().expect("id").to_string()
}

#[test]
fn add_and_list_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;
    store.register_user("alice", "Alice123");

    let id = add_task_json(&store, "alice");
    assert!(id.starts_with("task-"));

    // Alice sees her own task by default.
    store
        .cmd_as("alice", "Alice123")
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(contains(&id))
        .stdout(contains("Review PR"));

    // Admin has no tasks of their own but sees everyone's with --everyone.
    store
        .cmd_as_admin()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(contains("no matching tasks"));
    store
        .cmd_as_admin()
        .args(["task", "list", "--everyone"])
        .assert()
        .success()
        .stdout(contains(&id));

    Ok(())
}

#[test]
fn unrecognized_filter_means_all() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;
    store.register_user("alice", "Alice123");
    let id = add_task_json(&store, "alice");

    store
        .cmd_as("alice", "Alice123")
        .args(["task", "list", "--filter", "bogus"])
        .assert()
        .success()
        .stdout(contains("All tasks"))
        .stdout(contains(&id));

    Ok(())
}

#[test]
fn record_delimiter_in_title_is_rejected_before_saving(
) -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;
    store.register_user("alice", "Alice123");

    // A ';' inside the title would split the saved line into extra fields.
    store
        .cmd_as_admin()
        .args([
            "task",
            "add",
            "--to",
            "alice",
            "--title",
            "Do A; then B",
            "--description",
            "Two steps, one record",
            "--due",
            &due_in_days(7),
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("cannot contain"));

    // The store is untouched and still loads.
    store
        .cmd_as("alice", "Alice123")
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(contains("no matching tasks"));

    Ok(())
}

#[test]
fn only_assignee_or_admin_can_mutate_a_task() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;
    store.register_user("alice", "Alice123");
    store.register_user("mallory", "Mallory12");
    let id = add_task_json(&store, "alice");

    for args in [
        vec!["task", "complete", id.as_str()],
        vec!["task", "reassign", id.as_str(), "--to", "mallory"],
        vec!["task", "reschedule", id.as_str(), "--due", &due_in_days(10)],
    ] {
        store
            .cmd_as("mallory", "Mallory12")
            .args(&args)
            .assert()
            .failure()
            .code(3)
            .stderr(contains("not assigned to you"));
    }

    // The task is unchanged and the admin may still act on it.
    store
        .cmd_as_admin()
        .args(["task", "complete", &id])
        .assert()
        .success();

    Ok(())
}

#[test]
fn complete_twice_is_policy_blocked() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;
    store.register_user("alice", "Alice123");
    let id = add_task_json(&store, "alice");

    store
        .cmd_as("alice", "Alice123")
        .args(["task", "complete", &id])
        .assert()
        .success();

    store
        .cmd_as("alice", "Alice123")
        .args(["task", "complete", &id])
        .assert()
        .failure()
        .code(3)
        .stderr(contains("already completed"));

    Ok(())
}

#[test]
fn reassign_updates_assignee_and_assigner() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;
    store.register_user("alice", "Alice123");
    store.register_user("bobby", "Bobby123");
    let id = add_task_json(&store, "alice");

    let output = store
        .cmd_as("alice", "Alice123")
        .args(["task", "reassign", &id, "--to", "bobby", "--json"])
        .output()?;
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(payload["data"]["assigned_to"], "bobby");
    // The acting user becomes the assigner.
    assert_eq!(payload["data"]["assigned_by"], "alice");

    Ok(())
}

#[test]
fn reassign_to_unknown_user_fails() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;
    store.register_user("alice", "Alice123");
    let id = add_task_json(&store, "alice");

    store
        .cmd_as("alice", "Alice123")
        .args(["task", "reassign", &id, "--to", "ghostuser"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Unknown user"));

    Ok(())
}

#[test]
fn reschedule_rejects_malformed_and_out_of_range_dates(
) -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;
    store.register_user("alice", "Alice123");
    let id = add_task_json(&store, "alice");

    store
        .cmd_as("alice", "Alice123")
        .args(["task", "reschedule", &id, "--due", "2026-06-01"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("DD/MM/YYYY"));

    store
        .cmd_as("alice", "Alice123")
        .args(["task", "reschedule", &id, "--due", &due_in_days(-2)])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("past"));

    // Roughly 20 months out, beyond the 18-month window.
    store
        .cmd_as("alice", "Alice123")
        .args(["task", "reschedule", &id, "--due", &due_in_days(610)])
        .assert()
        .failure()
        .code(2);

    store
        .cmd_as("alice", "Alice123")
        .args(["task", "reschedule", &id, "--due", &due_in_days(14)])
        .assert()
        .success();

    Ok(())
}

#[test]
fn deleted_assigner_shows_up_as_orphaned() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;
    store.register_user("alice", "Alice123");
    let id = add_task_json(&store, "alice");

    store
        .cmd_as_admin()
        .args(["user", "delete", "admin"])
        .assert()
        .failure()
        .code(3);

    // Delete a throwaway assigner instead: create one, have them assign.
    store.register_user("carol", "Carol123");
    let output = store
        .cmd_as("carol", "Carol123")
        .args([
            "task",
            "add",
            "--to",
            "alice",
            "--title",
            "Write docs",
            "--description",
            "Document the new module layout",
            "--due",
            &due_in_days(5),
            "--json",
        ])
        .output()?;
    assert!(output.status.success());
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    let orphan_id = payload["data"]["id"].as_str().expect("id").to_string();

    store
        .cmd_as_admin()
        .args(["user", "delete", "carol"])
        .assert()
        .success();

    store
        .cmd_as("alice", "Alice123")
        .args(["task", "list", "--filter", "orphaned"])
        .assert()
        .success()
        .stdout(contains(&orphan_id))
        .stdout(contains("[deleted user]"));

    // The admin-assigned task is not orphaned.
    let output = store
        .cmd_as("alice", "Alice123")
        .args(["task", "list", "--filter", "orphaned", "--json"])
        .output()?;
    let payload: Value = serde_json::from_slice(&output.stdout)?;
    let rows = payload["data"]["tasks"].as_array().expect("tasks");
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0]["id"], Value::String(id));

    Ok(())
}

#[test]
fn auth_is_required_and_checked() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::init()?;

    support::taskman_cmd()
        .arg("--data-dir")
        .arg(store.path())
        .args(["task", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("--user"));

    store
        .cmd_as("admin", "wrongpass")
        .args(["task", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Login failed"));

    Ok(())
}
