//! Integration tests for shell extension reconciliation

mod common;

use common::{
    key, print_test_header, strings, MockInventory, MockManager, MockStore, DISABLED_KEY,
    ENABLED_KEY, SHELL_SCHEMA,
};
use desktop_state::contract::*;
use desktop_state::domain::repository::ExtensionCommand;
use desktop_state::domain::{ExtensionService, Service, ShellListKeys};
use std::sync::Arc;

const UUID: &str = "dash-to-dock@micxgx.gmail.com";
const BUNDLE: &str = "/tmp/dash-to-dock@micxgx.gmail.com.shell-extension.zip";

struct Desktop {
    store: Arc<MockStore>,
    inventory: Arc<MockInventory>,
    manager: Arc<MockManager>,
    service: ExtensionService,
}

impl Desktop {
    fn new(installed: &[&str], enabled: &[&str], disabled: &[&str]) -> Self {
        let store = MockStore::with_shell_lists(enabled, disabled);
        let inventory = MockInventory::with(installed);
        let manager = MockManager::new(inventory.clone(), UUID);
        let service = ExtensionService::new(
            Arc::new(Service::new(store.clone())),
            manager.clone(),
            inventory.clone(),
            ShellListKeys::default(),
        );
        Self {
            store,
            inventory,
            manager,
            service,
        }
    }

    fn enabled_list(&self) -> Option<Value> {
        self.store.value(&key(SHELL_SCHEMA, ENABLED_KEY))
    }

    fn disabled_list(&self) -> Option<Value> {
        self.store.value(&key(SHELL_SCHEMA, DISABLED_KEY))
    }
}

fn install_request() -> ExtensionRequest {
    ExtensionRequest {
        src: Some(BUNDLE.to_string()),
        ..ExtensionRequest::new(UUID)
    }
}

#[tokio::test]
async fn test_current_state_disabled_list_wins() {
    print_test_header(
        "test_current_state_disabled_list_wins",
        &["An extension in both lists counts as disabled"],
    );

    let desktop = Desktop::new(&[UUID], &[UUID], &[UUID]);
    let state = desktop.service.current_state(UUID).await.unwrap();

    assert_eq!(
        state,
        ExtensionState {
            installed: true,
            enabled: Some(false)
        }
    );
}

#[tokio::test]
async fn test_matching_state_is_a_no_op() {
    print_test_header(
        "test_matching_state_is_a_no_op",
        &["Installed and enabled extension needs nothing"],
    );

    let desktop = Desktop::new(&[UUID], &[UUID], &[]);
    let report = desktop
        .service
        .reconcile(ExtensionRequest {
            enabled: Some(true),
            ..ExtensionRequest::new(UUID)
        })
        .await
        .unwrap();

    assert!(!report.changed);
    assert!(report.operations.is_empty());
    assert!(desktop.manager.calls().is_empty());
    assert!(desktop.store.writes().is_empty());
}

#[tokio::test]
async fn test_enable_when_in_neither_list() {
    print_test_header(
        "test_enable_when_in_neither_list",
        &["Enabling appends the uuid to the enabled list only"],
    );

    let desktop = Desktop::new(&[UUID], &["other@example.com"], &[]);
    let report = desktop
        .service
        .reconcile(ExtensionRequest {
            enabled: Some(true),
            ..ExtensionRequest::new(UUID)
        })
        .await
        .unwrap();

    assert!(report.changed);
    assert_eq!(report.operations.get("enable"), Some(&Operation::Success));
    assert_eq!(
        desktop.enabled_list(),
        Some(strings(&["other@example.com", UUID]))
    );
    assert_eq!(desktop.disabled_list(), Some(strings(&[])));
    // The disabled list was already correct
    assert_eq!(desktop.store.writes().len(), 1);
}

#[tokio::test]
async fn test_disable_moves_between_lists() {
    print_test_header(
        "test_disable_moves_between_lists",
        &["Disabling removes from enabled and appends to disabled"],
    );

    let desktop = Desktop::new(&[UUID], &[UUID], &[]);
    let report = desktop
        .service
        .reconcile(ExtensionRequest {
            enabled: Some(false),
            ..ExtensionRequest::new(UUID)
        })
        .await
        .unwrap();

    assert!(report.changed);
    assert_eq!(report.operations.get("disable"), Some(&Operation::Success));
    assert_eq!(desktop.enabled_list(), Some(strings(&[])));
    assert_eq!(desktop.disabled_list(), Some(strings(&[UUID])));
}

#[tokio::test]
async fn test_install_runs_manager() {
    print_test_header(
        "test_install_runs_manager",
        &["Missing extension is installed from its bundle, then enabled"],
    );

    let desktop = Desktop::new(&[], &[], &[]);
    let report = desktop
        .service
        .reconcile(ExtensionRequest {
            enabled: Some(true),
            force: true,
            ..install_request()
        })
        .await
        .unwrap();

    assert!(report.changed);
    assert_eq!(
        desktop.manager.calls(),
        vec![ExtensionCommand::Install {
            src: BUNDLE.to_string(),
            force: true
        }]
    );
    assert_eq!(
        report.operations.get("install"),
        Some(&Operation::Command {
            rc: 0,
            stdout: None,
            stderr: None
        })
    );
    assert_eq!(report.operations.get("enable"), Some(&Operation::Success));
    assert!(desktop.inventory.contains(UUID));
    assert_eq!(desktop.enabled_list(), Some(strings(&[UUID])));
}

#[tokio::test]
async fn test_install_without_source_fails_before_running() {
    print_test_header(
        "test_install_without_source_fails_before_running",
        &["Installing needs a bundle path; nothing is spawned without one"],
    );

    let desktop = Desktop::new(&[], &[], &[]);
    let failure = desktop
        .service
        .reconcile(ExtensionRequest::new(UUID))
        .await
        .unwrap_err();

    assert_eq!(failure.error, DesktopError::MissingBundleSource);
    assert!(failure.report.operations.is_empty());
    assert!(desktop.manager.calls().is_empty());
}

#[tokio::test]
async fn test_already_installed_stderr_is_benign() {
    print_test_header(
        "test_already_installed_stderr_is_benign",
        &[
            "Manager reporting an existing install without --force",
            "is recorded but not treated as a failure",
        ],
    );

    let desktop = Desktop::new(&[], &[], &[]);
    desktop.manager.respond(
        2,
        "",
        "Extension “dash-to-dock@micxgx.gmail.com” exists and --force was not specified",
    );

    let report = desktop.service.reconcile(install_request()).await.unwrap();

    match report.operations.get("install") {
        Some(Operation::Command { rc, stderr, .. }) => {
            assert_eq!(*rc, 2);
            assert!(stderr.as_deref().unwrap_or_default().contains("--force"));
        }
        other => panic!("unexpected install record {:?}", other),
    }
    // Nothing appeared on disk, so nothing changed
    assert!(!report.changed);
}

#[tokio::test]
async fn test_install_failure_carries_operation() {
    print_test_header(
        "test_install_failure_carries_operation",
        &["A failing install reports stderr and the install record"],
    );

    let desktop = Desktop::new(&[], &[], &[]);
    desktop.manager.respond(1, "", "bundle is not a valid zip");

    let failure = desktop
        .service
        .reconcile(ExtensionRequest {
            enabled: Some(true),
            ..install_request()
        })
        .await
        .unwrap_err();

    assert_eq!(
        failure.error.to_string(),
        "Gnome Extension Executable Error: bundle is not a valid zip"
    );
    assert_eq!(
        failure.report.operations.get("install"),
        Some(&Operation::Command {
            rc: 1,
            stdout: Some(String::new()),
            stderr: Some("bundle is not a valid zip".to_string()),
        })
    );
    assert!(!failure.report.operations.contains_key("enable"));
    assert!(desktop.store.writes().is_empty());
}

#[tokio::test]
async fn test_uninstall_flushes_both_lists() {
    print_test_header(
        "test_uninstall_flushes_both_lists",
        &["Removing an extension also drops it from both lists"],
    );

    let desktop = Desktop::new(&[UUID], &[UUID], &[UUID]);
    let report = desktop
        .service
        .reconcile(ExtensionRequest {
            state: Presence::Absent,
            enabled: Some(true),
            ..ExtensionRequest::new(UUID)
        })
        .await
        .unwrap();

    assert!(report.changed);
    assert_eq!(
        desktop.manager.calls(),
        vec![ExtensionCommand::Uninstall {
            uuid: UUID.to_string()
        }]
    );
    assert_eq!(
        report.operations.get("flush from enabled/disabled"),
        Some(&Operation::Success)
    );
    assert_eq!(desktop.enabled_list(), Some(strings(&[])));
    assert_eq!(desktop.disabled_list(), Some(strings(&[])));
}

#[tokio::test]
async fn test_uninstall_without_enabled_leaves_lists() {
    print_test_header(
        "test_uninstall_without_enabled_leaves_lists",
        &["Without `enabled` the lists are left alone"],
    );

    let desktop = Desktop::new(&[UUID], &[UUID], &[]);
    let report = desktop
        .service
        .reconcile(ExtensionRequest {
            state: Presence::Absent,
            ..ExtensionRequest::new(UUID)
        })
        .await
        .unwrap();

    assert!(report.changed);
    assert!(!desktop.inventory.contains(UUID));
    assert_eq!(desktop.enabled_list(), Some(strings(&[UUID])));
}

#[tokio::test]
async fn test_check_mode_plans_without_acting() {
    print_test_header(
        "test_check_mode_plans_without_acting",
        &["Check mode records planned operations and touches nothing"],
    );

    let desktop = Desktop::new(&[], &[], &[]);
    let report = desktop
        .service
        .reconcile(ExtensionRequest {
            enabled: Some(true),
            check_mode: true,
            ..install_request()
        })
        .await
        .unwrap();

    assert!(report.changed);
    assert_eq!(report.operations.get("install"), Some(&Operation::Planned));
    assert_eq!(report.operations.get("enable"), Some(&Operation::Planned));
    assert!(desktop.manager.calls().is_empty());
    assert!(desktop.store.writes().is_empty());
    assert!(!desktop.inventory.contains(UUID));
}

#[tokio::test]
async fn test_invalid_uuid_rejected() {
    print_test_header(
        "test_invalid_uuid_rejected",
        &["Uuids that are not a single directory name are refused"],
    );

    let desktop = Desktop::new(&[], &[], &[]);
    let failure = desktop
        .service
        .reconcile(ExtensionRequest::new("../etc"))
        .await
        .unwrap_err();

    assert!(matches!(failure.error, DesktopError::InvalidArgument { .. }));
    assert!(desktop.manager.calls().is_empty());
}

#[tokio::test]
async fn test_locked_disabled_list_reports_enabled_write() {
    print_test_header(
        "test_locked_disabled_list_reports_enabled_write",
        &[
            "Enabling writes the enabled list before the disabled list;",
            "when the second write fails the first is still reported",
        ],
    );

    let desktop = Desktop::new(&[UUID], &[], &[UUID]);
    desktop.store.lock(&key(SHELL_SCHEMA, DISABLED_KEY));

    let failure = desktop
        .service
        .reconcile(ExtensionRequest {
            enabled: Some(true),
            ..ExtensionRequest::new(UUID)
        })
        .await
        .unwrap_err();
    desktop.store.print_state("after partial enable");

    assert!(matches!(failure.error, DesktopError::NotWritable { .. }));
    assert!(failure.report.changed);
    assert_eq!(
        failure.report.operations.get("enable"),
        Some(&Operation::Success)
    );
    assert_eq!(desktop.enabled_list(), Some(strings(&[UUID])));
    assert_eq!(desktop.disabled_list(), Some(strings(&[UUID])));
}

#[tokio::test]
async fn test_locked_enabled_list_reports_nothing() {
    print_test_header(
        "test_locked_enabled_list_reports_nothing",
        &["A failure on the first list write leaves an empty report"],
    );

    let desktop = Desktop::new(&[UUID], &[], &[]);
    desktop.store.lock(&key(SHELL_SCHEMA, ENABLED_KEY));

    let failure = desktop
        .service
        .reconcile(ExtensionRequest {
            enabled: Some(true),
            ..ExtensionRequest::new(UUID)
        })
        .await
        .unwrap_err();

    assert!(matches!(failure.error, DesktopError::NotWritable { .. }));
    assert!(!failure.report.changed);
    assert!(failure.report.operations.is_empty());
}
