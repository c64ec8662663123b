pub(crate) mod mock;

use mock::project_client::MockProjectClient;
use mock::shareable::{Call, MockShareable};
use mock::{init_logger, OWNER};
use sharing_agent::provider::{ErrorKind, RemoteState};
use sharing_agent::{wait_for_resource, Reconciler};
use sharing_model::{AssignMode, ProjectMeta, ShareMode, SharingSpec};
use std::time::Duration;

fn custom(names: &[&str]) -> SharingSpec {
    SharingSpec::custom(names.iter().map(|n| ProjectMeta::named(*n)).collect())
}

#[tokio::test]
async fn all_with_projects_makes_no_calls() {
    init_logger();
    let target = MockShareable::new(ShareMode::Custom, &["p-qa"]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let spec = SharingSpec {
        enabled: true,
        projects: vec![ProjectMeta::named("qa")],
    };
    let error = reconciler.reconcile(Some(spec)).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(error.remote_state(), RemoteState::Untouched);
    assert_eq!(target.gets(), 0);
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn unknown_project_fails_before_fetch() {
    init_logger();
    let target = MockShareable::new(ShareMode::None, &[]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let error = reconciler
        .reconcile(Some(custom(&["qa", "nope"])))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Resolution);
    assert!(error.to_string().contains("'nope'"), "{}", error);
    assert_eq!(target.gets(), 0);
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn share_with_projects() {
    init_logger();
    let target = MockShareable::new(ShareMode::None, &[]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let status = reconciler
        .reconcile(Some(custom(&["qa", "dev"])))
        .await
        .unwrap();
    assert_eq!(
        target.calls(),
        vec![Call::assign(AssignMode::Custom, &["p-qa", "p-dev"])]
    );
    assert_eq!(status.share_mode, ShareMode::Custom);
    assert_eq!(
        status.projects,
        vec![ProjectMeta::new("p-qa", "qa"), ProjectMeta::new("p-dev", "dev")]
    );
}

#[tokio::test]
async fn owner_is_excluded_and_assign_precedes_unassign() {
    init_logger();
    let target = MockShareable::new(ShareMode::Custom, &["p-dev"]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let status = reconciler
        .reconcile(Some(custom(&["defaultproject", "qa"])))
        .await
        .unwrap();
    assert_eq!(
        target.calls(),
        vec![
            Call::assign(AssignMode::Custom, &["p-qa"]),
            Call::unassign(AssignMode::Custom, &["p-dev"]),
        ]
    );
    assert_eq!(status.projects, vec![ProjectMeta::new("p-qa", "qa")]);
    assert_eq!(target.shared_with(), vec!["p-qa".to_string()]);
}

#[tokio::test]
async fn all_to_custom_unassigns_all_first() {
    init_logger();
    let target = MockShareable::new(ShareMode::All, &[]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let status = reconciler.reconcile(Some(custom(&["qa"]))).await.unwrap();
    assert_eq!(
        target.calls(),
        vec![
            Call::unassign(AssignMode::All, &[]),
            Call::assign(AssignMode::Custom, &["p-qa"]),
        ]
    );
    assert_eq!(status.share_mode, ShareMode::Custom);
    assert_eq!(target.share_mode(), ShareMode::Custom);
}

#[tokio::test]
async fn empty_to_empty_makes_no_calls() {
    init_logger();
    let target = MockShareable::new(ShareMode::None, &[]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let status = reconciler.reconcile(Some(custom(&[]))).await.unwrap();
    assert!(target.calls().is_empty());
    assert_eq!(status.share_mode, ShareMode::None);
    assert!(status.projects.is_empty());
}

#[tokio::test]
async fn second_reconcile_makes_no_calls() {
    init_logger();
    let specs = vec![
        Some(custom(&["qa", "stage"])),
        Some(SharingSpec::all()),
        None,
    ];
    for spec in specs {
        let target = MockShareable::new(ShareMode::Custom, &["p-dev", "p-qa"]);
        let projects = MockProjectClient::new();
        let reconciler = Reconciler::new(&target, &projects, OWNER);

        let first = reconciler.reconcile(spec.clone()).await.unwrap();
        assert!(!target.calls().is_empty(), "{:?}", spec);
        target.clear_calls();
        let second = reconciler.reconcile(spec.clone()).await.unwrap();
        assert!(target.calls().is_empty(), "{:?}: {:?}", spec, target.calls());
        assert_eq!(first, second);
    }
}

#[tokio::test]
async fn share_to_all() {
    init_logger();
    let target = MockShareable::new(ShareMode::Custom, &["p-qa"]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let status = reconciler.reconcile(Some(SharingSpec::all())).await.unwrap();
    assert_eq!(target.calls(), vec![Call::assign(AssignMode::All, &[])]);
    assert!(status.shared_to_all());
    assert!(status.projects.is_empty());
}

#[tokio::test]
async fn reset_releases_management() {
    init_logger();
    let target = MockShareable::new(ShareMode::Custom, &["p-qa"]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let status = reconciler.reconcile(None).await.unwrap();
    assert_eq!(target.calls(), vec![Call::unassign(AssignMode::All, &[])]);
    assert_eq!(target.released(), Some(true));
    assert_eq!(status.share_mode, ShareMode::None);
    assert!(target.shared_with().is_empty());
}

#[tokio::test]
async fn internally_managed_sharing_is_rejected() {
    init_logger();
    let target = MockShareable::new(ShareMode::None, &[]).managed_internally();
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let error = reconciler
        .reconcile(Some(custom(&["qa"])))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert!(error.to_string().contains("managed by the cluster resource itself"));
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn read_keeps_previous_order() {
    init_logger();
    let target = MockShareable::new(ShareMode::Custom, &["p-qa", "p-dev", "p-stage"]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let previous = custom(&["stage", "qa"]);
    let status = reconciler.read(Some(&previous)).await.unwrap();
    let names: Vec<_> = status.projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["stage", "qa", "dev"]);
    assert_eq!(status.share_mode, ShareMode::Custom);
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn unnamed_remote_project_is_skipped_by_read_and_removed_by_reconcile() {
    init_logger();
    let target = MockShareable::new(ShareMode::Custom, &["p-qa", "p-dev"]);
    let projects = MockProjectClient::new();
    projects.break_id("p-dev");
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let status = reconciler.read(None).await.unwrap();
    assert_eq!(status.projects, vec![ProjectMeta::new("p-qa", "qa")]);

    let status = reconciler
        .reconcile(Some(custom(&["qa"])))
        .await
        .unwrap();
    assert_eq!(
        target.calls(),
        vec![Call::unassign(AssignMode::Custom, &["p-dev"])]
    );
    assert_eq!(status.projects, vec![ProjectMeta::new("p-qa", "qa")]);
    assert_eq!(target.shared_with(), vec!["p-qa".to_string()]);
}

#[tokio::test]
async fn delete_always_unassigns() {
    init_logger();
    let target = MockShareable::new(ShareMode::None, &[]);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    reconciler.delete().await.unwrap();
    assert_eq!(target.calls(), vec![Call::unassign(AssignMode::All, &[])]);
    assert_eq!(target.released(), Some(true));
}

#[tokio::test]
async fn missing_resource_is_not_found() {
    init_logger();
    let target = MockShareable::missing();
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);

    let error = reconciler.read(None).await.unwrap_err();
    assert!(error.is_not_found());
    let error = reconciler.delete().await.unwrap_err();
    assert!(error.is_not_found());
    assert!(target.calls().is_empty());
}

#[tokio::test]
async fn failure_reports_remote_state() {
    init_logger();
    let target = MockShareable::new(ShareMode::Custom, &["p-dev"]).fail_at(1);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);
    let error = reconciler
        .reconcile(Some(custom(&["qa"])))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Remote);
    assert_eq!(error.remote_state(), RemoteState::Diverged);
    assert_eq!(target.calls().len(), 2);

    let target = MockShareable::new(ShareMode::Custom, &["p-dev"]).fail_at(0);
    let reconciler = Reconciler::new(&target, &projects, OWNER);
    let error = reconciler
        .reconcile(Some(custom(&["qa"])))
        .await
        .unwrap_err();
    assert_eq!(error.remote_state(), RemoteState::Unknown);
    assert_eq!(target.calls().len(), 1);
}

#[tokio::test]
async fn failed_unassign_from_all_stops_reconcile() {
    init_logger();
    let target = MockShareable::new(ShareMode::All, &[]).fail_at(0);
    let projects = MockProjectClient::new();
    let reconciler = Reconciler::new(&target, &projects, OWNER);
    let error = reconciler
        .reconcile(Some(custom(&["qa"])))
        .await
        .unwrap_err();
    assert_eq!(target.calls(), vec![Call::unassign(AssignMode::All, &[])]);
    assert_eq!(error.kind(), ErrorKind::Remote);
    assert_eq!(error.remote_state(), RemoteState::Unknown);
}

#[tokio::test]
async fn wait_until_resource_exists() {
    init_logger();
    let target = MockShareable::new(ShareMode::None, &[]).exists_after(2);
    let resource = wait_for_resource(&target, Duration::from_millis(1))
        .await
        .unwrap();
    assert_eq!(resource.name, "c1");
    assert_eq!(target.gets(), 3);
}
