//! End-to-end tests: host `Vm` connected to the simulated embedded VM
//!
//! Every test performs the real init handshake over a control port and then
//! drives commands through the correlation engine.

use std::time::Duration;

use futures::future::join_all;
use serde_json::{Value, json};
use vmlink::domain::{FsDiff, Project, ProjectOptions, ProjectTemplate, UiTheme};
use vmlink::error::{Result, VmError};
use vmlink::protocol::{Commands, Payload};
use vmlink::{
    ConnectConfig, EmbeddedEndpoint, EndpointConfig, EndpointHandle, Port, RdcConfig, RootDispatcher, Transfer, Vm,
    connect, message_channel,
};

struct Session {
    vm: Vm,
    endpoint: EndpointHandle,
    _control: Port<Transfer>,
}

async fn session_with(project: Project, rdc: RdcConfig, endpoint_config: EndpointConfig) -> Result<Session> {
    let dispatcher = RootDispatcher::new(project, &ProjectOptions::default(), &endpoint_config.preview_origin);
    let (mut control, remote) = message_channel::<Transfer>();
    let endpoint = EmbeddedEndpoint::spawn(remote, dispatcher, &endpoint_config);
    let vm = connect(&mut control, &ConnectConfig::default(), rdc).await?;
    Ok(Session {
        vm,
        endpoint,
        _control: control,
    })
}

async fn session(project: Project) -> Result<Session> {
    session_with(project, RdcConfig::default(), EndpointConfig::default()).await
}

fn test_project() -> Project {
    Project::new("Test Project", ProjectTemplate::Javascript)
        .with_file("index.js", "console.log('hi');\n")
        .with_file("README.md", "# Test\n")
        .with_file("package.json", r#"{"dependencies": {"cowsay": "1.5.0"}}"#)
        .with_dependency("cowsay", "1.5.0")
}

fn payload(value: Value) -> Payload {
    value.as_object().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_handshake_reports_preview_origin() -> Result<()> {
    let s = session(test_project()).await?;
    assert_eq!(s.vm.preview().origin(), Some("http://localhost:8080"));
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_handshake_node_has_no_origin() -> Result<()> {
    let s = session(Project::new("Node", ProjectTemplate::Node)).await?;
    assert_eq!(s.vm.preview().origin(), None);

    let err = s.vm.preview().get_url().await.unwrap_err();
    assert_eq!(err.to_string(), "SDK_GET_PREVIEW_URL_FAILURE: No preview URL found");
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_fs_diff_then_snapshot() -> Result<()> {
    let s = session(Project::new("Empty", ProjectTemplate::Html)).await?;
    assert_eq!(s.vm.get_fs_snapshot().await?, None);

    s.vm.apply_fs_diff(&FsDiff::new().create("a", "1")).await?;
    let files = s.vm.get_fs_snapshot().await?.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files["a"], "1");

    s.vm.apply_fs_diff(&FsDiff::new().destroy("a")).await?;
    assert_eq!(s.vm.get_fs_snapshot().await?, None);

    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_malformed_diff_never_reaches_channel() -> Result<()> {
    let s = session(test_project()).await?;
    let err = s
        .vm
        .apply_fs_diff_value(&json!({"create": [], "destroy": []}))
        .await
        .unwrap_err();
    assert!(matches!(err, VmError::Validation(_)));
    assert_eq!(s.vm.rdc().pending_count(), 0);
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_open_file_filters_missing_panes() -> Result<()> {
    let project = Project::new("P", ProjectTemplate::Javascript).with_file("index.js", "1");
    let s = session(project).await?;

    s.vm.editor()
        .open_file(vec!["index.js,missing.txt", "missing2.txt"])
        .await?;

    let err = s.vm.editor().open_file("missing.txt").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "SDK_OPEN_FILE_FAILURE: No file found for: 'missing.txt'"
    );
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_set_current_file() -> Result<()> {
    let s = session(test_project()).await?;
    s.vm.editor().set_current_file("README.md").await?;
    let err = s.vm.editor().set_current_file(".gitignore").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "SDK_SET_CURRENT_FILE_FAILURE: File not found: '.gitignore'"
    );
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_preview_url_normalization() -> Result<()> {
    let s = session(test_project()).await?;

    // Raw request: the façade would refuse a path without a leading slash
    s.vm.rdc()
        .request(Commands::SET_PREVIEW_URL, payload(json!({"path": "about/us"})))
        .await?;
    assert_eq!(s.vm.preview().get_url().await?, "http://localhost:8080/about/us");

    s.vm.preview().set_url("/contact#team").await?;
    assert_eq!(s.vm.preview().get_url().await?, "http://localhost:8080/contact");

    s.vm.preview().set_url("/search?q=1").await?;
    assert_eq!(s.vm.preview().get_url().await?, "http://localhost:8080/search");

    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_set_preview_on_node_without_server() -> Result<()> {
    let s = session(Project::new("Node", ProjectTemplate::Node)).await?;
    let err = s.vm.preview().set_url("/about").await.unwrap_err();
    assert_eq!(err.to_string(), "SDK_SET_PREVIEW_URL_FAILURE: Server not running");
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_unknown_theme_succeeds_without_change() -> Result<()> {
    let s = session(test_project()).await?;
    let result = s
        .vm
        .rdc()
        .request(Commands::SET_UI_THEME, payload(json!({"theme": "neon"})))
        .await?;
    assert_eq!(result, None);

    s.vm.editor().set_theme(UiTheme::Dark).await?;
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_dependencies() -> Result<()> {
    let s = session(test_project()).await?;
    let deps = s.vm.get_dependencies().await?.unwrap();
    assert!(deps.contains_key("cowsay"));
    s.endpoint.shutdown().await;

    let node = Project::new("Node", ProjectTemplate::Node)
        .with_file("package.json", r#"{"dependencies": {"a": "1.0.0"}, "devDependencies": {"b": "2.0.0"}}"#);
    let s = session(node).await?;
    let deps = s.vm.get_dependencies().await?.unwrap();
    assert_eq!(deps["a"], "1.0.0");
    assert_eq!(deps["b"], "2.0.0");
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_unknown_command_not_implemented() -> Result<()> {
    let s = session(test_project()).await?;
    let err = s.vm.rdc().request("SDK_REBOOT", Payload::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "SDK_REBOOT_FAILURE: NOT IMPLEMENTED");
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_injected_failure_surfaces_as_timeout() -> Result<()> {
    let s = session_with(
        test_project(),
        RdcConfig::with_timeout(Duration::from_millis(100)),
        EndpointConfig::default(),
    )
    .await?;
    s.endpoint.fail_command(Commands::GET_FS_SNAPSHOT)?;

    let err = s.vm.get_fs_snapshot().await.unwrap_err();
    assert!(err.is_timeout());
    assert_eq!(s.vm.rdc().pending_count(), 0);

    // Other commands are unaffected
    assert_eq!(s.vm.preview().get_url().await?, "http://localhost:8080/");
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_concurrent_requests_with_delay() -> Result<()> {
    let s = session_with(
        test_project(),
        RdcConfig::default(),
        EndpointConfig::default().with_response_delay(Duration::from_millis(20)),
    )
    .await?;

    let views = ["default", "editor", "preview"];
    let calls = (0..30).map(|i| {
        let view = views[i % views.len()];
        s.vm.rdc().request(Commands::SET_UI_VIEW, payload(json!({"view": view})))
    });
    let results = join_all(calls).await;

    assert_eq!(results.len(), 30);
    assert!(results.iter().all(|r| matches!(r, Ok(None))));
    assert_eq!(s.vm.rdc().pending_count(), 0);
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_close_fails_later_calls() -> Result<()> {
    let s = session(test_project()).await?;
    s.vm.close();
    let err = s.vm.get_fs_snapshot().await.unwrap_err();
    assert!(matches!(err, VmError::ChannelClosed(_)));
    s.endpoint.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_endpoint_shutdown_fails_pending_calls() -> Result<()> {
    let Session { vm, endpoint, _control } = session(test_project()).await?;
    endpoint.fail_command(Commands::GET_FS_SNAPSHOT)?;

    let call = tokio::spawn(async move { vm.get_fs_snapshot().await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    endpoint.shutdown().await;

    let err = call.await.unwrap().unwrap_err();
    assert!(matches!(err, VmError::ChannelClosed(_)));
    Ok(())
}
