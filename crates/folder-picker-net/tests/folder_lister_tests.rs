//! Integration tests for the SharePoint folder lister.

use std::time::Duration;

use folder_picker_core::{
    Folder, FolderLister, FolderPicker, PageWindow, PickerConfig, TransportError,
};
use folder_picker_net::http::{RestApiClient, RetryConfig};
use folder_picker_net::sharepoint::{ODATA_NOMETADATA, SpFolderLister};
use folder_picker_net::{SiteConfig, lister_for_environment};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn folders_body(paths: &[&str]) -> serde_json::Value {
    let value: Vec<_> = paths
        .iter()
        .map(|p| {
            json!({
                "Name": p.rsplit('/').next().unwrap_or_default(),
                "ServerRelativeUrl": p,
            })
        })
        .collect();
    json!({ "value": value })
}

fn lister_without_retry(server: &MockServer) -> SpFolderLister {
    let client = RestApiClient::builder(format!("{}/sites/a", server.uri()))
        .accept(ODATA_NOMETADATA)
        .retry(RetryConfig::none())
        .build()
        .expect("Failed to build client");
    SpFolderLister::with_client(client)
}

#[tokio::test]
async fn test_root_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites/a/_api/web/folders"))
        .and(query_param("$select", "Name,ServerRelativeUrl"))
        .and(query_param("$orderBy", "Name"))
        .and(query_param("$top", "6"))
        .and(query_param("$skip", "0"))
        .and(header("accept", ODATA_NOMETADATA))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(folders_body(&["/sites/a/Documents", "/sites/a/Lists"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let lister = SpFolderLister::new(&format!("{}/sites/a", server.uri())).unwrap();
    let page = lister.list("", PageWindow::new(0, 6)).await.unwrap();

    assert_eq!(
        page,
        vec![
            Folder::new("Documents", "/sites/a/Documents"),
            Folder::new("Lists", "/sites/a/Lists"),
        ]
    );
}

#[tokio::test]
async fn test_subfolder_listing_second_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites/a/_api/web/GetFolderByServerRelativeUrl('/sites/a')/folders"))
        .and(query_param("$top", "6"))
        .and(query_param("$skip", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folders_body(&["/sites/a/f6"])))
        .expect(1)
        .mount(&server)
        .await;

    let lister = lister_without_retry(&server);
    let page = lister.list("/sites/a", PageWindow::new(1, 6)).await.unwrap();
    assert_eq!(page, vec![Folder::new("f6", "/sites/a/f6")]);
}

#[tokio::test]
async fn test_quotes_are_doubled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/sites/a/_api/web/GetFolderByServerRelativeUrl('/sites/a/Bob''s')/folders",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(folders_body(&[])))
        .expect(1)
        .mount(&server)
        .await;

    let lister = lister_without_retry(&server);
    let page = lister.list("/sites/a/Bob's", PageWindow::new(0, 6)).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_missing_folder_is_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("File Not Found."))
        .mount(&server)
        .await;

    let lister = lister_without_retry(&server);
    let page = lister.list("/sites/a/gone", PageWindow::new(0, 6)).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Something broke"))
        .expect(1)
        .mount(&server)
        .await;

    let lister = lister_without_retry(&server);
    let err = lister.list("/sites/a", PageWindow::new(0, 6)).await.unwrap_err();
    assert_eq!(
        err,
        TransportError::Status {
            status: 500,
            message: Some("Something broke".into())
        }
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let lister = lister_without_retry(&server);
    let err = lister.list("", PageWindow::new(0, 6)).await.unwrap_err();
    assert!(matches!(err, TransportError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_throttled_request_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(folders_body(&["/sites/a/x"])))
        .mount(&server)
        .await;

    let client = RestApiClient::builder(format!("{}/sites/a", server.uri()))
        .accept(ODATA_NOMETADATA)
        .retry(RetryConfig {
            max_retries: 2,
            initial_delay_ms: 10,
            ..RetryConfig::default()
        })
        .build()
        .unwrap();
    let lister = SpFolderLister::with_client(client);

    let page = lister.list("", PageWindow::new(0, 6)).await.unwrap();
    assert_eq!(page.len(), 1);
    let rate_limit = lister.client().last_rate_limit().unwrap();
    assert_eq!(rate_limit.retry_after, Some(Duration::ZERO));
}

#[tokio::test]
async fn test_site_config_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer secret"))
        .and(header("accept", ODATA_NOMETADATA))
        .respond_with(ResponseTemplate::new(200).set_body_json(folders_body(&["/sites/a/x"])))
        .expect(1)
        .mount(&server)
        .await;

    let site = SiteConfig::sharepoint(format!("{}/sites/a", server.uri()))
        .with_access_token("secret")
        .with_retry(RetryConfig::none());
    let lister = lister_for_environment(&site).unwrap();
    let page = lister.list("", PageWindow::new(0, 6)).await.unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_picker_browses_remote_folders() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites/a/_api/web/GetFolderByServerRelativeUrl('/sites/a')/folders"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(folders_body(&["/sites/a/Documents", "/sites/a/Shared"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/sites/a/_api/web/GetFolderByServerRelativeUrl('/sites/a/Documents')/folders",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(folders_body(&[
            "/sites/a/Documents/Reports",
        ])))
        .mount(&server)
        .await;

    let site = SiteConfig::sharepoint(format!("{}/sites/a", server.uri()))
        .with_retry(RetryConfig::none());
    let config = PickerConfig::new("folder")
        .with_base_folder("/sites/a")
        .with_web_server_relative_url(site.web_server_relative_url().unwrap());
    let picker = FolderPicker::builder(config)
        .shared_lister(lister_for_environment(&site).unwrap())
        .build()
        .unwrap();

    picker.open();
    wait_until_loaded(&picker).await;
    assert_eq!(picker.state().items.len(), 2);

    picker.navigate_into("/sites/a/Documents");
    wait_until_loaded(&picker).await;
    let state = picker.state();
    assert_eq!(state.current_path, "/sites/a/Documents");
    assert_eq!(state.items, vec![Folder::new("Reports", "/sites/a/Documents/Reports")]);
    assert!(picker.can_navigate_up());
}

async fn wait_until_loaded(picker: &FolderPicker) {
    for _ in 0..200 {
        if !picker.state().is_loading {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("folder page did not load");
}
