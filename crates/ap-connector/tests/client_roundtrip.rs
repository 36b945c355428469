//! Client tests against a throwaway local HTTP responder

use ap_connector::{AUTH_HEADER, ConnectionConfig, ConnectorError, DeviceClient, GroupLink};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accept one connection, capture the raw request, reply with `status` / `body`
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            if request_complete(&raw) {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&raw).into_owned()
    });

    (format!("http://{addr}/api/ARA"), handle)
}

/// Headers received and, if a Content-Length was sent, the whole body
fn request_complete(raw: &[u8]) -> bool {
    let text = String::from_utf8_lossy(raw);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    raw.len() >= header_end + 4 + content_length
}

fn body_of(request: &str) -> serde_json::Value {
    let (_, body) = request.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_system_status_normalizes_casing() {
    let (url, server) = serve_once(
        "200 OK",
        concat!(
            r#"{"devices":[{"UniqueID":"A1","name":"Left","isOnline":true},"#,
            r#"{"uniqueId":"B2","IsOnline":false}]}"#
        ),
    )
    .await;
    let client = DeviceClient::new(ConnectionConfig::new(url).with_token("secret")).unwrap();

    let status = client.system_status().await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("GET /api/ARA/GetSystemStatus"));
    let auth_line = format!("{}: secret", AUTH_HEADER.to_ascii_lowercase());
    assert!(request.to_ascii_lowercase().contains(&auth_line));
    assert_eq!(status.devices.len(), 2);
    assert_eq!(status.devices[0].unique_id, "A1");
    assert_eq!(status.devices[1].unique_id, "B2");
    assert_eq!(status.online().count(), 1);
}

#[tokio::test]
async fn test_output_fir_request() {
    let (url, server) = serve_once("200 OK", "").await;
    let client = DeviceClient::new(ConnectionConfig::new(url)).unwrap();

    client
        .set_output_eq_fir("A1", 2, &[0.25, -0.5, 0.25])
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("POST /api/ARA/SetOutputEqFIR"));
    assert!(!request.to_ascii_lowercase().contains("authclienttoken"));
    assert_eq!(
        body_of(&request),
        serde_json::json!({ "UniqueID": "A1", "Channel": "2", "Values": ["0.25", "-0.5", "0.25"] })
    );
}

#[tokio::test]
async fn test_group_guid() {
    let (url, server) = serve_once("200 OK", r#"{"Guid":"7f1c"}"#).await;
    let client = DeviceClient::new(ConnectionConfig::new(url)).unwrap();

    let guid = client
        .create_and_assign_group(vec![GroupLink::new("A1", 0), GroupLink::new("B2", 1)])
        .await
        .unwrap();
    let request = server.await.unwrap();

    assert_eq!(guid.as_deref(), Some("7f1c"));
    assert_eq!(body_of(&request)["GroupLinks"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_error_status_surfaces() {
    let (url, server) = serve_once("401 Unauthorized", r#"{"error":"bad token"}"#).await;
    let client = DeviceClient::new(ConnectionConfig::new(url)).unwrap();

    let err = client.set_output_eq_gain("A1", 0, -3.0).await.unwrap_err();
    server.await.unwrap();

    match err {
        ConnectorError::Status { endpoint, status, body } => {
            assert_eq!(endpoint, "SetOutputEqGain");
            assert_eq!(status, 401);
            assert!(body.contains("bad token"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_too_many_taps_is_refused_locally() {
    let client = DeviceClient::new(ConnectionConfig::default()).unwrap();
    let err = client
        .set_speaker_eq_fir("A1", 0, &vec![0.0; 3000])
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectorError::TooManyTaps { taps: 3000, .. }));
}
