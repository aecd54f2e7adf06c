//! Host-does-IO round trip against the live mock server.
//!
//! # Design
//! Drives `build_submit` / `parse_submit` through a blocking ureq agent
//! instead of a `Transport`, the way a host with its own HTTP stack would.

use merge_client::{
    EndpointTarget, FilePart, FormPayload, HttpRequest, HttpResponse, MergeReply,
    MergeRequestClient,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's status-code-as-error behavior so 4xx/5xx responses come
/// back as data and the client decides what they mean. Relative targets are
/// resolved against `origin`.
fn execute(origin: &str, req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let url = if req.url.starts_with('/') {
        format!("{origin}{}", req.url)
    } else {
        req.url.clone()
    };
    let mut builder = agent.post(&url);
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let mut response = builder.send(&req.body[..]).expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

#[test]
fn build_execute_parse_lifecycle() {
    // Step 1: start mock server on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_merge_server::run(listener).await
        })
        .unwrap();
    });

    // Building drains reqwest's multipart stream, so it needs an executor.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let origin = format!("http://{addr}");
    let client = MergeRequestClient::new();
    let form = FormPayload::merge_files(
        FilePart::new("web.xlsx", b"web".to_vec()),
        FilePart::new("bitrix.xlsx", b"bitrix".to_vec()),
    );

    // Step 2: fixed target merges successfully.
    let req = rt
        .block_on(client.build_submit(&form, &EndpointTarget::Fixed))
        .unwrap();
    let value = client.parse_submit(execute(&origin, req)).unwrap().unwrap();
    assert!(MergeReply::from_value(value).unwrap().is_success());

    // Step 3: a non-2xx status gives no result.
    let target = EndpointTarget::base_url(format!("{origin}/status/500"));
    let req = rt.block_on(client.build_submit(&form, &target)).unwrap();
    assert!(client.parse_submit(execute(&origin, req)).unwrap().is_none());

    // Step 4: the checked variant reports the same status.
    let req = rt.block_on(client.build_submit(&form, &target)).unwrap();
    let err = client.parse_submit_checked(execute(&origin, req)).unwrap_err();
    assert!(matches!(
        err,
        merge_client::ApiError::HttpStatus { status: 500, .. }
    ));
}
