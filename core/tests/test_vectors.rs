//! Verify build/parse against JSON test vectors stored in `test-vectors/`.
//!
//! Build cases describe a form, a target and the exact request expected.
//! The boundary is random per encoding, so expected headers and bodies spell
//! it as `{boundary}` and the one actually chosen is substituted in.
//! Parse cases describe a simulated response and the expected outcome.

use merge_client::{
    ApiError, EndpointTarget, FilePart, FormPayload, HttpResponse, MergeRequestClient,
};

fn load_vectors() -> serde_json::Value {
    let raw = include_str!("../../test-vectors/submit.json");
    serde_json::from_str(raw).unwrap()
}

/// Rebuild a `FormPayload` from a vector's entry list.
fn payload_from(case: &serde_json::Value) -> FormPayload {
    let mut form = FormPayload::new();
    for entry in case["entries"].as_array().unwrap() {
        let name = entry["name"].as_str().unwrap();
        form = match entry["kind"].as_str().unwrap() {
            "text" => form.text(name, entry["value"].as_str().unwrap()),
            "file" => form.file(
                name,
                FilePart::new(
                    entry["file_name"].as_str().unwrap(),
                    entry["data"].as_str().unwrap().as_bytes().to_vec(),
                )
                .with_content_type(entry["content_type"].as_str().unwrap()),
            ),
            other => panic!("unknown entry kind: {other}"),
        };
    }
    form
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// The boundary named by a `multipart/form-data` content type.
fn boundary_of(content_type: &str) -> &str {
    content_type
        .strip_prefix("multipart/form-data; boundary=")
        .unwrap_or_else(|| panic!("not a multipart content type: {content_type}"))
}

#[tokio::test]
async fn build_test_vectors() {
    let vectors = load_vectors();
    let client = MergeRequestClient::new();

    for case in vectors["build_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let target: EndpointTarget = serde_json::from_value(case["target"].clone()).unwrap();
        let expected = &case["expected_request"];

        let req = client
            .build_submit(&payload_from(case), &target)
            .await
            .unwrap();
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");

        let boundary = boundary_of(req.header("content-type").unwrap()).to_string();
        let fill = |s: &str| s.replace("{boundary}", &boundary);

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), fill(arr[1].as_str().unwrap()))
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
        assert_eq!(
            String::from_utf8(req.body).unwrap(),
            fill(expected["body"].as_str().unwrap()),
            "{name}: body"
        );
    }
}

// ---------------------------------------------------------------------------
// Parse
// ---------------------------------------------------------------------------

#[test]
fn parse_test_vectors() {
    let vectors = load_vectors();
    let client = MergeRequestClient::new();

    for case in vectors["parse_cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };

        let result = client.parse_submit(response);
        match case["expected_error"].as_str() {
            Some("deserialization") => {
                assert!(
                    matches!(result, Err(ApiError::Deserialization(_))),
                    "{name}: expected deserialization error"
                );
            }
            Some(other) => panic!("{name}: unknown expected_error {other}"),
            None => {
                let value = result.unwrap();
                let expected = &case["expected_result"];
                if expected.is_null() {
                    assert!(value.is_none(), "{name}: expected absent result");
                } else {
                    assert_eq!(value.as_ref(), Some(expected), "{name}: parsed result");
                }
            }
        }
    }
}
