//! AuthnRequest scenarios.

use std::collections::HashSet;

use saml_integration_tests::{authn_request_descriptor, init_tracing};
use saml_message::bindings::redirect;
use saml_message::{
    build_authn_request, decode_authn_request, encode_authn_request, generator,
    AuthnRequestDescriptor, ErrorKind, NameIdFormat, ParsedDocument,
};

#[tokio::test]
async fn encode_decode_roundtrip() -> anyhow::Result<()> {
    init_tracing();
    let descriptor = authn_request_descriptor();

    let encoded = encode_authn_request(&descriptor).await?;
    let document = decode_authn_request(&encoded).await?;
    let request = document.authn_request()?;

    assert_eq!(document.issuer().as_deref(), Some("https://sp.example"));
    assert_eq!(request.issuer, descriptor.issuer);
    assert_eq!(request.destination.as_deref(), Some(descriptor.destination.as_str()));
    assert_eq!(
        request.assertion_consumer_service_url.as_deref(),
        Some(descriptor.assertion_consumer_service_url.as_str())
    );
    assert_eq!(request.version, "2.0");

    let policy = request.name_id_policy.expect("NameIDPolicy present");
    assert!(policy.allow_create);
    assert_eq!(policy.parsed_format(), Some(NameIdFormat::Persistent));

    let age = generator::now() - request.issue_instant;
    assert!(age.num_seconds() >= 0 && age.num_seconds() < 60);
    Ok(())
}

#[tokio::test]
async fn encoded_form_is_minified() -> anyhow::Result<()> {
    let encoded = encode_authn_request(&authn_request_descriptor()).await?;
    let xml = redirect::decode(&encoded)?;

    assert!(!xml.contains('\n'));
    assert!(!xml.contains("> <"));
    assert!(xml.starts_with("<samlp:AuthnRequest AssertionConsumerServiceURL="));
    Ok(())
}

#[tokio::test]
async fn build_matches_encoded_content() -> anyhow::Result<()> {
    let xml = build_authn_request(&authn_request_descriptor()).await?;
    let built = ParsedDocument::parse(&xml)?.authn_request()?;

    let decoded = decode_authn_request(&encode_authn_request(&authn_request_descriptor()).await?)
        .await?
        .authn_request()?;

    assert_ne!(built.id, decoded.id);
    assert_eq!(built.issuer, decoded.issuer);
    assert_eq!(built.destination, decoded.destination);
    Ok(())
}

#[tokio::test]
async fn descriptor_loaded_from_json() -> anyhow::Result<()> {
    let descriptor: AuthnRequestDescriptor = serde_json::from_value(serde_json::json!({
        "Issuer": "https://sp.example",
        "Destination": "https://idp.example/sso",
        "AssertionConsumerServiceURL": "https://sp.example/acs",
    }))?;

    let document = decode_authn_request(&encode_authn_request(&descriptor).await?).await?;
    assert_eq!(document.issuer().as_deref(), Some("https://sp.example"));
    Ok(())
}

#[tokio::test]
async fn empty_field_is_malformed_input() {
    let mut descriptor = authn_request_descriptor();
    descriptor.destination.clear();

    let err = build_authn_request(&descriptor).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert!(err.to_string().contains("Destination"));
}

#[tokio::test]
async fn corrupt_input_is_classified() {
    let bad_base64 = decode_authn_request("!!not-base64!!").await.unwrap_err();
    assert_eq!(bad_base64.kind(), ErrorKind::Encoding);

    // 0x07 opens a DEFLATE block of the reserved type
    let not_deflate = saml_message::bindings::post::encode("\u{7}\u{7}\u{7}\u{7}");
    let err = decode_authn_request(&not_deflate).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);

    let truncated = redirect::encode("<samlp:AuthnRequest xmlns:samlp=\"urn:p\">")
        .expect("deflate");
    let err = decode_authn_request(&truncated).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn concurrent_requests_get_distinct_ids() -> anyhow::Result<()> {
    let tasks: Vec<_> = (0..32)
        .map(|_| tokio::spawn(async { encode_authn_request(&authn_request_descriptor()).await }))
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        let encoded = task.await??;
        let request = decode_authn_request(&encoded).await?.authn_request()?;
        assert!(ids.insert(request.id));
    }
    assert_eq!(ids.len(), 32);
    Ok(())
}

#[test]
fn ten_thousand_unique_identifiers() {
    let ids: HashSet<String> = (0..10_000).map(|_| generator::new_id()).collect();
    assert_eq!(ids.len(), 10_000);
    assert!(ids.iter().all(|id| id.starts_with('_')));
}
