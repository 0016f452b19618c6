//! Signature verification: tampering, key mismatch and wrapping.

use saml_integration_tests::{response_descriptor, IDP_CERT, OTHER_CERT};
use saml_message::bindings::post;
use saml_message::xml::{canonicalize, parse, render, scope_at, Node, NamespaceScope};
use saml_message::{
    build_response, decode_response, verify_response, ErrorKind, ParsedDocument, VerificationIssue,
};

use crate::common::{rejection, signed_response, tamper_attr, tamper_text};

#[tokio::test]
async fn verification_is_idempotent() -> anyhow::Result<()> {
    let document = signed_response().await?;

    let first = verify_response(document.clone(), IDP_CERT).await?;
    let second = verify_response(document.clone(), IDP_CERT).await?;
    assert_eq!(first, second);
    assert_eq!(first, document);
    Ok(())
}

#[tokio::test]
async fn tampered_subject_is_rejected() -> anyhow::Result<()> {
    let document = signed_response().await?;
    let issues = rejection(tamper_text(&document, "NameID")?).await?;
    assert_eq!(issues, [VerificationIssue::DigestMismatch]);
    Ok(())
}

#[tokio::test]
async fn tampered_conditions_are_rejected() -> anyhow::Result<()> {
    let document = signed_response().await?;

    let issues = rejection(tamper_text(&document, "Audience")?).await?;
    assert_eq!(issues, [VerificationIssue::DigestMismatch]);

    let issues = rejection(tamper_attr(
        &document,
        "Conditions",
        "NotOnOrAfter",
        "2999-01-01T00:00:00.000Z",
    )?)
    .await?;
    assert_eq!(issues, [VerificationIssue::DigestMismatch]);
    Ok(())
}

#[tokio::test]
async fn tampered_attribute_is_rejected() -> anyhow::Result<()> {
    let document = signed_response().await?;

    let issues = rejection(tamper_text(&document, "AttributeValue")?).await?;
    assert_eq!(issues, [VerificationIssue::DigestMismatch]);

    let issues = rejection(tamper_attr(&document, "Attribute", "Name", "rolf")?).await?;
    assert_eq!(issues, [VerificationIssue::DigestMismatch]);
    Ok(())
}

#[tokio::test]
async fn tampering_in_transit_is_rejected() -> anyhow::Result<()> {
    let document = signed_response().await?;
    let xml = document.to_xml()?.replace(">admin<", ">root!<");
    let document = decode_response(&post::encode(&xml)).await?;

    let err = verify_response(document, IDP_CERT).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
    assert!(err.to_string().contains("digest"));
    Ok(())
}

#[tokio::test]
async fn tampered_signed_info_is_rejected() -> anyhow::Result<()> {
    let document = signed_response().await?;
    let issues = rejection(tamper_text(&document, "DigestValue")?).await?;

    assert!(issues.contains(&VerificationIssue::DigestMismatch));
    assert!(issues.contains(&VerificationIssue::SignatureMismatch));
    Ok(())
}

#[tokio::test]
async fn unrelated_certificate_is_rejected() -> anyhow::Result<()> {
    let document = signed_response().await?;
    let err = verify_response(document, OTHER_CERT).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
    assert_eq!(err.issues(), [VerificationIssue::SignatureMismatch]);
    assert!(err.to_string().contains("signature value"));
    Ok(())
}

#[tokio::test]
async fn bare_certificate_body_is_accepted() -> anyhow::Result<()> {
    let body: String = IDP_CERT
        .lines()
        .filter(|line| !line.starts_with("-----"))
        .collect();
    verify_response(signed_response().await?, &body).await?;
    Ok(())
}

#[tokio::test]
async fn unparsable_certificate_is_malformed_input() -> anyhow::Result<()> {
    let err = verify_response(signed_response().await?, "not a certificate")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    Ok(())
}

#[tokio::test]
async fn stripped_signature_is_rejected() -> anyhow::Result<()> {
    let mut root = signed_response().await?.into_root();
    let assertion_path = root.find_path("Assertion").expect("Assertion");
    let assertion = root.at_path_mut(&assertion_path).expect("Assertion");
    assertion
        .children
        .retain(|node| !matches!(node, Node::Element(el) if el.local_name() == "Signature"));

    let issues = rejection(ParsedDocument::new(root)).await?;
    assert_eq!(issues, [VerificationIssue::MissingSignature]);
    Ok(())
}

#[tokio::test]
async fn weaker_algorithm_is_rejected() -> anyhow::Result<()> {
    let document = signed_response().await?;
    let sha1 = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";
    let issues = rejection(tamper_attr(&document, "SignatureMethod", "Algorithm", sha1)?).await?;
    assert_eq!(issues, [VerificationIssue::UnsupportedAlgorithm(sha1.to_string())]);
    Ok(())
}

#[tokio::test]
async fn injected_assertion_is_rejected() -> anyhow::Result<()> {
    let document = signed_response().await?;
    let signed_assertion = document.find("Assertion").expect("Assertion").clone();

    // forged unsigned copy placed ahead of the genuine one
    let mut forged = signed_assertion.clone();
    forged
        .children
        .retain(|node| !matches!(node, Node::Element(el) if el.local_name() == "Signature"));

    let mut root = document.into_root();
    let index = root
        .children
        .iter()
        .position(|node| matches!(node, Node::Element(el) if el.local_name() == "Assertion"))
        .expect("Assertion index");
    root.children.insert(index, Node::Element(forged));

    let issues = rejection(ParsedDocument::new(root)).await?;
    assert!(issues.contains(&VerificationIssue::MultipleAssertions(2)));
    assert!(issues.contains(&VerificationIssue::DuplicateId(
        signed_assertion.attr("ID").expect("ID").to_string()
    )));
    Ok(())
}

#[tokio::test]
async fn content_wrapped_in_foreign_signature_element_is_rejected() -> anyhow::Result<()> {
    let xml = signed_response().await?.to_xml()?.replace(
        "</saml:Assertion>",
        r#"<evil:Signature xmlns:evil="urn:evil"><saml:Attribute Name="role"><saml:AttributeValue>superadmin</saml:AttributeValue></saml:Attribute></evil:Signature></saml:Assertion>"#,
    );
    let document = decode_response(&post::encode(&xml)).await?;

    let err = verify_response(document, IDP_CERT).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SignatureInvalid);
    assert_eq!(err.issues(), [VerificationIssue::DigestMismatch]);
    Ok(())
}

#[tokio::test]
async fn unsigned_assertion_with_foreign_signature_element_is_unsigned() -> anyhow::Result<()> {
    let mut root = signed_response().await?.into_root();
    let assertion_path = root.find_path("Assertion").expect("Assertion");
    let assertion = root.at_path_mut(&assertion_path).expect("Assertion");
    for node in &mut assertion.children {
        if let Node::Element(el) = node {
            if el.local_name() == "Signature" {
                el.name = "evil:Signature".to_string();
                el.attributes.push(("xmlns:evil".to_string(), "urn:evil".to_string()));
            }
        }
    }
    let document = ParsedDocument::parse(&render(&root)?)?;

    assert!(!document.response()?.assertions[0].signed);
    assert_eq!(rejection(document).await?, [VerificationIssue::MissingSignature]);
    Ok(())
}

#[tokio::test]
async fn line_endings_rewritten_in_transit_still_verify() -> anyhow::Result<()> {
    let mut descriptor = response_descriptor();
    descriptor.attributes.insert("address", "line1\nline2");
    let xml = build_response(&descriptor).await?;
    assert!(xml.contains("line1\nline2"));

    let document = decode_response(&post::encode(&xml.replace('\n', "\r\n"))).await?;
    let verified = verify_response(document, IDP_CERT).await?;
    assert_eq!(
        verified.response()?.assertions[0].attribute("address"),
        Some("line1\nline2")
    );
    Ok(())
}

#[tokio::test]
async fn signature_survives_changes_outside_the_assertion() -> anyhow::Result<()> {
    let document = signed_response().await?;

    // unused namespace declaration and pretty-printing on the envelope
    let mut root = document.into_root();
    root.attributes.push(("xmlns:unused".to_string(), "urn:unused".to_string()));
    root.children.insert(0, Node::Text("\n  ".to_string()));
    root.children.push(Node::Text("\n".to_string()));

    let reparsed = ParsedDocument::parse(&render(&root)?)?;
    verify_response(reparsed, IDP_CERT).await?;
    Ok(())
}

#[tokio::test]
async fn whitespace_inside_the_assertion_breaks_the_digest() -> anyhow::Result<()> {
    let mut root = signed_response().await?.into_root();
    let path = root.find_path("Subject").expect("Subject");
    root.at_path_mut(&path)
        .expect("Subject")
        .children
        .insert(0, Node::Text(" ".to_string()));

    let issues = rejection(ParsedDocument::new(root)).await?;
    assert_eq!(issues, [VerificationIssue::DigestMismatch]);
    Ok(())
}

#[test]
fn canonical_form_is_independent_of_prefix_placement() -> anyhow::Result<()> {
    let declared_on_root = parse(
        r#"<r xmlns:a="urn:a" xmlns:b="urn:b"><a:x b:k="1" a:j="2">t</a:x></r>"#,
    )?;
    let declared_inline = parse(r#"<a:x xmlns:a="urn:a" xmlns:b="urn:b" a:j="2" b:k="1">t</a:x>"#)?;

    let in_context = canonicalize(
        declared_on_root.at_path(&[0]).expect("child"),
        &scope_at(&declared_on_root, &[0])?,
    )?;
    let standalone = canonicalize(&declared_inline, &NamespaceScope::new())?;

    assert_eq!(in_context, standalone);
    assert_eq!(
        standalone,
        r#"<a:x xmlns:a="urn:a" xmlns:b="urn:b" a:j="2" b:k="1">t</a:x>"#
    );
    Ok(())
}
