use capsule::gemini::request::{ClientIdentity, InputError, Request};
use url::Url;

fn request(url: &str) -> Request {
    Request::from_url(Url::parse(url).unwrap()).unwrap()
}

#[test]
fn test_input_decodes_escapes() {
    let req = request("gemini://example.com/search?rust%20gemini");

    assert_eq!(req.input().unwrap(), "rust gemini");
}

#[test]
fn test_input_treats_plus_as_space() {
    let req = request("gemini://example.com/search?rust+gemini");

    assert_eq!(req.input().unwrap(), "rust gemini");
}

#[test]
fn test_input_keeps_escaped_plus() {
    let req = request("gemini://example.com/search?c%2B%2B");

    assert_eq!(req.input().unwrap(), "c++");
}

#[test]
fn test_input_empty_without_query() {
    let req = request("gemini://example.com/search");

    assert_eq!(req.input().unwrap(), "");
}

#[test]
fn test_input_rejects_invalid_utf8() {
    let req = request("gemini://example.com/search?%FF%FE");

    assert!(matches!(req.input(), Err(InputError::InvalidEncoding(_))));
}

#[test]
fn test_input_rejects_malformed_escapes() {
    for query in ["rust%zz", "rust%4", "100%", "%g1"] {
        let req = request(&format!("gemini://example.com/search?{query}"));

        assert!(
            matches!(req.input(), Err(InputError::InvalidEscape)),
            "{query} should be rejected"
        );
    }
}

#[test]
fn test_input_accepts_mixed_case_hex() {
    let req = request("gemini://example.com/search?caf%c3%A9");

    assert_eq!(req.input().unwrap(), "café");
}

#[test]
fn test_common_name_from_client() {
    let req = request("gemini://example.com/_admin")
        .with_client(Some(ClientIdentity::new("admin@example")));

    assert_eq!(req.common_name(), Some("admin@example"));
}

#[test]
fn test_common_name_absent() {
    let anonymous = request("gemini://example.com/");
    let nameless = request("gemini://example.com/").with_client(Some(ClientIdentity {
        common_name: None,
    }));

    assert_eq!(anonymous.common_name(), None);
    assert_eq!(nameless.common_name(), None);
}

#[test]
fn test_from_url_rejects_undecodable_path() {
    let url = Url::parse("gemini://example.com/%C3%28").unwrap();

    assert!(Request::from_url(url).is_none());
}
