//! JRD link selection
//!
//! Pure selection over a parsed resource descriptor: given the link list
//! and an optional requested type, pick the link to redirect to.

use crate::error::{Result, WebFingerError};
use crate::types::{Link, LookupResult, ResourceDescriptor};

/// WebFinger profile-page link relation
pub const PROFILE_PAGE_REL: &str = "http://webfinger.net/rel/profile-page";
/// Some servers publish the profile-page relation under https
pub const PROFILE_PAGE_REL_HTTPS: &str = "https://webfinger.net/rel/profile-page";
/// Relation of the link pointing at the actor itself
pub const SELF_REL: &str = "self";
/// Link property naming the ActivityStreams type of the linked actor
pub const ACTIVITY_TYPE_PROPERTY: &str = "https://www.w3.org/ns/activitystreams#type";

/// Select the link to redirect to
///
/// With a requested type, only links whose activity-type property matches
/// it (case-insensitively) are considered, in document order; there is no
/// fallback to the profile-page scan when none matches. Without one, the
/// profile-page relation is preferred, then `self`. Those scans run in
/// reverse document order: among duplicate relations the last-listed link
/// wins, matching observed server behavior where the most specific link is
/// appended last. Links without an `href` are skipped.
pub fn select_link(
    descriptor: &ResourceDescriptor,
    requested_type: Option<&str>,
) -> Result<LookupResult> {
    if let Some(wanted) = requested_type.filter(|t| !t.is_empty()) {
        return descriptor
            .links
            .iter()
            .filter(|link| matches_activity_type(link, wanted))
            .find_map(|link| link_result(descriptor, link))
            .ok_or(WebFingerError::NotFound);
    }

    descriptor
        .links
        .iter()
        .rev()
        .filter(|link| link.rel == PROFILE_PAGE_REL || link.rel == PROFILE_PAGE_REL_HTTPS)
        .find_map(|link| link_result(descriptor, link))
        .or_else(|| {
            descriptor
                .links
                .iter()
                .rev()
                .filter(|link| link.rel == SELF_REL)
                .find_map(|link| link_result(descriptor, link))
        })
        .ok_or(WebFingerError::NotFound)
}

fn matches_activity_type(link: &Link, wanted: &str) -> bool {
    match link.properties.get(ACTIVITY_TYPE_PROPERTY) {
        Some(Some(value)) => value.eq_ignore_ascii_case(wanted),
        _ => false,
    }
}

fn link_result(descriptor: &ResourceDescriptor, link: &Link) -> Option<LookupResult> {
    let href = link.href.as_ref()?;
    Some(LookupResult {
        subject: descriptor.subject.clone(),
        href: href.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(json: &str) -> ResourceDescriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_profile_page_preferred_over_self() {
        let d = descriptor(
            r#"{"subject": "acct:a@b", "links": [
                {"rel": "self", "href": "A"},
                {"rel": "http://webfinger.net/rel/profile-page", "href": "B"}
            ]}"#,
        );
        let result = select_link(&d, None).unwrap();
        assert_eq!(result.href, "B");
    }

    #[test]
    fn test_last_duplicate_profile_page_wins() {
        let d = descriptor(
            r#"{"subject": "acct:a@b", "links": [
                {"rel": "http://webfinger.net/rel/profile-page", "href": "A"},
                {"rel": "http://webfinger.net/rel/profile-page", "href": "B"}
            ]}"#,
        );
        let result = select_link(&d, None).unwrap();
        assert_eq!(result.href, "B");
    }

    #[test]
    fn test_https_profile_page_variant_accepted() {
        let d = descriptor(
            r#"{"subject": "acct:a@b", "links": [
                {"rel": "https://webfinger.net/rel/profile-page", "href": "P"}
            ]}"#,
        );
        assert_eq!(select_link(&d, None).unwrap().href, "P");
    }

    #[test]
    fn test_falls_back_to_self() {
        let d = descriptor(
            r#"{"subject": "acct:a@b", "links": [
                {"rel": "self", "href": "S"},
                {"rel": "http://ostatus.org/schema/1.0/subscribe", "template": "T"}
            ]}"#,
        );
        assert_eq!(select_link(&d, None).unwrap().href, "S");
    }

    #[test]
    fn test_no_links_is_not_found() {
        let d = descriptor(r#"{"subject": "acct:a@b"}"#);
        assert!(matches!(
            select_link(&d, None),
            Err(WebFingerError::NotFound)
        ));
    }

    #[test]
    fn test_profile_page_without_href_is_skipped() {
        let d = descriptor(
            r#"{"subject": "acct:a@b", "links": [
                {"rel": "http://webfinger.net/rel/profile-page", "href": "A"},
                {"rel": "http://webfinger.net/rel/profile-page"}
            ]}"#,
        );
        assert_eq!(select_link(&d, None).unwrap().href, "A");
    }

    #[test]
    fn test_requested_type_matches_property() {
        let d = descriptor(
            r#"{"subject": "acct:a@b", "links": [
                {"rel": "http://webfinger.net/rel/profile-page", "href": "P"},
                {"rel": "self", "href": "S",
                 "properties": {"https://www.w3.org/ns/activitystreams#type": "Person"}}
            ]}"#,
        );
        let result = select_link(&d, Some("person")).unwrap();
        assert_eq!(result.href, "S");
    }

    #[test]
    fn test_unmatched_requested_type_is_not_found() {
        // No fallback to the profile-page scan when a type was requested
        let d = descriptor(
            r#"{"subject": "acct:a@b", "links": [
                {"rel": "http://webfinger.net/rel/profile-page", "href": "P"},
                {"rel": "self", "href": "S",
                 "properties": {"https://www.w3.org/ns/activitystreams#type": "Person"}}
            ]}"#,
        );
        assert!(matches!(
            select_link(&d, Some("Group")),
            Err(WebFingerError::NotFound)
        ));
    }

    #[test]
    fn test_requested_type_scans_forward() {
        let d = descriptor(
            r#"{"subject": "acct:a@b", "links": [
                {"rel": "self", "href": "FIRST",
                 "properties": {"https://www.w3.org/ns/activitystreams#type": "Person"}},
                {"rel": "self", "href": "SECOND",
                 "properties": {"https://www.w3.org/ns/activitystreams#type": "Person"}}
            ]}"#,
        );
        assert_eq!(select_link(&d, Some("Person")).unwrap().href, "FIRST");
    }

    #[test]
    fn test_selection_is_idempotent() {
        let d = descriptor(
            r#"{"subject": "acct:a@b", "links": [
                {"rel": "http://webfinger.net/rel/profile-page", "href": "https://b/@a"},
                {"rel": "self", "href": "https://b/users/a"}
            ]}"#,
        );
        let first = select_link(&d, None).unwrap();
        let second = select_link(&d, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_concrete_mastodon_style_document() {
        let d = descriptor(
            r#"{"subject":"acct:a@b","links":[
                {"rel":"http://webfinger.net/rel/profile-page","href":"https://b/@a"},
                {"rel":"self","href":"https://b/users/a"}
            ]}"#,
        );
        let result = select_link(&d, None).unwrap();
        assert_eq!(result.subject, "acct:a@b");
        assert_eq!(result.href, "https://b/@a");
    }
}
