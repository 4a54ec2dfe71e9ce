//! XRD host-meta parsing
//!
//! Extracts the WebFinger URL template from a host-meta document.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::error::{Result, WebFingerError};

/// Namespace of XRD documents
pub const XRD_NAMESPACE: &[u8] = b"http://docs.oasis-open.org/ns/xri/xrd-1.0";

const LRDD_REL: &str = "lrdd";

/// Extract the `lrdd` link template from a host-meta XRD document
///
/// Scans `Link` elements in document order and returns the `template`
/// attribute of the first one with `rel="lrdd"`. A well-formed document
/// without such a link is `NotFound`, distinct from structural `Parse`
/// errors, so the caller can fall back to the default WebFinger template
/// only on genuine absence.
pub fn parse_host_meta(document: &[u8]) -> Result<String> {
    let mut reader = NsReader::from_reader(document);
    let mut saw_root = false;

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) | Ok((ns, Event::Empty(e))) => {
                if !saw_root {
                    if !is_xrd_root(&ns, &e) {
                        return Err(WebFingerError::Parse(
                            "host-meta root element is not XRD".to_string(),
                        ));
                    }
                    saw_root = true;
                } else if e.local_name().as_ref() == b"Link" {
                    if let Some(template) = lrdd_template(&e)? {
                        return Ok(template);
                    }
                }
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(err) => return Err(WebFingerError::Parse(err.to_string())),
        }
    }

    if saw_root {
        Err(WebFingerError::NotFound)
    } else {
        Err(WebFingerError::Parse("empty host-meta document".to_string()))
    }
}

fn is_xrd_root(ns: &ResolveResult, e: &BytesStart) -> bool {
    match ns {
        ResolveResult::Bound(Namespace(bound)) => {
            e.local_name().as_ref() == b"XRD" && *bound == XRD_NAMESPACE
        }
        _ => false,
    }
}

/// The `template` attribute if this is an `lrdd` link, `None` otherwise
fn lrdd_template(e: &BytesStart) -> Result<Option<String>> {
    if attribute_value(e, b"rel")?.as_deref() != Some(LRDD_REL) {
        return Ok(None);
    }
    attribute_value(e, b"template")
}

fn attribute_value(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    match e.try_get_attribute(name) {
        Ok(Some(attr)) => match attr.unescape_value() {
            Ok(value) => Ok(Some(value.into_owned())),
            Err(err) => Err(WebFingerError::Parse(err.to_string())),
        },
        Ok(None) => Ok(None),
        Err(err) => Err(WebFingerError::Parse(err.to_string())),
    }
}
