//! Session cookies exported from a logged-in browser.
//!
//! The file is a JSON array in the shape browser cookie-export extensions
//! produce; fields other than the ones modelled here are ignored.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CookieError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    /// Unix seconds; browser exports often carry a fractional part.
    #[serde(
        default,
        rename = "expirationDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<f64>,
}

impl Cookie {
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        #[allow(clippy::cast_possible_truncation)]
        let secs = self.expiration_date?.trunc() as i64;
        DateTime::from_timestamp(secs, 0)
    }

    /// Renders the cookie as a `Set-Cookie` header value.
    ///
    /// `Domain` is emitted only when the export carried one, so cookies
    /// without a domain stay host-only for whatever URL they are stored under.
    #[must_use]
    pub fn to_set_cookie(&self) -> String {
        let mut header = format!("{}={}", self.name, self.value);
        if let Some(domain) = self.domain.as_deref().filter(|d| !d.is_empty()) {
            header.push_str("; Domain=");
            header.push_str(domain);
        }
        header.push_str("; Path=");
        header.push_str(self.path.as_deref().unwrap_or("/"));
        if self.secure == Some(true) {
            header.push_str("; Secure");
        }
        if let Some(expires) = self.expires_at() {
            header.push_str("; Expires=");
            header.push_str(&expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
        }
        header
    }
}

/// The validated contents of one cookie file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CookieSet {
    cookies: Vec<Cookie>,
}

impl CookieSet {
    #[must_use]
    pub fn new(cookies: Vec<Cookie>) -> Self {
        Self { cookies }
    }

    /// Parses a JSON cookie array.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the text is not an array of
    /// cookie objects with at least `name` and `value`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Vec<Cookie>>(text).map(Self::new)
    }

    #[must_use]
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Latest `expirationDate` across all cookies, if any carries one.
    #[must_use]
    pub fn latest_expiration(&self) -> Option<DateTime<Utc>> {
        self.cookies.iter().filter_map(Cookie::expires_at).max()
    }

    /// Rejects the set when its latest expiration is already in the past.
    ///
    /// A set with no expirations at all (session cookies) is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`CookieError::Expired`] when `latest_expiration() < now`.
    pub fn ensure_unexpired(&self, now: DateTime<Utc>) -> Result<(), CookieError> {
        match self.latest_expiration() {
            Some(expired_at) if expired_at < now => Err(CookieError::Expired { expired_at }),
            Some(_) => Ok(()),
            None => {
                tracing::warn!("cookie file carries no expirationDate; assuming session cookies");
                Ok(())
            }
        }
    }
}

/// Reads and parses the cookie file at `path`.
///
/// # Errors
///
/// - [`CookieError::MissingCookieFile`] if the file does not exist.
/// - [`CookieError::Read`] on any other I/O failure.
/// - [`CookieError::Parse`] if the contents are not a JSON cookie array.
pub fn load_cookies(path: &Path) -> Result<CookieSet, CookieError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CookieError::MissingCookieFile {
                path: path.to_path_buf(),
            }
        } else {
            CookieError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    CookieSet::from_json(&text).map_err(|source| CookieError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const EXPORT: &str = r#"[
        {"name": "PHPSESSID", "value": "abc123", "domain": "canvas.example.com",
         "path": "/", "secure": true, "httpOnly": true, "expirationDate": 1767225600.5},
        {"name": "username", "value": "ops", "domain": ".canvas.example.com",
         "expirationDate": 1767312000}
    ]"#;

    #[test]
    fn parses_browser_export_and_ignores_extra_fields() {
        let set = CookieSet::from_json(EXPORT).unwrap();
        assert_eq!(set.cookies().len(), 2);
        assert_eq!(set.cookies()[0].name, "PHPSESSID");
        assert_eq!(set.cookies()[0].secure, Some(true));
        assert_eq!(set.cookies()[1].path, None);
    }

    #[test]
    fn latest_expiration_is_the_maximum() {
        let set = CookieSet::from_json(EXPORT).unwrap();
        let latest = set.latest_expiration().unwrap();
        assert_eq!(latest.timestamp(), 1_767_312_000);
    }

    #[test]
    fn ensure_unexpired_rejects_past_expiration() {
        let set = CookieSet::from_json(EXPORT).unwrap();
        let after = DateTime::from_timestamp(1_800_000_000, 0).unwrap();
        let err = set.ensure_unexpired(after).unwrap_err();
        assert!(matches!(err, CookieError::Expired { expired_at } if expired_at.timestamp() == 1_767_312_000));
    }

    #[test]
    fn ensure_unexpired_accepts_future_expiration() {
        let set = CookieSet::from_json(EXPORT).unwrap();
        let before = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert!(set.ensure_unexpired(before).is_ok());
    }

    #[test]
    fn session_cookies_without_expiration_are_accepted() {
        let set = CookieSet::from_json(r#"[{"name": "a", "value": "b"}]"#).unwrap();
        assert!(set.latest_expiration().is_none());
        assert!(set.ensure_unexpired(Utc::now()).is_ok());
    }

    #[test]
    fn set_cookie_header_carries_attributes() {
        let set = CookieSet::from_json(EXPORT).unwrap();
        let header = set.cookies()[0].to_set_cookie();
        assert_eq!(
            header,
            "PHPSESSID=abc123; Domain=canvas.example.com; Path=/; Secure; Expires=Thu, 01 Jan 2026 00:00:00 GMT"
        );
    }

    #[test]
    fn set_cookie_header_defaults_path_and_omits_domain() {
        let cookie = Cookie {
            name: "a".into(),
            value: "b".into(),
            domain: None,
            path: None,
            secure: None,
            expiration_date: None,
        };
        assert_eq!(cookie.to_set_cookie(), "a=b; Path=/");
    }

    #[test]
    fn load_cookies_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("cookies.json");
        let err = load_cookies(&missing).unwrap_err();
        assert!(matches!(err, CookieError::MissingCookieFile { ref path } if path == &missing));
    }

    #[test]
    fn load_cookies_reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"not\": \"an array\"}").unwrap();
        let err = load_cookies(file.path()).unwrap_err();
        assert!(matches!(err, CookieError::Parse { .. }));
    }

    #[test]
    fn load_cookies_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();
        let set = load_cookies(file.path()).unwrap();
        assert_eq!(set.cookies().len(), 2);
    }
}
