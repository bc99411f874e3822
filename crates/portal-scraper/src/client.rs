//! HTTP client bound to one authenticated portal session.

use std::sync::Arc;
use std::time::Duration;

use portal_core::CookieSet;
use reqwest::cookie::Jar;
use reqwest::{Client, RequestBuilder, Response, Url};
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::error::ScraperError;

/// Authenticated access to the portal.
///
/// Construct once per run from pre-validated cookies and share it behind an
/// `Arc`; every extractor issues its requests through the same cookie jar.
/// The jar also records any `Set-Cookie` the portal sends back, so a session
/// id rotated mid-run is picked up by later requests.
///
/// Plain requests share the session. A multi-step exchange that depends on
/// server-side session state takes it exclusively with
/// [`PortalClient::lock_session`]; no other request on the session is sent
/// until that guard drops.
///
/// No request is retried here: a transport failure or non-2xx status is
/// returned to the caller as-is.
#[derive(Debug)]
pub struct PortalClient {
    client: Client,
    base_url: String,
    session: RwLock<()>,
}

impl PortalClient {
    /// Builds a client for `base_url` carrying `cookies`.
    ///
    /// Cookies without a `domain` are stored host-only for the base URL's
    /// host. Cookies with a domain are stored under that domain using the
    /// base URL's scheme.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `base_url` is not an absolute URL.
    /// - [`ScraperError::Request`] if the underlying `reqwest::Client`
    ///   cannot be constructed.
    pub fn new(
        base_url: &str,
        cookies: &CookieSet,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let base = Url::parse(&base_url).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let jar = Arc::new(Jar::default());
        for cookie in cookies.cookies() {
            let scope = cookie_scope(&base, cookie.domain.as_deref(), cookie.path.as_deref());
            jar.add_cookie_str(&cookie.to_set_cookie(), &scope);
            tracing::debug!(name = %cookie.name, scope = %scope, "loaded session cookie");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .cookie_provider(jar)
            .build()?;

        Ok(Self {
            client,
            base_url,
            session: RwLock::new(()),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins an endpoint path (with or without query) onto the base URL.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            path_and_query.trim_start_matches('/')
        )
    }

    /// Sends a GET and asserts a 2xx status.
    ///
    /// Waits while another task holds the session exclusively.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Request`] on transport failure,
    /// [`ScraperError::Status`] on a non-2xx status.
    pub async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, ScraperError> {
        let _shared = self.session.read().await;
        self.send_get(url, headers).await
    }

    /// GET and return the body as text.
    ///
    /// # Errors
    ///
    /// As [`PortalClient::get`], plus [`ScraperError::Request`] if the body
    /// cannot be read.
    pub async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, ScraperError> {
        let _shared = self.session.read().await;
        Ok(self.send_get(url, headers).await?.text().await?)
    }

    /// Sends a URL-encoded form POST and asserts a 2xx status.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Request`] on transport failure,
    /// [`ScraperError::Status`] on a non-2xx status.
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response, ScraperError> {
        let _shared = self.session.read().await;
        self.send_post(url, form, headers).await
    }

    /// Takes the session exclusively. Requests issued through the returned
    /// guard run in order with nothing else on the session between them.
    pub async fn lock_session(&self) -> SessionGuard<'_> {
        SessionGuard {
            client: self,
            _exclusive: self.session.write().await,
        }
    }

    async fn send_get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response, ScraperError> {
        let request = with_headers(self.client.get(url), headers);
        Self::send(request, "GET", url).await
    }

    async fn send_post(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response, ScraperError> {
        let request = with_headers(self.client.post(url).form(form), headers);
        Self::send(request, "POST", url).await
    }

    async fn send(
        request: RequestBuilder,
        method: &'static str,
        url: &str,
    ) -> Result<Response, ScraperError> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(method, url, status = status.as_u16(), "portal response");

        if !status.is_success() {
            return Err(ScraperError::Status {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response)
    }
}

/// Exclusive hold on a [`PortalClient`] session.
pub struct SessionGuard<'a> {
    client: &'a PortalClient,
    _exclusive: RwLockWriteGuard<'a, ()>,
}

impl SessionGuard<'_> {
    /// As [`PortalClient::get_text`], inside the exclusive hold.
    ///
    /// # Errors
    ///
    /// As [`PortalClient::get_text`].
    pub async fn get_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, ScraperError> {
        Ok(self.client.send_get(url, headers).await?.text().await?)
    }

    /// As [`PortalClient::post_form`], inside the exclusive hold.
    ///
    /// # Errors
    ///
    /// As [`PortalClient::post_form`].
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> Result<Response, ScraperError> {
        self.client.send_post(url, form, headers).await
    }
}

fn with_headers(mut request: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request
}

/// The URL a cookie is stored against in the jar.
fn cookie_scope(base: &Url, domain: Option<&str>, path: Option<&str>) -> Url {
    let Some(domain) = domain.map(|d| d.trim_start_matches('.')).filter(|d| !d.is_empty()) else {
        return base.clone();
    };
    let path = path.unwrap_or("/");
    Url::parse(&format!("{}://{domain}{path}", base.scheme())).unwrap_or_else(|_| base.clone())
}
