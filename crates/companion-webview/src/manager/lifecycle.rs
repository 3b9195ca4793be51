use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, warn};
use wry::http::{Response, StatusCode};
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::content::ContentProvider;
use crate::ipc::IPC_INIT_SCRIPT;

use super::handle::WebViewHandle;
use super::types::WebViewConfig;
use super::{WebViewManager, PROTOCOL};

impl WebViewManager {
    /// Create the overlay WebView as a child of `window`, positioned at
    /// `bounds`.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
    ) -> Result<WebViewHandle, wry::Error> {
        let events = Arc::clone(&self.events);

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_autoplay(config.autoplay)
            .with_initialization_script(IPC_INIT_SCRIPT);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(builder, Arc::clone(&events));
        builder = Self::attach_page_load_handler(builder, Arc::clone(&events));
        builder = Self::attach_navigation_handler(builder, events);
        builder = self.attach_custom_protocol(builder);

        let initial_url = match (&config.url, &config.html) {
            (Some(url), _) => {
                builder = builder.with_url(url);
                url.clone()
            }
            (None, Some(html)) => {
                builder = builder.with_html(html);
                "about:blank".to_string()
            }
            (None, None) => {
                builder = builder.with_html("<html><body></body></html>");
                "about:blank".to_string()
            }
        };

        let webview = builder.build_as_child(window)?;
        debug!(url = %initial_url, "overlay WebView created");

        Ok(WebViewHandle {
            webview,
            current_url: initial_url,
        })
    }

    /// Serve bundled assets via `companion://`.
    pub fn set_content_provider(&mut self, provider: ContentProvider) {
        self.content_provider = Some(Arc::new(provider));
    }

    fn attach_custom_protocol<'a>(&self, builder: WebViewBuilder<'a>) -> WebViewBuilder<'a> {
        let Some(provider) = &self.content_provider else {
            return builder;
        };
        let cp = Arc::clone(provider);
        builder.with_custom_protocol(PROTOCOL.to_string(), move |_id, request| {
            let uri = request.uri().to_string();
            let path = request_path(&uri);
            match cp.resolve(path) {
                Some((mime, data)) => respond(StatusCode::OK, &mime, data.into_owned()),
                None => {
                    warn!(path = %path, "custom protocol: asset not found");
                    respond(StatusCode::NOT_FOUND, "text/plain", b"Not Found".to_vec())
                }
            }
        })
    }
}

/// Strip the scheme and host from a custom-protocol URI.
pub(crate) fn request_path(uri: &str) -> &str {
    let prefixes = [
        "companion://localhost/",
        "companion://localhost",
        "http://companion.localhost/",
        "companion:///",
        "companion://",
    ];
    prefixes
        .iter()
        .find_map(|p| uri.strip_prefix(p))
        .unwrap_or("")
}

fn respond(status: StatusCode, mime: &str, body: Vec<u8>) -> Response<Cow<'static, [u8]>> {
    let mut response = Response::new(Cow::Owned(body));
    *response.status_mut() = status;
    if let Ok(value) = mime.parse() {
        response.headers_mut().insert("Content-Type", value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_paths() {
        assert_eq!(
            request_path("companion://localhost/overlay/index.html"),
            "overlay/index.html"
        );
        assert_eq!(
            request_path("http://companion.localhost/overlay/app.js"),
            "overlay/app.js"
        );
        assert_eq!(request_path("companion:///x.png"), "x.png");
        assert_eq!(request_path("https://elsewhere/x"), "");
    }

    #[test]
    fn not_found_response() {
        let r = respond(StatusCode::NOT_FOUND, "text/plain", b"Not Found".to_vec());
        assert_eq!(r.status(), StatusCode::NOT_FOUND);
        assert_eq!(r.headers()["Content-Type"], "text/plain");
    }
}
