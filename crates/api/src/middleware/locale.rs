use axum::{
    body::Body,
    http::{header, HeaderValue, Request, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use site_core::i18n::{locale_cookie, LOCALE_COOKIE};
use site_core::routing::{route, RouteDecision, RouteRequest};
use tracing::{debug, warn};

/// Applies locale routing before the router sees the request.
///
/// Must wrap the whole application service: a rewrite changes the URI that
/// route matching runs against.
pub async fn route_locale(jar: CookieJar, mut req: Request<Body>, next: Next) -> Response {
    let decision = {
        let headers = req.headers();
        let host = headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| req.uri().host());
        let accept_language = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        let cookie_locale = jar.get(LOCALE_COOKIE).map(|c| c.value());

        route(&RouteRequest {
            path: req.uri().path(),
            host,
            accept_language,
            cookie_locale,
        })
    };

    let query = req.uri().query().map(|q| format!("?{q}")).unwrap_or_default();

    match decision {
        RouteDecision::Pass => next.run(req).await,
        RouteDecision::Rewrite { path } => {
            match format!("{path}{query}").parse::<Uri>() {
                Ok(uri) => {
                    debug!(from = %req.uri(), to = %uri, "subdomain rewrite");
                    *req.uri_mut() = uri;
                }
                Err(err) => warn!(error = %err, path = %path, "invalid rewrite target"),
            }
            next.run(req).await
        }
        RouteDecision::Redirect { location, locale } => {
            let mut resp = Redirect::temporary(&format!("{location}{query}")).into_response();
            if let Ok(cookie) = HeaderValue::from_str(&locale_cookie(locale)) {
                resp.headers_mut().insert(header::SET_COOKIE, cookie);
            }
            resp
        }
    }
}
