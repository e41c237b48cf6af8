//! Lambda HTTP adapter around the dispatcher.

use lambda_http::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use lambda_http::{Body, Error, Request, Response};

use crate::dispatcher::{DispatchResponse, Dispatcher};

/// Serve one API Gateway request.
pub async fn handle_request(dispatcher: &Dispatcher, event: Request) -> Result<Response<Body>, Error> {
    let method = event.method().as_str().to_string();
    let response = dispatcher.handle(&method, event.body().as_ref()).await;
    into_response(response)
}

/// Encode a dispatcher response with JSON and CORS headers.
pub fn into_response(response: DispatchResponse) -> Result<Response<Body>, Error> {
    let resp = Response::builder()
        .status(response.status)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(ACCESS_CONTROL_ALLOW_METHODS, "OPTIONS,POST,GET")
        .header(ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
        .body(Body::Text(response.body.to_string()))
        .map_err(Box::new)?;
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::table_operations::ProvisionSettings;
    use lambda_http::http::Method;
    use std::sync::Arc;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(MemoryStore::new()), ProvisionSettings::default())
    }

    fn text(body: &Body) -> &str {
        match body {
            Body::Text(text) => text.as_str(),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn preflight_gets_cors_headers() {
        let mut request = Request::new(Body::Empty);
        *request.method_mut() = Method::OPTIONS;

        let response = handle_request(&dispatcher(), request).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(text(response.body()), "{}");
    }

    #[tokio::test]
    async fn errors_are_json_bodies() {
        let mut request = Request::new(Body::Text(r#"{"state_p":"9"}"#.to_string()));
        *request.method_mut() = Method::POST;

        let response = handle_request(&dispatcher(), request).await.unwrap();
        assert_eq!(response.status(), 400);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body: serde_json::Value = serde_json::from_str(text(response.body())).unwrap();
        assert_eq!(body["kind"], "unknown_operation");
    }
}
