// Request routing and the hyper server loop

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;

use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use log::debug;

use super::model_manager::SharedAppState;
use super::response_helpers::{cors_preflight, json_error};
use super::routes::{health, predict};

/// Paths served by this service.
pub const ROUTE_PATHS: &[&str] = &["/predict", "/test"];

pub async fn handle_request(
    req: Request<Body>,
    state: SharedAppState,
) -> Result<Response<Body>, Infallible> {
    debug!("{} {}", req.method(), req.uri().path());

    match (req.method(), req.uri().path()) {
        (&Method::POST, "/predict") => predict::handle_predict(req, state).await,
        (&Method::OPTIONS, "/predict") => predict::handle_options().await,
        (&Method::GET, "/test") => health::handle_test(state).await,
        (&Method::OPTIONS, "/test") => Ok(cors_preflight()),
        (_, path) if ROUTE_PATHS.contains(&path) => Ok(json_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method Not Allowed",
        )),
        _ => Ok(json_error(StatusCode::NOT_FOUND, "Not Found")),
    }
}

/// Bind `addr` and build the server future.
///
/// Returns the bound address (useful with port 0) and a future that runs
/// until `shutdown` resolves.
pub fn serve<F>(
    addr: SocketAddr,
    state: SharedAppState,
    shutdown: F,
) -> hyper::Result<(SocketAddr, impl Future<Output = hyper::Result<()>>)>
where
    F: Future<Output = ()> + Send + 'static,
{
    let make_svc = make_service_fn(move |_conn| {
        let state = state.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| handle_request(req, state.clone())))
        }
    });

    let server = Server::try_bind(&addr)?.serve(make_svc);
    let local_addr = server.local_addr();
    Ok((local_addr, server.with_graceful_shutdown(shutdown)))
}
