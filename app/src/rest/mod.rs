use crate::error::{ErrorKind, ObserverError};
use crate::observer::ReconcileObserver;
use serde::Serialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::{Filter, Reply};

mod metric_routes;
mod record_routes;

pub fn routes(
    observer: &Arc<ReconcileObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    record_routes::routes(observer).or(metric_routes::routes(observer))
}

/// Serves the api until `shutdown` resolves
pub async fn dispatch_server<F>(
    observer: Arc<ReconcileObserver>,
    bind_addr: SocketAddr,
    shutdown: F,
) -> Result<(), warp::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let routes = routes(&observer).with(warp::trace::request());
    let (addr, server) =
        warp::serve(routes).try_bind_with_graceful_shutdown(bind_addr, shutdown)?;

    info!("Starting webserver at: {}", addr);
    server.await;
    info!("Webserver stopped");
    Ok(())
}

fn status_code(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Fetch => StatusCode::BAD_GATEWAY,
        ErrorKind::Parse => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
    }
}

pub(crate) fn build_response<T: Serialize>(
    resp: Result<T, ObserverError>,
) -> Result<warp::reply::Response, warp::Rejection> {
    match resp {
        Ok(data) => Ok(warp::reply::json(&data).into_response()),
        Err(err) => {
            let kind = err.kind();
            if err.is_internal() {
                error!(kind = ?kind, "{}", err);
            } else {
                warn!(kind = ?kind, "{}", err);
            }

            let body = dto::ErrorResponseDto {
                kind,
                error: err.to_string(),
            };
            Ok(warp::reply::with_status(warp::reply::json(&body), status_code(kind)).into_response())
        }
    }
}

pub mod dto {
    use crate::error::ErrorKind;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    pub struct ErrorResponseDto {
        pub kind: ErrorKind,
        pub error: String,
    }
}
