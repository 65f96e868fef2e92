use super::build_response;
use crate::observer::ReconcileObserver;
use std::sync::Arc;
use warp::Filter;

pub fn routes(
    observer: &Arc<ReconcileObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    health(observer.clone())
}

fn health(
    observer: Arc<ReconcileObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "health"))
        .and_then(|observer: Arc<ReconcileObserver>| async move {
            let ret = dto::HealthyDto {
                healthy: true,
                version: traysync_core::CORE_VERSION,
                storage_backend: observer.storage_backend(),
            };
            build_response(Ok(ret))
        })
        .boxed()
}

mod dto {
    use crate::storage::StorageBackend;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    pub struct HealthyDto {
        pub healthy: bool,
        pub version: &'static str,
        pub storage_backend: StorageBackend,
    }
}
