use super::build_response;
use crate::error::ObserverError;
use crate::observer::ReconcileObserver;
use percent_encoding::percent_decode_str;
use std::sync::Arc;
use traysync_core::TrayId;
use warp::Filter;

pub fn routes(
    observer: &Arc<ReconcileObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    reconcile(observer.clone())
        .or(records(observer.clone()))
        .or(record(observer.clone()))
}

/// POST api/reconcile
///
/// Runs one reconciliation pass over both feeds
///
/// Returns the stored records of this pass, in sensor feed order
fn reconcile(
    observer: Arc<ReconcileObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::post())
        .and(warp::path!("api" / "reconcile"))
        .and_then(|observer: Arc<ReconcileObserver>| async move {
            let resp = observer.reconcile().await;
            build_response(resp)
        })
        .boxed()
}

/// GET api/records
///
/// Returns every stored record, newest first
fn records(
    observer: Arc<ReconcileObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "records"))
        .and_then(|observer: Arc<ReconcileObserver>| async move {
            let resp = observer.records().await;
            build_response(resp)
        })
        .boxed()
}

/// GET api/records/:tray_id
///
/// Any tray id encoding is accepted, `TRAY001` and `1` are the same tray.
/// The segment is percent-decoded first, `TRAY%207` looks up `TRAY 7`
///
/// Returns the latest record of the tray or 404
fn record(
    observer: Arc<ReconcileObserver>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || observer.clone())
        .and(warp::get())
        .and(warp::path!("api" / "records" / String))
        .and_then(
            |observer: Arc<ReconcileObserver>, raw_tray_id: String| async move {
                let decoded = percent_decode_str(&raw_tray_id).decode_utf8_lossy();
                let tray_id = TrayId::parse(&decoded);
                let resp = match observer.record(&tray_id).await {
                    Ok(Some(record)) => Ok(record),
                    Ok(None) => Err(ObserverError::NotFound(tray_id)),
                    Err(e) => Err(e),
                };
                build_response(resp)
            },
        )
        .boxed()
}
