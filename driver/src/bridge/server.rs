use crate::bridge::model::BridgeState;
use crate::generator::profile::{build_scan_from_config, GeneratorConfig};
use crate::workflow::runner::{Runner, ScanResult};
use anyhow::{anyhow, Context};
use log::{error, info};
use placecore::RangeScan;
use serde_json::json;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{mpsc, Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{
    http::StatusCode,
    reply::{Json, WithStatus},
    Filter,
};

type SharedState = Arc<RwLock<BridgeState>>;

fn with_runner(
    runner: Arc<Runner>,
) -> impl Filter<Extract = (Arc<Runner>,), Error = Infallible> + Clone {
    warp::any().map(move || runner.clone())
}

fn with_state(
    state: SharedState,
) -> impl Filter<Extract = (SharedState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn error_reply(message: String) -> WithStatus<Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({"status": "error", "error": message})),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
}

fn record_outcome(state: &SharedState, outcome: anyhow::Result<ScanResult>) -> WithStatus<Json> {
    match outcome {
        Ok(result) => {
            let reply = warp::reply::json(&result);
            if let Ok(mut guard) = state.write() {
                guard.record(result);
            }
            warp::reply::with_status(reply, StatusCode::OK)
        }
        Err(err) => {
            error!("ingest error: {:#}", err);
            error_reply(format!("{:#}", err))
        }
    }
}

/// Runs one extraction on the blocking pool, off the server's event loop.
async fn ingest(
    scan: RangeScan,
    runner: Arc<Runner>,
    state: SharedState,
) -> Result<WithStatus<Json>, Infallible> {
    let outcome = tokio::task::spawn_blocking(move || runner.execute(&scan))
        .await
        .unwrap_or_else(|err| Err(anyhow!("extraction task failed: {}", err)));
    Ok(record_outcome(&state, outcome))
}

async fn generate_and_ingest(
    config: GeneratorConfig,
    runner: Arc<Runner>,
    state: SharedState,
) -> Result<WithStatus<Json>, Infallible> {
    match build_scan_from_config(&config) {
        Ok(scan) => ingest(scan, runner, state).await,
        Err(err) => Ok(error_reply(format!("{:#}", err))),
    }
}

/// `POST /features`, `POST /generate`, and `GET /latest`.
pub fn routes(
    runner: Arc<Runner>,
    state: SharedState,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let latest = warp::path("latest")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(|state: SharedState| {
            let snapshot = state.read().map(|guard| guard.clone()).unwrap_or_default();
            warp::reply::json(&snapshot)
        });

    let features = warp::path("features")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_runner(runner.clone()))
        .and(with_state(state.clone()))
        .and_then(ingest);

    let generate = warp::path("generate")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_runner(runner))
        .and(with_state(state))
        .and_then(generate_and_ingest);

    latest.or(features).or(generate)
}

/// Hosts the live-scan endpoint on a background thread.
pub struct FeatureBridge {
    state: SharedState,
    address: SocketAddr,
}

impl FeatureBridge {
    pub fn spawn(runner: Arc<Runner>, bind: SocketAddr) -> anyhow::Result<Self> {
        let state: SharedState = Arc::new(RwLock::new(BridgeState::default()));
        let api = routes(runner, state.clone());
        let (ready_tx, ready_rx) = mpsc::channel::<anyhow::Result<SocketAddr>>();

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = ready_tx.send(Err(err).context("creating bridge runtime"));
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(api).try_bind_ephemeral(bind) {
                    Ok((address, server)) => {
                        let _ = ready_tx.send(Ok(address));
                        server.await;
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow!("binding {}: {}", bind, err)));
                    }
                }
            });
        });

        let address = ready_rx
            .recv()
            .context("bridge thread exited before binding")??;
        info!("feature bridge listening on {}", address);
        Ok(Self { state, address })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn publish(&self, result: ScanResult) {
        if let Ok(mut guard) = self.state.write() {
            guard.record(result);
        }
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> BridgeState {
        self.state
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;

    fn fixtures() -> (Arc<Runner>, SharedState) {
        let runner = Arc::new(Runner::new(WorkflowConfig::default()).unwrap());
        (runner, Arc::new(RwLock::new(BridgeState::default())))
    }

    #[tokio::test]
    async fn features_route_returns_vector_and_updates_latest() {
        let (runner, state) = fixtures();
        let api = routes(runner, state.clone());
        let scan = RangeScan::full_turn(vec![2.0, 2.5, 3.0, 2.5, 2.0, 1.5]);

        let resp = warp::test::request()
            .method("POST")
            .path("/features")
            .json(&scan)
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: ScanResult = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body.features.len(), 81);
        assert_eq!(body.summary.samples, 6);

        let resp = warp::test::request().path("/latest").reply(&api).await;
        let latest: BridgeState = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(latest.served, 1);
        assert_eq!(latest.latest, Some(body));
    }

    #[tokio::test]
    async fn empty_scan_is_unprocessable() {
        let (runner, state) = fixtures();
        let api = routes(runner, state.clone());
        let resp = warp::test::request()
            .method("POST")
            .path("/features")
            .json(&RangeScan::full_turn(Vec::new()))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(String::from_utf8_lossy(resp.body()).contains("no range samples"));
        assert_eq!(state.read().unwrap().served, 0);
    }

    #[tokio::test]
    async fn generate_route_runs_synthetic_scan() {
        let (runner, state) = fixtures();
        let api = routes(runner, state);
        let resp = warp::test::request()
            .method("POST")
            .path("/generate")
            .json(&json!({"place": "corridor", "samples": 180}))
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: ScanResult = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body.summary.samples, 180);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_ingests_all_land() {
        let (runner, state) = fixtures();
        let api = routes(runner, state.clone());
        let large = RangeScan::full_turn((0..4096).map(|i| 3.0 + (i % 7) as f64).collect());

        let first = warp::test::request()
            .method("POST")
            .path("/features")
            .json(&large)
            .reply(&api);
        let second = warp::test::request()
            .method("POST")
            .path("/features")
            .json(&large)
            .reply(&api);
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        assert_eq!(first.body(), second.body());
        assert_eq!(state.read().unwrap().served, 2);
    }

    #[test]
    fn spawned_bridge_binds_and_publishes() {
        let (runner, _) = fixtures();
        let bind: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let bridge = FeatureBridge::spawn(runner.clone(), bind).unwrap();
        assert_ne!(bridge.address().port(), 0);

        let result = runner.execute(&RangeScan::full_turn(vec![1.0; 8])).unwrap();
        bridge.publish(result.clone());
        assert_eq!(bridge.snapshot().latest, Some(result));
    }
}
