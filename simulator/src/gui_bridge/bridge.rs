use crate::generator::profile::{build_track_batch_from_config, TrackGeneratorConfig};
use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::Runner;
use anyhow::Result;
use fiscore::tracks::TrackRecord;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Bridge that hosts the scores endpoint and evaluates incoming batches.
pub struct GuiBridge {
    state: Arc<RwLock<VisualizationModel>>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        let state = Arc::new(RwLock::new(VisualizationModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("scores")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<VisualizationModel>>| {
                warp::reply::json(&*state.read().unwrap())
            });

        let ingest_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(
                |records: Vec<TrackRecord>,
                 state: Arc<RwLock<VisualizationModel>>,
                 runner: Arc<Runner>| async move {
                    match runner.execute(&records) {
                        Ok(result) => {
                            let scored = result.report.scores.len();
                            let mut guard = state.write().unwrap();
                            *guard = VisualizationModel::from_report(&result.report, result.notes);
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({"status": "ok", "records": scored})),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let generator_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .and_then(
                |config: TrackGeneratorConfig,
                 state: Arc<RwLock<VisualizationModel>>,
                 runner: Arc<Runner>| async move {
                    let records = build_track_batch_from_config(runner.config(), &config);
                    match runner.execute(&records) {
                        Ok(result) => {
                            if let Some(name) = config.scenario.as_ref() {
                                println!(
                                    "[GUI] Scenario {} -> average threat {:.3}",
                                    name, result.report.average
                                );
                            }
                            let average = result.report.average;
                            let mut guard = state.write().unwrap();
                            *guard = VisualizationModel::from_report(&result.report, result.notes);
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "average": average,
                                    "description": config.description.clone().unwrap_or_default()
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("ingest-config error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(ingest_route).or(generator_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(gui_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &VisualizationModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = model.clone();
        println!(
            "[GUI] records: {}, average threat: {:.3}",
            guard.record_count, guard.average
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state.read().unwrap().clone()
    }
}
