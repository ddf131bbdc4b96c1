use std::net::SocketAddr;

use tracing::info;

use crate::handlers::http;
use crate::handlers::state::AppState;

pub async fn run_api(state: AppState, addr: SocketAddr) {
    info!(
        "Serving availability grids on http://{} (fill {}, malformed ranges: {})",
        addr, state.settings.fill_color, state.settings.policy
    );
    warp::serve(http::routes(state)).run(addr).await;
}
