use std::{io, net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use log::{error, info};
use tokio::{net::TcpListener, signal};

use crate::proxy::Proxy;

pub const CALENDAR_PATH: &str = "/events.ics";

pub fn router(proxy: Arc<Proxy>) -> Router {
    Router::new()
        .route(
            CALENDAR_PATH,
            get(handle_calendar).head(|| async { StatusCode::METHOD_NOT_ALLOWED }),
        )
        .fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(proxy)
}

async fn handle_calendar(State(proxy): State<Arc<Proxy>>) -> Response {
    let schedule = match proxy.fetch_schedule().await {
        Ok(schedule) => schedule,
        Err(err) => {
            error!("Failed to build calendar: {err}");
            return err.into_response();
        }
    };

    (
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "inline; filename=\"events.ics\""),
        ],
        schedule.to_ics().to_string(),
    )
        .into_response()
}

pub async fn serve(addr: SocketAddr, proxy: Arc<Proxy>) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening at http://{}{CALENDAR_PATH}", listener.local_addr()?);

    axum::serve(listener, router(proxy))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }

    info!("Shutting down");
}
