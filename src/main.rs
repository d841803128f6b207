use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use folio::display;
use folio::metrics::FileSource;
use folio::scanner::{self, ScanConfig};
use folio::{GridConfig, GridController, HeadlessSurface, HostView, Viewer, ViewerConfig};

const DEFAULT_WIDTH: f32 = 1280.0;
const DEFAULT_VIEWPORT_HEIGHT: f32 = 800.0;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("folio=info".parse().context("Invalid log directive")?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let dir = args
        .next()
        .map(PathBuf::from)
        .context("usage: folio <directory> [width]")?;
    let width = args
        .next()
        .map(|w| w.parse::<f32>())
        .transpose()
        .context("Width must be a number")?
        .unwrap_or(DEFAULT_WIDTH);

    run(dir, width).await
}

async fn run(dir: PathBuf, width: f32) -> Result<()> {
    let items = scanner::discover_photos(&dir, &ScanConfig::default())?;
    let view = HostView::Feed;
    if items.is_empty() {
        info!("{}", display::empty_state(&view));
        return Ok(());
    }

    let config = GridConfig::from_env();
    let surface = Arc::new(HeadlessSurface::new(width));
    let grid = GridController::new(
        &config,
        surface.as_ref(),
        Arc::new(FileSource::new(dir.clone())),
    )?;

    let outcome = grid.layout(items.clone()).await?;
    let snapshot = grid.snapshot()?;
    info!(
        items = snapshot.placements.len(),
        columns = snapshot.column_count,
        total_height = ?outcome.total_height(),
        "Laid out {:?}",
        dir
    );
    for placement in snapshot.visible(0.0, DEFAULT_VIEWPORT_HEIGHT) {
        info!(
            id = %placement.id,
            column = placement.column,
            x = placement.x,
            y = placement.y,
            height = placement.height,
            "Visible"
        );
    }

    let mut viewer = Viewer::new(ViewerConfig::from_env(), surface.clone())?;
    viewer.open(&items[0], &items, false, &view);
    loop {
        if let (Some(indicator), Some(current)) = (viewer.indicator(), viewer.current()) {
            info!(
                id = %current.id,
                caption = %display::caption_lines(current).join(" | "),
                "{}",
                indicator
            );
        }
        if !viewer.navigate(1) {
            break;
        }
    }
    if let Some(return_view) = viewer.close() {
        info!(?return_view, "Viewer closed");
    }

    grid.destroy();
    Ok(())
}
