#[cfg(test)]
mod tests;

use std::{io::Cursor, ops::Range, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use image::{ImageOutputFormat, RgbImage};
use mockall::automock;
use plotters::{prelude::*, style::FontTransform};
use thiserror::Error;

use crate::{
    format::format_thousands,
    storage::{HistoryPoint, StatsStorage, StorageError},
};

const CHART_WIDTH: u32 = 1200;
const CHART_HEIGHT: u32 = 600;
const FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Failed to load history: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Failed to encode chart: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Chart pixel buffer has unexpected size")]
    BufferSize,
    #[error("Chart rendering task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

type Result<T> = std::result::Result<T, ChartError>;

/// A point on the chart: observation time and subscriber count.
pub type ChartPoint = (DateTime<Utc>, i64);

#[automock]
#[async_trait]
pub trait ChartService: Send + Sync {
    /// Render the subscriber history of a channel as a PNG.
    ///
    /// Returns `Ok(None)` when the channel has no recorded history yet.
    async fn render_subscribers_chart(
        &self,
        channel_id: i64,
        channel_name: &str,
    ) -> Result<Option<Vec<u8>>>;
}

/// Draws subscriber history with plotters into an in-memory PNG.
pub struct PlottersChartService {
    storage: Arc<dyn StatsStorage>,
    history_limit: u32,
}

impl PlottersChartService {
    pub fn new(storage: Arc<dyn StatsStorage>, history_limit: u32) -> Self {
        Self { storage, history_limit }
    }
}

#[async_trait]
impl ChartService for PlottersChartService {
    async fn render_subscribers_chart(
        &self,
        channel_id: i64,
        channel_name: &str,
    ) -> Result<Option<Vec<u8>>> {
        let history = self.storage.query_history(channel_id, self.history_limit).await?;

        if history.is_empty() {
            tracing::debug!("No history for channel {channel_id}, skipping chart");
            return Ok(None);
        }

        let series = chronological_series(history);
        let title = format!("Subscribers of @{channel_name}");
        tracing::debug!("Rendering chart for channel {channel_id} with {} points", series.len());

        let png = tokio::task::spawn_blocking(move || draw_line_chart(&title, &series)).await??;
        Ok(Some(png))
    }
}

/// Orders history points oldest first, whatever order storage returned.
pub fn chronological_series(mut history: Vec<HistoryPoint>) -> Vec<ChartPoint> {
    history.sort_by_key(|point| (point.date, point.id));
    history.into_iter().map(|point| (point.date, point.participants)).collect()
}

/// Axis ranges covering every point, widened so that a single point or a
/// flat series still gets a non-empty range.
pub fn axis_ranges(series: &[ChartPoint]) -> Option<(Range<DateTime<Utc>>, Range<i64>)> {
    let first = series.first()?.0;
    let last = series.last()?.0;
    let x_range = if first == last {
        (first - Duration::hours(1))..(last + Duration::hours(1))
    } else {
        first..last
    };

    let min = series.iter().map(|&(_, count)| count).min()?;
    let max = series.iter().map(|&(_, count)| count).max()?;
    let pad = ((max - min) / 10).max(max.abs() / 100).max(1);
    let y_range = (min - pad).max(0).min(min)..(max + pad);

    Some((x_range, y_range))
}

fn draw_error(err: impl std::fmt::Display) -> ChartError {
    ChartError::Draw(err.to_string())
}

fn date_label(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

fn count_label(count: &i64) -> String {
    format_thousands(*count)
}

/// Draws `series` as a line with point markers and encodes it as PNG.
pub fn draw_line_chart(title: &str, series: &[ChartPoint]) -> Result<Vec<u8>> {
    let (x_range, y_range) =
        axis_ranges(series).ok_or_else(|| draw_error("no points to draw"))?;

    let mut pixels = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT_FAMILY, 28))
            .margin(20)
            .x_label_area_size(110)
            .y_label_area_size(100)
            .build_cartesian_2d(RangedDateTime::from(x_range), y_range)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Subscribers")
            .x_labels(10)
            .x_label_formatter(&date_label)
            .x_label_style((FONT_FAMILY, 14).into_font().transform(FontTransform::Rotate90))
            .y_label_formatter(&count_label)
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(LineSeries::new(series.iter().copied(), BLUE.stroke_width(2)))
            .map_err(draw_error)?;
        chart
            .draw_series(series.iter().map(|&point| Circle::new(point, 4, BLUE.filled())))
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }

    encode_png(pixels)
}

fn encode_png(pixels: Vec<u8>) -> Result<Vec<u8>> {
    let image =
        RgbImage::from_raw(CHART_WIDTH, CHART_HEIGHT, pixels).ok_or(ChartError::BufferSize)?;

    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageOutputFormat::Png)?;
    Ok(png.into_inner())
}
