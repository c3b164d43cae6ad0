use chrono::TimeZone;

use super::*;
use crate::storage::MockStatsStorage;

const CHANNEL_ID: i64 = 123;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
}

fn point(id: i64, date: DateTime<Utc>, participants: i64) -> HistoryPoint {
    HistoryPoint { id, date, participants }
}

#[test]
fn test_chronological_series_sorts_ascending() {
    // Storage hands points back newest first.
    let history = vec![point(3, at(3, 0), 300), point(1, at(1, 0), 100), point(2, at(2, 0), 200)];

    let series = chronological_series(history);

    assert_eq!(series, vec![(at(1, 0), 100), (at(2, 0), 200), (at(3, 0), 300)]);
}

#[test]
fn test_chronological_series_arbitrary_order() {
    let history = vec![
        point(2, at(2, 12), 150),
        point(4, at(4, 0), 180),
        point(1, at(1, 8), 120),
        point(3, at(3, 9), 170),
    ];

    let series = chronological_series(history);

    let dates: Vec<_> = series.iter().map(|(date, _)| *date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
}

#[test]
fn test_chronological_series_same_date_uses_insertion_order() {
    let history = vec![point(8, at(1, 0), 101), point(7, at(1, 0), 100)];

    let series = chronological_series(history);

    assert_eq!(series, vec![(at(1, 0), 100), (at(1, 0), 101)]);
}

#[test]
fn test_axis_ranges() {
    let series = vec![(at(1, 0), 1000), (at(3, 0), 2000)];

    let (x_range, y_range) = axis_ranges(&series).unwrap();

    assert_eq!(x_range, at(1, 0)..at(3, 0));
    assert_eq!(y_range, 900..2100);
}

#[test]
fn test_axis_ranges_single_point() {
    let series = vec![(at(1, 12), 100)];

    let (x_range, y_range) = axis_ranges(&series).unwrap();

    assert_eq!(x_range, at(1, 11)..at(1, 13));
    assert_eq!(y_range, 99..101);
}

#[test]
fn test_axis_ranges_flat_large_series() {
    let series = vec![(at(1, 0), 45000), (at(2, 0), 45000)];

    let (_, y_range) = axis_ranges(&series).unwrap();

    assert_eq!(y_range, 44550..45450);
}

#[test]
fn test_axis_ranges_empty() {
    assert!(axis_ranges(&[]).is_none());
}

#[tokio::test]
async fn test_render_no_history_signals_no_data() {
    // Arrange
    let mut mock_storage = MockStatsStorage::new();
    mock_storage
        .expect_query_history()
        .withf(|channel_id, limit| *channel_id == CHANNEL_ID && *limit == 30)
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let chart_service = PlottersChartService::new(Arc::new(mock_storage), 30);

    // Act
    let result = chart_service.render_subscribers_chart(CHANNEL_ID, "examplechannel").await;

    // Assert
    assert!(result.unwrap().is_none());
}

#[tokio::test]
async fn test_render_storage_error() {
    // Arrange
    let mut mock_storage = MockStatsStorage::new();
    mock_storage
        .expect_query_history()
        .returning(|_, _| Err(StorageError::DbError(sqlx::Error::PoolClosed)));

    let chart_service = PlottersChartService::new(Arc::new(mock_storage), 30);

    // Act
    let result = chart_service.render_subscribers_chart(CHANNEL_ID, "examplechannel").await;

    // Assert
    assert!(matches!(result, Err(ChartError::Storage(_))));
}

#[test]
fn test_draw_line_chart_produces_png() {
    let series = vec![(at(1, 0), 100), (at(2, 0), 150), (at(3, 0), 130)];

    let png = draw_line_chart("Subscribers of @examplechannel", &series).unwrap();

    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn test_encode_png_rejects_wrong_buffer_size() {
    let result = encode_png(vec![0u8; 12]);
    assert!(matches!(result, Err(ChartError::BufferSize)));
}

#[test]
fn test_draw_line_chart_single_point() {
    let png = draw_line_chart("Subscribers of @examplechannel", &[(at(1, 0), 1_250_000)]).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[test]
fn test_axis_labels() {
    assert_eq!(date_label(&Utc.with_ymd_and_hms(2024, 5, 1, 9, 5, 0).unwrap()), "2024-05-01 09:05");
    assert_eq!(count_label(&45000), "45 000");
    assert_eq!(count_label(&1_250_000), "1 250 000");
    assert_eq!(count_label(&999), "999");
}
