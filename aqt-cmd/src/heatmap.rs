//! `heatmap`: the one-year calendar rendered as text.

use aqt_client::api::{ApiConfig, HttpApi};
use aqt_client::heatmap::HeatmapFetcher;
use aqt_core::heatmap::{CalendarLayout, ColorScale, WEEKDAY_LABELS};
use aqt_core::Metric;
use log::info;
use std::rc::Rc;

/// Seven weekday rows of bucket digits under a month header. `.` marks a
/// day without data and a blank is padding outside the window.
pub fn render_grid(layout: &CalendarLayout, scale: &ColorScale) -> String {
    let mut grid = vec![vec![' '; layout.total_weeks]; 7];
    for cell in &layout.cells {
        let glyph = match scale.bucket(cell.value) {
            Some(b) => char::from_digit(b as u32, 10).unwrap_or('?'),
            None => '.',
        };
        if let Some(slot) = grid
            .get_mut(cell.row)
            .and_then(|row| row.get_mut(cell.column))
        {
            *slot = glyph;
        }
    }

    let mut header = vec![' '; layout.total_weeks + 3];
    for (week, label) in layout.month_labels.iter().enumerate() {
        for (i, ch) in label.chars().enumerate() {
            if let Some(slot) = header.get_mut(week + i) {
                *slot = ch;
            }
        }
    }

    let mut out = format!("    {}\n", header.iter().collect::<String>().trim_end());
    for (row, cells) in grid.iter().enumerate() {
        let line = format!("{} {}", WEEKDAY_LABELS[row], cells.iter().collect::<String>());
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub async fn run_heatmap(config: ApiConfig, filter: &str, metric: Metric) -> anyhow::Result<()> {
    let fetcher = HeatmapFetcher::new(Rc::new(HttpApi::new(config)));
    let window = fetcher.window();
    let snapshot = fetcher.load(filter, metric, 0).await?;
    info!(
        "{} daily values for {} between {} and {}",
        snapshot.series.len(),
        filter,
        window.start,
        window.end
    );

    let layout = CalendarLayout::build(window, &snapshot.series);
    let scale = ColorScale::for_metric(metric, layout.values());
    print!("{}", render_grid(&layout, &scale));
    let legend: Vec<String> = scale
        .legend()
        .into_iter()
        .enumerate()
        .map(|(bucket, (label, _))| format!("{bucket}={label}"))
        .collect();
    println!("legend: {}  .=no data", legend.join(" "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqt_core::heatmap::{DailyValue, HeatmapWindow};
    use chrono::NaiveDate;

    #[test]
    fn grid_marks_buckets_and_missing_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(); // Sunday
        let end = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let window = HeatmapWindow { start, end };
        let series = vec![
            DailyValue {
                timestamp: 0,
                date: start,
                value: Some(10.0),
                count: 1,
            },
            DailyValue {
                timestamp: 0,
                date: end,
                value: Some(200.0),
                count: 1,
            },
        ];
        let layout = CalendarLayout::build(window, &series);
        let grid = render_grid(&layout, &ColorScale::FixedPm25);
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "    Jan");
        assert_eq!(lines[1], "Sun 0");
        assert_eq!(lines[2], "Mon .");
        assert_eq!(lines[3], "Tue 4");
        assert_eq!(lines[4], "Wed");
    }
}
