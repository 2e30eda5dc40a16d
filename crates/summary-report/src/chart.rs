//! Monthly line charts rendered to PNG with `plotters`.
//!
//! A chart has one shared month axis and one line per sender. The x axis is
//! the month index; tick labels are mapped back to `Jan 2001` style names.

use std::path::Path;

use chrono::NaiveDate;
use plotters::prelude::*;
use summary_core::models::MonthlySeries;
use summary_core::time_utils::format_month_label;
use summary_core::{Result, SummaryError};
use tracing::debug;

use crate::themes::ChartTheme;

pub const X_AXIS_DESC: &str = "Event time (monthly)";
pub const SENT_CHART_TITLE: &str = "Sent E-mail Count Distribution over Time";
pub const SENT_CHART_Y_DESC: &str = "Number of emails sent";
pub const CONTACT_CHART_TITLE: &str = "Unique Contact Distribution over Time";
pub const CONTACT_CHART_Y_DESC: &str = "Unique recipients per sender";
pub const RELATIVE_CONTACT_CHART_TITLE: &str = "Relative Unique Contact Distribution over Time";
pub const RELATIVE_CONTACT_CHART_Y_DESC: &str = "Share of unique recipients per sender";

/// One line of a [`LineChart`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    /// One value per month of the chart's axis.
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn from_counts(series: &MonthlySeries) -> Self {
        Self {
            label: series.person.clone(),
            values: series.counts.iter().map(|c| c.count as f64).collect(),
        }
    }
}

/// Everything needed to draw one chart image.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub y_desc: String,
    pub months: Vec<NaiveDate>,
    pub series: Vec<ChartSeries>,
}

impl LineChart {
    /// Chart of raw monthly counts. The month axis is taken from the first
    /// series; all series are expected to share it.
    pub fn from_counts(title: &str, y_desc: &str, series: &[MonthlySeries]) -> Self {
        Self {
            title: title.to_string(),
            y_desc: y_desc.to_string(),
            months: shared_months(series),
            series: series.iter().map(ChartSeries::from_counts).collect(),
        }
    }

    /// Largest value over all series, or `0.0` for an empty chart.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0, f64::max)
    }

    /// Upper bound of the y axis: 10% headroom over the largest value, and
    /// never below `1.0` so an all-zero chart still has an axis.
    pub fn y_upper_bound(&self) -> f64 {
        (self.max_value() * 1.1).max(1.0)
    }

    /// Upper bound of the x axis in month-index units.
    ///
    /// A one-month chart still gets a unit-wide axis.
    pub fn x_upper_bound(&self) -> i32 {
        self.months.len().saturating_sub(1).max(1) as i32
    }

    /// Tick label for the month at `idx`, empty outside the axis.
    pub fn month_label(&self, idx: i32) -> String {
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.months.get(i))
            .map(|m| format_month_label(*m))
            .unwrap_or_default()
    }
}

/// Monthly sent-volume chart, one line per sender.
pub fn sent_volume_chart(series: &[MonthlySeries]) -> LineChart {
    LineChart::from_counts(SENT_CHART_TITLE, SENT_CHART_Y_DESC, series)
}

/// Monthly distinct-recipient chart, one line per sender.
pub fn unique_contact_chart(series: &[MonthlySeries]) -> LineChart {
    LineChart::from_counts(CONTACT_CHART_TITLE, CONTACT_CHART_Y_DESC, series)
}

/// Distinct-recipient chart where each line is a share of the month's total.
///
/// `shares[i]` holds the per-month values of `series[i]`.
pub fn relative_contact_chart(series: &[MonthlySeries], shares: Vec<Vec<f64>>) -> LineChart {
    LineChart {
        title: RELATIVE_CONTACT_CHART_TITLE.to_string(),
        y_desc: RELATIVE_CONTACT_CHART_Y_DESC.to_string(),
        months: shared_months(series),
        series: series
            .iter()
            .zip(shares)
            .map(|(s, values)| ChartSeries {
                label: s.person.clone(),
                values,
            })
            .collect(),
    }
}

/// Draw `chart` into a PNG at `path`.
pub fn render_line_chart(path: &Path, chart: &LineChart, theme: &ChartTheme) -> Result<()> {
    draw(path, chart, theme).map_err(|e| SummaryError::Chart {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(
        "Rendered \"{}\" with {} series over {} months to {}",
        chart.title,
        chart.series.len(),
        chart.months.len(),
        path.display()
    );
    Ok(())
}

// ── Private ───────────────────────────────────────────────────────────────────

fn shared_months(series: &[MonthlySeries]) -> Vec<NaiveDate> {
    series
        .first()
        .map(|s| s.counts.iter().map(|c| c.month).collect())
        .unwrap_or_default()
}

fn draw(path: &Path, chart: &LineChart, theme: &ChartTheme) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, (theme.width, theme.height)).into_drawing_area();
    root.fill(&theme.background)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (theme.font_family, theme.title_size))
        .margin(theme.margin)
        .x_label_area_size(theme.x_label_area)
        .y_label_area_size(theme.y_label_area)
        .build_cartesian_2d(0i32..chart.x_upper_bound(), 0f64..chart.y_upper_bound())?;

    let label_formatter = |idx: &i32| chart.month_label(*idx);
    ctx.configure_mesh()
        .x_desc(X_AXIS_DESC)
        .y_desc(chart.y_desc.as_str())
        .x_labels(chart.months.len().clamp(1, theme.max_x_labels))
        .x_label_formatter(&label_formatter)
        .label_style((theme.font_family, theme.label_size))
        .draw()?;

    for (idx, series) in chart.series.iter().enumerate() {
        let color = theme.color_for(idx);
        let points = series
            .values
            .iter()
            .enumerate()
            .map(|(x, &y)| (x as i32, y));
        ctx.draw_series(
            LineSeries::new(points, color.stroke_width(theme.line_width))
                .point_size(theme.point_size),
        )?
        .label(series.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((theme.font_family, theme.legend_size))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use summary_core::models::MonthlyCount;
    use tempfile::TempDir;

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn series(person: &str, counts: &[u64]) -> MonthlySeries {
        MonthlySeries {
            person: person.to_string(),
            counts: counts
                .iter()
                .enumerate()
                .map(|(i, &count)| MonthlyCount {
                    month: month(2001, i as u32 + 1),
                    count,
                })
                .collect(),
        }
    }

    // ── chart construction ────────────────────────────────────────────────────

    #[test]
    fn test_sent_volume_chart_shape() {
        let chart = sent_volume_chart(&[series("jeff", &[2, 1]), series("sara", &[0, 4])]);

        assert_eq!(chart.title, SENT_CHART_TITLE);
        assert_eq!(chart.months, vec![month(2001, 1), month(2001, 2)]);
        assert_eq!(chart.series[0].label, "jeff");
        assert_eq!(chart.series[1].values, vec![0.0, 4.0]);
    }

    #[test]
    fn test_contact_chart_labels_name_recipients() {
        let chart = unique_contact_chart(&[series("jeff", &[3])]);
        assert_eq!(chart.title, CONTACT_CHART_TITLE);
        assert_eq!(chart.y_desc, "Unique recipients per sender");

        let relative = relative_contact_chart(&[series("jeff", &[3])], vec![vec![1.0]]);
        assert_eq!(relative.y_desc, "Share of unique recipients per sender");
    }

    #[test]
    fn test_relative_contact_chart_uses_shares() {
        let chart = relative_contact_chart(
            &[series("jeff", &[3]), series("sara", &[1])],
            vec![vec![0.75], vec![0.25]],
        );
        assert_eq!(chart.title, RELATIVE_CONTACT_CHART_TITLE);
        assert_eq!(chart.series[0].values, vec![0.75]);
        assert_eq!(chart.series[1].label, "sara");
    }

    #[test]
    fn test_axis_bounds() {
        let chart = unique_contact_chart(&[series("jeff", &[10, 0, 5])]);
        assert_eq!(chart.x_upper_bound(), 2);
        assert!((chart.y_upper_bound() - 11.0).abs() < 1e-9);

        let flat = unique_contact_chart(&[series("jeff", &[0])]);
        assert_eq!(flat.x_upper_bound(), 1);
        assert_eq!(flat.y_upper_bound(), 1.0);
    }

    #[test]
    fn test_month_label_lookup() {
        let chart = sent_volume_chart(&[series("jeff", &[1, 1, 1])]);
        assert_eq!(chart.month_label(0), "Jan 2001");
        assert_eq!(chart.month_label(2), "Mar 2001");
        assert_eq!(chart.month_label(3), "");
        assert_eq!(chart.month_label(-1), "");
    }

    #[test]
    fn test_empty_chart() {
        let chart = sent_volume_chart(&[]);
        assert!(chart.months.is_empty());
        assert_eq!(chart.max_value(), 0.0);
    }

    // ── rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn test_render_line_chart_writes_png() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sent.png");
        let chart = sent_volume_chart(&[series("jeff", &[2, 1, 7]), series("sara", &[0, 4, 1])]);

        render_line_chart(&path, &chart, &ChartTheme::default()).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_render_line_chart_missing_dir_is_chart_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nope").join("sent.png");
        let chart = sent_volume_chart(&[series("jeff", &[2])]);

        let err = render_line_chart(&path, &chart, &ChartTheme::default()).unwrap_err();
        assert!(matches!(err, SummaryError::Chart { .. }));
    }
}
