use plotters::style::RGBColor;

/// Line colours, one per charted sender, cycling when there are more senders
/// than colours.
const SERIES_PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Dimensions, fonts and colours shared by every chart image.
#[derive(Debug, Clone)]
pub struct ChartTheme {
    // ── Canvas ───────────────────────────────────────────────────────────────
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub margin: u32,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub font_family: &'static str,
    pub title_size: f64,
    pub label_size: f64,
    pub legend_size: f64,

    // ── Axes ─────────────────────────────────────────────────────────────────
    /// Height reserved below the plot for month labels and the axis title.
    pub x_label_area: u32,
    /// Width reserved left of the plot for counts and the axis title.
    pub y_label_area: u32,
    /// Upper bound on month tick labels before they start to overlap.
    pub max_x_labels: usize,

    // ── Series ───────────────────────────────────────────────────────────────
    pub line_width: u32,
    pub point_size: u32,
    pub palette: Vec<RGBColor>,
}

impl ChartTheme {
    /// White-background theme used for the PNG reports.
    pub fn light() -> Self {
        Self {
            width: 1280,
            height: 800,
            background: RGBColor(255, 255, 255),
            margin: 20,

            font_family: "sans-serif",
            title_size: 28.0,
            label_size: 14.0,
            legend_size: 15.0,

            x_label_area: 60,
            y_label_area: 80,
            max_x_labels: 24,

            line_width: 2,
            point_size: 3,
            palette: SERIES_PALETTE.to_vec(),
        }
    }

    /// Colour of the `idx`-th series.
    pub fn color_for(&self, idx: usize) -> RGBColor {
        if self.palette.is_empty() {
            return RGBColor(0, 0, 0);
        }
        self.palette[idx % self.palette.len()]
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::light()
    }
}
