//! Bar chart rendering for bucket counts.
//!
//! Two renderings share the same bucket order: an SVG document (bars with
//! 45° labels and a dashed reference line at the total row count) and a
//! plain-text chart for terminals.

use crate::buckets::BucketCounts;

/// Stroke color of the total-rows reference line.
const REFERENCE_LINE_COLOR: &str = "green";

/// Size and title of the SVG chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 400,
            title: None,
        }
    }
}

const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 20.0;
const TITLE_HEIGHT: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 130.0;
const BAR_FILL_RATIO: f64 = 0.8;

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Smallest 1/2/5 × 10^k step that is at least `raw`.
fn nice_step(raw: f64) -> f64 {
    if raw <= 1.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10.0 * magnitude)
}

/// Renders `counts` as a standalone SVG document.
///
/// # Examples
///
/// ```
/// use log_census_core::ClassifierMode;
/// use log_census_summary::buckets::BucketCounts;
/// use log_census_summary::chart::{ChartOptions, render_svg};
/// use log_census_summary::table::SummaryTable;
///
/// let csv = "gist_id,path,log_type,available,error_type\na,/a,run,True,NameError\n";
/// let table = SummaryTable::from_reader(csv.as_bytes(), ClassifierMode::Parser).unwrap();
/// let svg = render_svg(&BucketCounts::from_table(&table), &ChartOptions::default());
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains(">NameError</text>"));
/// ```
pub fn render_svg(counts: &BucketCounts, options: &ChartOptions) -> String {
    let width = f64::from(options.width);
    let height = f64::from(options.height);
    let top = MARGIN_TOP + if options.title.is_some() { TITLE_HEIGHT } else { 0.0 };
    let plot_width = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_height = (height - top - MARGIN_BOTTOM).max(1.0);
    let bottom = top + plot_height;

    let peak = counts.total_rows.max(counts.max_count()).max(1) as f64;
    let y_max = peak * 1.05;
    let y_of = |value: f64| bottom - value / y_max * plot_height;

    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" font-family=\"sans-serif\" font-size=\"12\">\n",
        options.width, options.height, options.width, options.height
    ));
    out.push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");

    if let Some(ref title) = options.title {
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" font-size=\"14\">{}</text>\n",
            MARGIN_LEFT + plot_width / 2.0,
            MARGIN_TOP + 10.0,
            escape_xml(title)
        ));
    }

    // y axis with ticks
    let step = nice_step(y_max / 5.0);
    let mut tick = 0.0;
    while tick <= y_max {
        let y = y_of(tick);
        out.push_str(&format!(
            "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{MARGIN_LEFT:.1}\" y2=\"{y:.1}\" stroke=\"black\"/>\n",
            MARGIN_LEFT - 4.0
        ));
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>\n",
            MARGIN_LEFT - 6.0,
            y + 4.0,
            tick as u64
        ));
        tick += step;
    }
    out.push_str(&format!(
        "<line x1=\"{MARGIN_LEFT:.1}\" y1=\"{top:.1}\" x2=\"{MARGIN_LEFT:.1}\" y2=\"{bottom:.1}\" stroke=\"black\"/>\n"
    ));
    out.push_str(&format!(
        "<line x1=\"{MARGIN_LEFT:.1}\" y1=\"{bottom:.1}\" x2=\"{:.1}\" y2=\"{bottom:.1}\" stroke=\"black\"/>\n",
        MARGIN_LEFT + plot_width
    ));
    out.push_str(&format!(
        "<text x=\"16\" y=\"{:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 16 {:.1})\">count</text>\n",
        top + plot_height / 2.0,
        top + plot_height / 2.0
    ));

    if !counts.buckets.is_empty() {
        let slot = plot_width / counts.buckets.len() as f64;
        let bar_width = slot * BAR_FILL_RATIO;
        for (idx, bucket) in counts.buckets.iter().enumerate() {
            let center = MARGIN_LEFT + slot * (idx as f64 + 0.5);
            let bar_top = y_of(bucket.count as f64);
            out.push_str(&format!(
                "<rect x=\"{:.1}\" y=\"{bar_top:.1}\" width=\"{bar_width:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{}: {}</title></rect>\n",
                center - bar_width / 2.0,
                bottom - bar_top,
                bucket.color.hex(),
                escape_xml(&bucket.label),
                bucket.count
            ));
            let label_y = bottom + 14.0;
            out.push_str(&format!(
                "<text x=\"{center:.1}\" y=\"{label_y:.1}\" text-anchor=\"end\" transform=\"rotate(-45 {center:.1} {label_y:.1})\">{}</text>\n",
                escape_xml(&bucket.label)
            ));
        }
    }

    let reference_y = y_of(counts.total_rows as f64);
    out.push_str(&format!(
        "<line class=\"total\" x1=\"{MARGIN_LEFT:.1}\" y1=\"{reference_y:.1}\" x2=\"{:.1}\" y2=\"{reference_y:.1}\" stroke=\"{REFERENCE_LINE_COLOR}\" stroke-width=\"1\" stroke-dasharray=\"6,4\"><title>total: {}</title></line>\n",
        MARGIN_LEFT + plot_width,
        counts.total_rows
    ));
    out.push_str("</svg>\n");
    out
}

/// Renders `counts` as horizontal text bars scaled against the total row
/// count, which is marked by a `┆` column.
pub fn render_terminal(counts: &BucketCounts, bar_width: usize) -> String {
    if counts.buckets.is_empty() {
        return format!("No buckets (total rows: {})\n", counts.total_rows);
    }

    let max_label = counts
        .buckets
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(5);
    let scale = counts.total_rows.max(counts.max_count()).max(1) as f64;
    let reference = ((counts.total_rows as f64 / scale) * bar_width as f64).round() as usize;

    let mut out = String::new();
    for bucket in &counts.buckets {
        let filled = ((bucket.count as f64 / scale) * bar_width as f64).round() as usize;
        let mut bar = String::with_capacity(bar_width * 3);
        for col in 0..bar_width.max(reference + 1) {
            let ch = if col < filled {
                '█'
            } else if col == reference {
                '┆'
            } else {
                ' '
            };
            bar.push(ch);
        }
        out.push_str(&format!(
            "{:<width$} {} {:>6}  [{}]\n",
            bucket.label,
            bar.trim_end(),
            bucket.count,
            bucket.color.name(),
            width = max_label
        ));
    }
    out.push_str(&format!(
        "{:<width$} total rows: {}\n",
        "",
        counts.total_rows,
        width = max_label
    ));
    out
}
