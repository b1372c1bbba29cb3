//! Illustrative rate trend chart.
//!
//! The series drawn here is synthetic: seven values jittered around the one
//! live rate of the current conversion. It is a visual cue, not historical
//! data; nothing in it is persisted or fetched.

use rand::Rng;
use rasciigraph::{Config, plot};

/// Half-width of the jitter band around the live rate.
const JITTER: f64 = 0.025;

/// Fixed labels for the synthetic week, oldest first.
pub const LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Today"];

/// Seven (label, value) points, each value within `rate ± 0.025`.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    points: Vec<(&'static str, f64)>,
}

impl ChartSeries {
    pub fn synthesize(rate: f64) -> Self {
        let mut rng = rand::rng();
        let points = LABELS
            .iter()
            .map(|label| (*label, rate + rng.random_range(-JITTER..=JITTER)))
            .collect();
        ChartSeries { points }
    }

    pub fn points(&self) -> &[(&'static str, f64)] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, value)| *value).collect()
    }
}

/// A rendered chart for one currency pair.
#[derive(Debug, Clone)]
pub struct RateChart {
    caption: String,
    series: ChartSeries,
    rendered: String,
}

impl RateChart {
    fn draw(from: &str, to: &str, rate: f64) -> Self {
        let series = ChartSeries::synthesize(rate);
        let caption = format!("{from} to {to} rate");

        let mut rendered = plot(
            series.values(),
            Config::default()
                .with_width(48)
                .with_height(10)
                .with_caption(caption.clone()),
        );
        rendered.push('\n');
        let labels = series
            .points()
            .iter()
            .map(|(label, value)| format!("{label} {value:.4}"))
            .collect::<Vec<_>>()
            .join("  ");
        rendered.push_str(&labels);

        RateChart {
            caption,
            series,
            rendered,
        }
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

/// Holds at most one live chart; rendering replaces the previous one.
#[derive(Default)]
pub struct ChartPane {
    current: Option<RateChart>,
}

impl ChartPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws a fresh chart for the pair, dropping any prior chart.
    pub fn render(&mut self, from: &str, to: &str, rate: f64) -> &RateChart {
        self.current.insert(RateChart::draw(from, to, rate))
    }

    pub fn current(&self) -> Option<&RateChart> {
        self.current.as_ref()
    }
}
