use serde::Serialize;

/// What a single-product answer was ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    MeanScore,
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked {
    pub product: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub proportion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductShares {
    pub product: String,
    pub total: usize,
    pub shares: Vec<Share>,
}

/// Counts with one row per product and one column per observed rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePoint {
    pub bucket: String,
    pub mean_score: f64,
    pub reviews: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum QueryResult {
    Label {
        product: String,
        metric: Metric,
        value: f64,
    },
    /// The query legitimately matched nothing.
    NotFound { message: String },
    Ranking(Vec<Ranked>),
    Distribution(Vec<Share>),
    Breakdown(CrossTab),
    PerProduct(Vec<ProductShares>),
    TimeSeries(Vec<TimePoint>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    StackedBar,
    Pie,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

///
/// Plot-ready data. `labels` index the x axis (or pie slices) and every
/// series carries one value per label.
///
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSeries {
    pub fn single<I>(kind: ChartKind, title: String, x_label: &str, y_label: &str, points: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let (labels, values): (Vec<String>, Vec<f64>) = points.into_iter().unzip();
        ChartSeries {
            kind,
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            labels,
            series: vec![Series {
                name: y_label.to_string(),
                values,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    /// Menu number of the question, 1 through 13
    pub question: u8,
    pub title: String,
    /// One-line human summary of the result
    pub message: String,
    pub result: QueryResult,
    pub charts: Vec<ChartSeries>,
}
