//! The thirteen analysis questions over a scored dataset.
//!
//! Product-keyed single-answer questions are described as [`Plan`] values
//! evaluated by one function; the remaining questions share the same
//! [`group_by`] primitive with their own result shapes.

mod aggregate;
mod result;

pub use aggregate::{arg_max, arg_min, group_by, reduce, sort_descending, Reduction};
pub use result::{
    ChartKind, ChartSeries, CrossTab, Metric, ProductShares, QueryOutcome, QueryResult, Ranked,
    Series, Share, TimePoint,
};

use crate::dataset::Dataset;
use crate::dto::{ScoredRecord, SentimentCategory, TimeGranularity};
use crate::error::AnalysisError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

const TOP_N: usize = 5;
const CHART_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "question", rename_all = "kebab-case")]
pub enum Query {
    TopProduct,
    MostFiveStar,
    WorstProduct,
    TopFive,
    RatingBreakdown,
    MostReviewed,
    MostNegative,
    SentimentDistribution,
    MostNeutral,
    SentimentTrend {
        #[serde(default)]
        granularity: TimeGranularity,
    },
    MostEngaging,
    ProductTrend {
        product: String,
        year: i32,
    },
    ProductSentiment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub number: u8,
    pub id: &'static str,
    pub question: &'static str,
}

const CATALOG: [CatalogEntry; 13] = [
    CatalogEntry {
        number: 1,
        id: "top-product",
        question: "Which is the top product preferred by customers?",
    },
    CatalogEntry {
        number: 2,
        id: "most-five-star",
        question: "Which product has the most 5-star ratings?",
    },
    CatalogEntry {
        number: 3,
        id: "worst-product",
        question: "Which product is the worst?",
    },
    CatalogEntry {
        number: 4,
        id: "top-five",
        question: "Which are the top five products?",
    },
    CatalogEntry {
        number: 5,
        id: "rating-breakdown",
        question: "How is each product rated?",
    },
    CatalogEntry {
        number: 6,
        id: "most-reviewed",
        question: "Which product has received the most reviews?",
    },
    CatalogEntry {
        number: 7,
        id: "most-negative",
        question: "Which product has the most negative reviews?",
    },
    CatalogEntry {
        number: 8,
        id: "sentiment-distribution",
        question: "What is the overall customer sentiment?",
    },
    CatalogEntry {
        number: 9,
        id: "most-neutral",
        question: "Which product has the most mixed (neutral) reviews?",
    },
    CatalogEntry {
        number: 10,
        id: "sentiment-trend",
        question: "How has sentiment changed over time?",
    },
    CatalogEntry {
        number: 11,
        id: "most-engaging",
        question: "Which product has the most customer engagement?",
    },
    CatalogEntry {
        number: 12,
        id: "product-trend",
        question: "How did a product's sentiment move across a year?",
    },
    CatalogEntry {
        number: 13,
        id: "product-sentiment",
        question: "What is the sentiment split for each product?",
    },
];

impl Query {
    /// The question menu, in display order.
    pub fn catalog() -> &'static [CatalogEntry] {
        &CATALOG
    }

    pub fn number(&self) -> u8 {
        match self {
            Query::TopProduct => 1,
            Query::MostFiveStar => 2,
            Query::WorstProduct => 3,
            Query::TopFive => 4,
            Query::RatingBreakdown => 5,
            Query::MostReviewed => 6,
            Query::MostNegative => 7,
            Query::SentimentDistribution => 8,
            Query::MostNeutral => 9,
            Query::SentimentTrend { .. } => 10,
            Query::MostEngaging => 11,
            Query::ProductTrend { .. } => 12,
            Query::ProductSentiment => 13,
        }
    }

    pub fn id(&self) -> &'static str {
        CATALOG[usize::from(self.number() - 1)].id
    }

    fn title(&self) -> &'static str {
        match self {
            Query::TopProduct => "Top Product Preferred by Customers",
            Query::MostFiveStar => "Product with Most 5-Star Ratings",
            Query::WorstProduct => "Worst Product",
            Query::TopFive => "Top 5 Products by Sentiment Score",
            Query::RatingBreakdown => "Ratings Breakdown for Each Product",
            Query::MostReviewed => "Most Reviewed Product",
            Query::MostNegative => "Most Negative Product",
            Query::SentimentDistribution => "Overall Customer Sentiment Distribution",
            Query::MostNeutral => "Product with Most Neutral Reviews",
            Query::SentimentTrend { .. } => "Sentiment Trend Over Time",
            Query::MostEngaging => "Most Engaging Product",
            Query::ProductTrend { .. } => "Sentiment Trend for a Product Over a Year",
            Query::ProductSentiment => "Sentiment Analysis for Each Product",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Filter {
    All,
    Rating(i64),
    Category(SentimentCategory),
}

impl Filter {
    fn matches(&self, record: &ScoredRecord) -> bool {
        match self {
            Filter::All => true,
            Filter::Rating(rating) => record.review.rating == *rating,
            Filter::Category(category) => record.category() == *category,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pick {
    Highest,
    Lowest,
}

#[derive(Debug, Clone, Copy)]
enum OnEmpty {
    /// No candidate is a data error
    Fail(&'static str),
    /// No candidate is a legitimate answer
    Report(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct TopChart {
    limit: usize,
    title: &'static str,
}

/// A product-keyed question answered by one product.
#[derive(Debug, Clone, Copy)]
struct Plan {
    filter: Filter,
    reduction: Reduction,
    pick: Pick,
    on_empty: OnEmpty,
    /// `{product}` is replaced by the answer
    message: &'static str,
    chart: Option<TopChart>,
}

const NO_REVIEWS: &str = "No reviews found in the dataset.";

const TOP_PRODUCT: Plan = Plan {
    filter: Filter::All,
    reduction: Reduction::MeanScore,
    pick: Pick::Highest,
    on_empty: OnEmpty::Fail(NO_REVIEWS),
    message: "{product} is the most preferred product based on customer sentiment.",
    chart: None,
};

const MOST_FIVE_STAR: Plan = Plan {
    filter: Filter::Rating(5),
    reduction: Reduction::Count,
    pick: Pick::Highest,
    on_empty: OnEmpty::Fail("No 5-star ratings found in the dataset."),
    message: "{product} has received the most 5-star ratings.",
    chart: None,
};

const WORST_PRODUCT: Plan = Plan {
    filter: Filter::All,
    reduction: Reduction::MeanScore,
    pick: Pick::Lowest,
    on_empty: OnEmpty::Fail(NO_REVIEWS),
    message: "{product} is rated as the worst product by customers.",
    chart: None,
};

const MOST_REVIEWED: Plan = Plan {
    filter: Filter::All,
    reduction: Reduction::Count,
    pick: Pick::Highest,
    on_empty: OnEmpty::Fail(NO_REVIEWS),
    message: "{product} has received the highest number of reviews.",
    chart: Some(TopChart {
        limit: CHART_LIMIT,
        title: "Top 10 Most Reviewed Products",
    }),
};

const MOST_NEGATIVE: Plan = Plan {
    filter: Filter::Category(SentimentCategory::Negative),
    reduction: Reduction::Count,
    pick: Pick::Highest,
    on_empty: OnEmpty::Fail("No negative reviews found in the dataset."),
    message: "{product} has received the most negative reviews.",
    chart: Some(TopChart {
        limit: CHART_LIMIT,
        title: "Top 10 Most Negative Products",
    }),
};

const MOST_NEUTRAL: Plan = Plan {
    filter: Filter::Category(SentimentCategory::Neutral),
    reduction: Reduction::Count,
    pick: Pick::Highest,
    on_empty: OnEmpty::Report("No neutral reviews found in the dataset."),
    message: "{product} has received the highest number of neutral reviews.",
    chart: None,
};

const MOST_ENGAGING: Plan = Plan {
    message: "{product} has received the most total reviews, indicating high customer engagement.",
    chart: None,
    ..MOST_REVIEWED
};

impl From<Reduction> for Metric {
    fn from(reduction: Reduction) -> Self {
        match reduction {
            Reduction::Count => Metric::Count,
            Reduction::MeanScore => Metric::MeanScore,
        }
    }
}

///
/// Answers `query` over `dataset`.
///
/// Fails with `MissingField` when the question needs a product or timestamp
/// column the dataset lacks, and with `NoData` when a single-answer question
/// has no candidate rows. Questions whose empty answer is meaningful return
/// [`QueryResult::NotFound`] instead.
///
pub fn run(dataset: &Dataset, query: &Query) -> Result<QueryOutcome, AnalysisError> {
    debug!(question = query.id(), records = dataset.len(), "running query");
    match query {
        Query::TopProduct => single_product(dataset, query, &TOP_PRODUCT),
        Query::MostFiveStar => single_product(dataset, query, &MOST_FIVE_STAR),
        Query::WorstProduct => single_product(dataset, query, &WORST_PRODUCT),
        Query::TopFive => top_five(dataset, query),
        Query::RatingBreakdown => rating_breakdown(dataset, query),
        Query::MostReviewed => single_product(dataset, query, &MOST_REVIEWED),
        Query::MostNegative => single_product(dataset, query, &MOST_NEGATIVE),
        Query::SentimentDistribution => Ok(sentiment_distribution(dataset, query)),
        Query::MostNeutral => single_product(dataset, query, &MOST_NEUTRAL),
        Query::SentimentTrend { granularity } => sentiment_trend(dataset, query, *granularity),
        Query::MostEngaging => single_product(dataset, query, &MOST_ENGAGING),
        Query::ProductTrend { product, year } => product_trend(dataset, query, product, *year),
        Query::ProductSentiment => product_sentiment(dataset, query),
    }
}

fn outcome(
    query: &Query,
    message: String,
    result: QueryResult,
    charts: Vec<ChartSeries>,
) -> QueryOutcome {
    QueryOutcome {
        question: query.number(),
        title: query.title().to_string(),
        message,
        result,
        charts,
    }
}

fn product_key(record: &ScoredRecord) -> &str {
    record.product().unwrap_or_default()
}

fn single_product(
    dataset: &Dataset,
    query: &Query,
    plan: &Plan,
) -> Result<QueryOutcome, AnalysisError> {
    dataset.require_product()?;
    let groups = group_by(dataset.records(), |r| plan.filter.matches(r), product_key);
    let values = reduce(&groups, plan.reduction);
    let picked = match plan.pick {
        Pick::Highest => arg_max(&values),
        Pick::Lowest => arg_min(&values),
    };
    let Some(&(product, value)) = picked else {
        return match plan.on_empty {
            OnEmpty::Fail(msg) => Err(AnalysisError::no_data(msg)),
            OnEmpty::Report(msg) => Ok(outcome(
                query,
                msg.to_string(),
                QueryResult::NotFound {
                    message: msg.to_string(),
                },
                Vec::new(),
            )),
        };
    };
    let charts = plan
        .chart
        .iter()
        .map(|chart| {
            let mut ranked = values.clone();
            sort_descending(&mut ranked);
            ranked.truncate(chart.limit);
            ChartSeries::single(
                ChartKind::Bar,
                chart.title.to_string(),
                "Product",
                "Reviews",
                ranked.into_iter().map(|(p, v)| (p.to_string(), v)),
            )
        })
        .collect();
    Ok(outcome(
        query,
        plan.message.replace("{product}", product),
        QueryResult::Label {
            product: product.to_string(),
            metric: plan.reduction.into(),
            value,
        },
        charts,
    ))
}

fn top_five(dataset: &Dataset, query: &Query) -> Result<QueryOutcome, AnalysisError> {
    dataset.require_product()?;
    let groups = group_by(dataset.records(), |_| true, product_key);
    let mut means = reduce(&groups, Reduction::MeanScore);
    sort_descending(&mut means);
    means.truncate(TOP_N);
    let chart = ChartSeries::single(
        ChartKind::Bar,
        query.title().to_string(),
        "Product",
        "Average Sentiment Score",
        means.iter().map(|&(p, v)| (p.to_string(), v)),
    );
    let ranking = means
        .into_iter()
        .map(|(product, value)| Ranked {
            product: product.to_string(),
            value,
        })
        .collect();
    Ok(outcome(
        query,
        String::from("These are the top-performing products based on sentiment scores."),
        QueryResult::Ranking(ranking),
        vec![chart],
    ))
}

fn rating_breakdown(dataset: &Dataset, query: &Query) -> Result<QueryOutcome, AnalysisError> {
    dataset.require_product()?;
    let groups = group_by(dataset.records(), |_| true, product_key);
    let ratings: Vec<i64> = dataset
        .records()
        .iter()
        .map(|r| r.review.rating)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let counts: Vec<Vec<usize>> = groups
        .iter()
        .map(|(_, members)| {
            ratings
                .iter()
                .map(|&rating| members.iter().filter(|r| r.review.rating == rating).count())
                .collect()
        })
        .collect();
    let rows: Vec<String> = groups.iter().map(|(p, _)| p.to_string()).collect();
    let columns: Vec<String> = ratings.iter().map(i64::to_string).collect();
    let chart = ChartSeries {
        kind: ChartKind::StackedBar,
        title: query.title().to_string(),
        x_label: String::from("Product"),
        y_label: String::from("Count"),
        labels: rows.clone(),
        series: columns
            .iter()
            .enumerate()
            .map(|(j, rating)| Series {
                name: rating.clone(),
                values: counts.iter().map(|row| row[j] as f64).collect(),
            })
            .collect(),
    };
    Ok(outcome(
        query,
        String::from("Rating counts for each product."),
        QueryResult::Breakdown(CrossTab {
            rows,
            columns,
            counts,
        }),
        vec![chart],
    ))
}

fn share(label: &str, count: usize, total: usize) -> Share {
    Share {
        label: label.to_string(),
        count,
        proportion: if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        },
    }
}

fn sentiment_distribution(dataset: &Dataset, query: &Query) -> QueryOutcome {
    let groups = group_by(dataset.records(), |_| true, |r| r.category());
    let mut counts = reduce(&groups, Reduction::Count);
    sort_descending(&mut counts);
    let shares: Vec<Share> = counts
        .iter()
        .map(|&(category, count)| share(category.as_str(), count as usize, dataset.len()))
        .collect();
    let chart = ChartSeries::single(
        ChartKind::Pie,
        query.title().to_string(),
        "Sentiment",
        "Reviews",
        counts
            .iter()
            .map(|&(category, count)| (category.as_str().to_string(), count)),
    );
    outcome(
        query,
        String::from("Overall distribution of customer sentiment categories."),
        QueryResult::Distribution(shares),
        vec![chart],
    )
}

fn bucket_start(date: NaiveDate, granularity: TimeGranularity) -> NaiveDate {
    let start = match granularity {
        TimeGranularity::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
        TimeGranularity::Month => date.with_day(1),
        TimeGranularity::Day => Some(date),
    };
    start.unwrap_or(date)
}

fn bucket_label(date: NaiveDate, granularity: TimeGranularity) -> String {
    let format = match granularity {
        TimeGranularity::Year => "%Y",
        TimeGranularity::Month => "%Y-%m",
        TimeGranularity::Day => "%Y-%m-%d",
    };
    date.format(format).to_string()
}

/// Mean score per time bucket, oldest bucket first.
fn time_series<F>(dataset: &Dataset, filter: F, granularity: TimeGranularity) -> Vec<TimePoint>
where
    F: Fn(&ScoredRecord) -> bool,
{
    let mut groups: Vec<(NaiveDate, Vec<&ScoredRecord>)> = group_by(dataset.records(), filter, |r| {
        r.review
            .timestamp
            .map(|ts| bucket_start(ts.date(), granularity))
    })
    .into_iter()
    .filter_map(|(bucket, members)| bucket.map(|date| (date, members)))
    .collect();
    groups.sort_by_key(|(date, _)| *date);
    groups
        .into_iter()
        .map(|(date, members)| TimePoint {
            bucket: bucket_label(date, granularity),
            mean_score: Reduction::MeanScore.apply(&members),
            reviews: members.len(),
        })
        .collect()
}

fn line_chart(title: String, x_label: &str, points: &[TimePoint]) -> ChartSeries {
    ChartSeries::single(
        ChartKind::Line,
        title,
        x_label,
        "Average Sentiment Score",
        points.iter().map(|p| (p.bucket.clone(), p.mean_score)),
    )
}

fn sentiment_trend(
    dataset: &Dataset,
    query: &Query,
    granularity: TimeGranularity,
) -> Result<QueryOutcome, AnalysisError> {
    dataset.require_timestamp()?;
    let points = time_series(dataset, |_| true, granularity);
    let chart = line_chart(
        format!("Customer Sentiment Trend Over Time ({})", granularity.label()),
        granularity.label(),
        &points,
    );
    Ok(outcome(
        query,
        String::from("This shows how customer sentiment has evolved over time."),
        QueryResult::TimeSeries(points),
        vec![chart],
    ))
}

fn product_trend(
    dataset: &Dataset,
    query: &Query,
    product: &str,
    year: i32,
) -> Result<QueryOutcome, AnalysisError> {
    dataset.require_product()?;
    dataset.require_timestamp()?;
    let points = time_series(
        dataset,
        |r| r.product() == Some(product) && r.review.timestamp.map(|ts| ts.year()) == Some(year),
        TimeGranularity::Month,
    );
    if points.is_empty() {
        let message = format!("No data found for {product} in {year}.");
        return Ok(outcome(
            query,
            message.clone(),
            QueryResult::NotFound { message },
            Vec::new(),
        ));
    }
    let chart = line_chart(
        format!("Sentiment Trend Over Months - {product} ({year})"),
        "Month",
        &points,
    );
    Ok(outcome(
        query,
        format!("Average monthly sentiment for {product} in {year}."),
        QueryResult::TimeSeries(points),
        vec![chart],
    ))
}

fn product_sentiment(dataset: &Dataset, query: &Query) -> Result<QueryOutcome, AnalysisError> {
    dataset.require_product()?;
    let groups = group_by(dataset.records(), |_| true, product_key);
    let per_product: Vec<ProductShares> = groups
        .iter()
        .map(|(product, members)| ProductShares {
            product: product.to_string(),
            total: members.len(),
            shares: SentimentCategory::ALL
                .iter()
                .map(|category| {
                    let count = members.iter().filter(|r| r.category() == *category).count();
                    share(category.as_str(), count, members.len())
                })
                .collect(),
        })
        .collect();
    let charts = per_product
        .iter()
        .map(|entry| {
            ChartSeries::single(
                ChartKind::Pie,
                format!("Sentiment Analysis for {}", entry.product),
                "Sentiment",
                "Reviews",
                entry
                    .shares
                    .iter()
                    .map(|s| (s.label.clone(), s.count as f64)),
            )
        })
        .collect();
    Ok(outcome(
        query,
        String::from("Sentiment category split for each product."),
        QueryResult::PerProduct(per_product),
        charts,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::ReviewRecord;
    use crate::error::ErrorKind;
    use chrono::NaiveDateTime;

    fn at(date: &str) -> Option<NaiveDateTime> {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    fn row(product: &str, rating: i64, score: f64, date: &str) -> ScoredRecord {
        ScoredRecord::new(
            ReviewRecord {
                product: Some(product.to_string()),
                text: String::from("text"),
                rating,
                timestamp: at(date),
            },
            score,
        )
    }

    fn sample() -> Dataset {
        Dataset::new(
            vec![
                row("Widget", 5, 0.6249, "2023-01-01"),
                row("Widget", 1, -0.4767, "2023-06-01"),
                row("Gadget", 3, 0.296, "2023-03-01"),
                row("Gizmo", 5, 0.0, "2022-11-15"),
                row("Gizmo", 4, 0.0, "2023-03-20"),
                row("Widget", 2, -0.3412, "2023-06-20"),
            ],
            true,
            true,
        )
    }

    fn label(outcome: &QueryOutcome) -> (&str, f64) {
        match &outcome.result {
            QueryResult::Label { product, value, .. } => (product.as_str(), *value),
            other => panic!("expected a label, got {other:?}"),
        }
    }

    #[test]
    fn top_and_worst_product() {
        let dataset = sample();
        let top = run(&dataset, &Query::TopProduct).unwrap();
        assert_eq!(label(&top).0, "Gadget");
        assert_eq!(top.question, 1);
        assert_eq!(
            top.message,
            "Gadget is the most preferred product based on customer sentiment."
        );
        let worst = run(&dataset, &Query::WorstProduct).unwrap();
        assert_eq!(label(&worst).0, "Widget");
    }

    #[test]
    fn tied_means_resolve_to_first_product() {
        let dataset = Dataset::new(
            vec![
                row("Late", 3, 0.1, "2023-01-01"),
                row("Early", 3, 0.5, "2023-01-01"),
                row("Other", 3, 0.5, "2023-01-01"),
                row("Late", 3, 0.9, "2023-01-01"),
            ],
            true,
            true,
        );
        for _ in 0..5 {
            assert_eq!(label(&run(&dataset, &Query::TopProduct).unwrap()).0, "Late");
        }
        assert_eq!(label(&run(&dataset, &Query::WorstProduct).unwrap()).0, "Late");
    }

    #[test]
    fn five_star_counts() {
        let outcome = run(&sample(), &Query::MostFiveStar).unwrap();
        assert_eq!(label(&outcome), ("Widget", 1.0));

        let dataset = Dataset::new(vec![row("Widget", 4, 0.5, "2023-01-01")], true, true);
        let err = run(&dataset, &Query::MostFiveStar).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoData);
    }

    #[test]
    fn top_five_takes_available_products() {
        let outcome = run(&sample(), &Query::TopFive).unwrap();
        let QueryResult::Ranking(ranking) = &outcome.result else {
            panic!("expected ranking");
        };
        let names: Vec<&str> = ranking.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(names, vec!["Gadget", "Gizmo", "Widget"]);

        let many = Dataset::new(
            (0..8)
                .map(|i| row(&format!("P{i}"), 3, i as f64 / 10.0, "2023-01-01"))
                .collect(),
            true,
            true,
        );
        let outcome = run(&many, &Query::TopFive).unwrap();
        let QueryResult::Ranking(ranking) = &outcome.result else {
            panic!("expected ranking");
        };
        assert_eq!(ranking.len(), 5);
        assert_eq!(ranking[0].product, "P7");
        assert_eq!(outcome.charts[0].labels.len(), 5);
    }

    #[test]
    fn rating_breakdown_fills_missing_buckets() {
        let outcome = run(&sample(), &Query::RatingBreakdown).unwrap();
        let QueryResult::Breakdown(table) = &outcome.result else {
            panic!("expected breakdown");
        };
        assert_eq!(table.rows, vec!["Widget", "Gadget", "Gizmo"]);
        assert_eq!(table.columns, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(table.counts[0], vec![1, 1, 0, 0, 1]);
        assert_eq!(table.counts[1], vec![0, 0, 1, 0, 0]);
        assert_eq!(table.counts[2], vec![0, 0, 0, 1, 1]);
        assert_eq!(outcome.charts[0].series.len(), 5);
    }

    #[test]
    fn most_reviewed_and_engaging_agree() {
        let dataset = sample();
        let reviewed = run(&dataset, &Query::MostReviewed).unwrap();
        let engaging = run(&dataset, &Query::MostEngaging).unwrap();
        assert_eq!(label(&reviewed), ("Widget", 3.0));
        assert_eq!(label(&engaging), ("Widget", 3.0));
        assert_eq!(reviewed.charts.len(), 1);
        assert!(engaging.charts.is_empty());
        assert_ne!(reviewed.message, engaging.message);
    }

    #[test]
    fn most_negative_requires_negative_reviews() {
        assert_eq!(label(&run(&sample(), &Query::MostNegative).unwrap()), ("Widget", 2.0));

        let dataset = Dataset::new(vec![row("Widget", 5, 0.6, "2023-01-01")], true, true);
        let err = run(&dataset, &Query::MostNegative).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoData);
    }

    #[test]
    fn most_neutral_reports_absence() {
        assert_eq!(label(&run(&sample(), &Query::MostNeutral).unwrap()), ("Gizmo", 2.0));

        let dataset = Dataset::new(vec![row("Widget", 5, 0.6, "2023-01-01")], true, true);
        let outcome = run(&dataset, &Query::MostNeutral).unwrap();
        assert_eq!(
            outcome.result,
            QueryResult::NotFound {
                message: String::from("No neutral reviews found in the dataset.")
            }
        );
    }

    #[test]
    fn distribution_shares_sum_to_one() {
        let outcome = run(&sample(), &Query::SentimentDistribution).unwrap();
        let QueryResult::Distribution(shares) = &outcome.result else {
            panic!("expected distribution");
        };
        let labels: Vec<&str> = shares.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Positive", "Negative", "Neutral"]);
        let total: f64 = shares.iter().map(|s| s.proportion).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sentiment_trend_buckets_chronologically() {
        let outcome = run(
            &sample(),
            &Query::SentimentTrend {
                granularity: TimeGranularity::Month,
            },
        )
        .unwrap();
        let QueryResult::TimeSeries(points) = &outcome.result else {
            panic!("expected time series");
        };
        let buckets: Vec<&str> = points.iter().map(|p| p.bucket.as_str()).collect();
        assert_eq!(buckets, vec!["2022-11", "2023-01", "2023-03", "2023-06"]);
        assert_eq!(points[3].reviews, 2);
        assert!((points[3].mean_score - (-0.4767 - 0.3412) / 2.0).abs() < 1e-12);

        let yearly = run(
            &sample(),
            &Query::SentimentTrend {
                granularity: TimeGranularity::Year,
            },
        )
        .unwrap();
        let QueryResult::TimeSeries(points) = &yearly.result else {
            panic!("expected time series");
        };
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].bucket, "2022");
    }

    #[test]
    fn trend_queries_need_timestamps() {
        let dataset = Dataset::new(vec![row("Widget", 5, 0.6, "2023-01-01")], true, false);
        let err = run(
            &dataset,
            &Query::SentimentTrend {
                granularity: TimeGranularity::Day,
            },
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingField);
        assert!(err.msg.contains("'timestamp'"));
    }

    #[test]
    fn product_trend_by_month() {
        let query = Query::ProductTrend {
            product: String::from("Widget"),
            year: 2023,
        };
        let outcome = run(&sample(), &query).unwrap();
        let QueryResult::TimeSeries(points) = &outcome.result else {
            panic!("expected time series");
        };
        let buckets: Vec<&str> = points.iter().map(|p| p.bucket.as_str()).collect();
        assert_eq!(buckets, vec!["2023-01", "2023-06"]);
        assert_eq!(outcome.charts[0].title, "Sentiment Trend Over Months - Widget (2023)");

        let query = Query::ProductTrend {
            product: String::from("Widget"),
            year: 2021,
        };
        let outcome = run(&sample(), &query).unwrap();
        assert!(matches!(outcome.result, QueryResult::NotFound { .. }));
        assert_eq!(outcome.message, "No data found for Widget in 2021.");
    }

    #[test]
    fn product_sentiment_covers_every_category() {
        let outcome = run(&sample(), &Query::ProductSentiment).unwrap();
        let QueryResult::PerProduct(entries) = &outcome.result else {
            panic!("expected per-product shares");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(outcome.charts.len(), 3);
        let gadget = &entries[1];
        assert_eq!(gadget.product, "Gadget");
        let counts: Vec<usize> = gadget.shares.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![1, 0, 0]);
    }

    #[test]
    fn product_questions_need_product_column() {
        let mut record = row("Widget", 5, 0.6, "2023-01-01");
        record.review.product = None;
        let dataset = Dataset::new(vec![record], false, true);
        for query in [Query::TopProduct, Query::TopFive, Query::ProductSentiment] {
            let err = run(&dataset, &query).unwrap_err();
            assert_eq!(err.kind, ErrorKind::MissingField);
        }
        assert!(run(&dataset, &Query::SentimentDistribution).is_ok());
    }

    #[test]
    fn empty_dataset_has_no_top_product() {
        let dataset = Dataset::new(Vec::new(), true, true);
        let err = run(&dataset, &Query::TopProduct).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoData);
    }

    #[test]
    fn catalog_ids_deserialize_to_matching_queries() {
        for entry in Query::catalog() {
            let event = match entry.id {
                "product-trend" => {
                    serde_json::json!({ "question": entry.id, "product": "Widget", "year": 2023 })
                }
                _ => serde_json::json!({ "question": entry.id }),
            };
            let query: Query = serde_json::from_value(event).unwrap();
            assert_eq!(query.number(), entry.number);
            assert_eq!(query.id(), entry.id);
        }
    }

    #[test]
    fn outcome_serializes_tagged_result() {
        let outcome = run(&sample(), &Query::MostFiveStar).unwrap();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["result"]["kind"], "label");
        assert_eq!(value["result"]["data"]["product"], "Widget");
        assert_eq!(value["result"]["data"]["metric"], "count");
    }
}
