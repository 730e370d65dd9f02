mod util;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use lazy_static::lazy_static;
use review_sentiment::dto::AnalysisRequest;
use review_sentiment::error::AnalysisError;
use review_sentiment::response::make_response_payload;
use review_sentiment::util::{get_env_var, get_region};
use review_sentiment::{query, score, SentimentAnalyzer, SCORE_EXPORT_FILE};
use rusoto_core::{Client, Region};
use rusoto_s3::S3Client;
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

lazy_static! {
    // AWS Region
    static ref REGION: Region = get_region().unwrap();
    // Object key of the side-channel score export
    static ref EXPORT_KEY: String =
        get_env_var("EXPORT_KEY").unwrap_or_else(|_| String::from(SCORE_EXPORT_FILE));
    // Lexicon is loaded once per container
    static ref ANALYZER: SentimentAnalyzer = SentimentAnalyzer::new();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .without_time()
        .init();
    run(service_fn(process)).await?;
    Ok(())
}

async fn process(event: LambdaEvent<AnalysisRequest>) -> Result<Value, Error> {
    let (request, _context) = event.into_parts();
    let result = analyze(request).await;
    make_response_payload(result)
}

async fn analyze(request: AnalysisRequest) -> Result<Value, AnalysisError> {
    let start = std::time::Instant::now();
    let client = S3Client::new_with_client(Client::shared(), REGION.clone());
    let table = util::pull_data_file(&client, &request.data).await?;
    info!(
        rows = table.len(),
        "File downloaded and cleaned in {:.4} secs",
        start.elapsed().as_secs_f64()
    );
    let start = std::time::Instant::now();
    let dataset = score(&ANALYZER, table);
    info!(
        "Scored reviews in {:.4} secs",
        start.elapsed().as_secs_f64()
    );
    let export = match util::push_score_export(&client, &request.data, &EXPORT_KEY, &dataset).await
    {
        Ok(location) => Some(location),
        Err(err) => {
            warn!(error = %err.msg, "score export failed");
            None
        }
    };
    let outcome = query::run(&dataset, &request.query)?;
    info!(question = request.query.id(), "Query answered");
    let outcome = serde_json::to_value(outcome).map_err(AnalysisError::internal)?;
    let options = serde_json::to_value(dataset.options()).map_err(AnalysisError::internal)?;
    let export = serde_json::to_value(export).map_err(AnalysisError::internal)?;
    Ok(json!({
        "outcome": outcome,
        "options": options,
        "export": export,
    }))
}
