use review_sentiment::dto::DataFile;
use review_sentiment::error::AnalysisError;
use review_sentiment::util::{download_review_file, output_location, upload_csv};
use review_sentiment::{preprocess, write_scores, Dataset, ReviewTable};
use rusoto_s3::S3Client;

pub async fn pull_data_file(
    client: &S3Client,
    data: &DataFile,
) -> Result<ReviewTable, AnalysisError> {
    let bytes = download_review_file(client, data).await?;
    preprocess(bytes.as_slice())
}

/// Uploads the score column beside the input, under the `/output` prefix.
pub async fn push_score_export(
    client: &S3Client,
    source: &DataFile,
    key: &str,
    dataset: &Dataset,
) -> Result<DataFile, AnalysisError> {
    let mut body = Vec::new();
    write_scores(dataset, &mut body)?;
    let target = output_location(source, key);
    upload_csv(client, body, &target).await?;
    Ok(target)
}
