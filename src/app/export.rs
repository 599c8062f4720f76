use tokio::io::{AsyncWriteExt, BufWriter};

use crate::metrics::{Summary, TimedResult};

use super::report::{micros, summary_json};

pub(crate) async fn export_csv(path: &str, responses: &[TimedResult]) -> Result<(), std::io::Error> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(b"index,status_code,outcome,duration_us,ttfb_us\n")
        .await?;
    for (index, response) in responses.iter().enumerate() {
        let line = format!(
            "{},{},{},{},{}\n",
            index,
            response.status_code,
            response.outcome(),
            micros(response.duration),
            micros(response.time_to_first_byte)
        );
        writer.write_all(line.as_bytes()).await?;
    }
    writer.flush().await?;
    Ok(())
}

pub(crate) async fn export_json(
    path: &str,
    summary: &Summary,
    responses: &[TimedResult],
) -> Result<(), std::io::Error> {
    let records_json: Vec<serde_json::Value> = responses
        .iter()
        .map(|response| {
            serde_json::json!({
                "status_code": response.status_code,
                "outcome": response.outcome(),
                "duration_us": micros(response.duration),
                "ttfb_us": micros(response.time_to_first_byte)
            })
        })
        .collect();

    let payload = serde_json::json!({
        "summary": summary_json(summary),
        "records": records_json
    });

    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    let json = serde_json::to_vec_pretty(&payload).map_err(std::io::Error::other)?;
    writer.write_all(&json).await?;
    writer.flush().await?;
    Ok(())
}
