
use std::fs;
use std::process::Output;

use tempfile::tempdir;

use support_single::{run_barrage, spawn_http_server};

fn describe(output: &Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn parse_json_report(output: &Output) -> Result<serde_json::Value, String> {
    serde_json::from_slice(&output.stdout)
        .map_err(|err| format!("report is not JSON ({}): {}", err, describe(output)))
}

#[test]
fn e2e_single_cli_basic() -> Result<(), String> {
    let (url, _server) = spawn_http_server("200 OK")?;

    let output = run_barrage(["-u", url.as_str(), "-n", "20", "-c", "4"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("Total Requests: 20") || !stdout.contains("2xx: 20") {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_single_json_report_counts_every_request() -> Result<(), String> {
    let (url, _server) = spawn_http_server("503 Service Unavailable")?;

    for concurrency in ["1", "5"] {
        let output = run_barrage([
            "--url",
            url.as_str(),
            "--requests",
            "15",
            "--concurrent",
            concurrency,
            "--output-format",
            "json",
        ])?;
        if !output.status.success() {
            return Err(describe(&output));
        }
        let report = parse_json_report(&output)?;
        let server_errors = report
            .get("outcomes")
            .and_then(|outcomes| outcomes.get("5xx"))
            .and_then(serde_json::Value::as_u64);
        let failed = report
            .get("failed_requests")
            .and_then(serde_json::Value::as_u64);
        if server_errors != Some(15) || failed != Some(15) {
            return Err(format!("c={}: {}", concurrency, describe(&output)));
        }
    }
    Ok(())
}

#[test]
fn e2e_single_exports() -> Result<(), String> {
    let (url, _server) = spawn_http_server("200 OK")?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let export_csv = dir.path().join("responses.csv");
    let export_json = dir.path().join("run.json");

    let output = run_barrage([
        "-u".to_owned(),
        url,
        "-n".to_owned(),
        "6".to_owned(),
        "-c".to_owned(),
        "3".to_owned(),
        "--export-csv".to_owned(),
        export_csv.to_string_lossy().into_owned(),
        "--export-json".to_owned(),
        export_json.to_string_lossy().into_owned(),
    ])?;
    if !output.status.success() {
        return Err(describe(&output));
    }

    let csv = fs::read_to_string(&export_csv).map_err(|err| format!("read csv failed: {}", err))?;
    if csv.lines().count() != 7 {
        return Err(format!("Expected header plus 6 rows, got:\n{}", csv));
    }
    let json = fs::read_to_string(&export_json).map_err(|err| format!("read json failed: {}", err))?;
    if !json.contains("\"records\"") || !json.contains("\"summary\"") {
        return Err(format!("Unexpected JSON export:\n{}", json));
    }
    Ok(())
}

#[test]
fn e2e_single_config_file_supplies_target() -> Result<(), String> {
    let (url, _server) = spawn_http_server("200 OK")?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config_path = dir.path().join("run.toml");
    fs::write(
        &config_path,
        format!(
            "url = \"{}\"\nrequests = 4\nconcurrent = 2\noutput_format = \"json\"\n",
            url
        ),
    )
    .map_err(|err| format!("write config failed: {}", err))?;

    let output = run_barrage(["--config".to_owned(), config_path.to_string_lossy().into_owned()])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let report = parse_json_report(&output)?;
    if report.get("total_requests").and_then(serde_json::Value::as_u64) != Some(4) {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_single_unreachable_target_counts_failures() -> Result<(), String> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind closed port failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("closed port addr failed: {}", err))?;
    drop(listener);
    let url = format!("http://{}", addr);

    let output = run_barrage([
        "-u",
        url.as_str(),
        "-n",
        "3",
        "-c",
        "2",
        "--connect-timeout",
        "2s",
        "-o",
        "json",
    ])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let report = parse_json_report(&output)?;
    let unknown = report
        .get("outcomes")
        .and_then(|outcomes| outcomes.get("unknown"))
        .and_then(serde_json::Value::as_u64);
    if unknown != Some(3) {
        return Err(describe(&output));
    }
    Ok(())
}

#[test]
fn e2e_single_missing_url_fails() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config_path = dir.path().join("empty.toml");
    fs::write(&config_path, "requests = 2\n").map_err(|err| format!("write config failed: {}", err))?;

    let output = run_barrage(["--config".to_owned(), config_path.to_string_lossy().into_owned()])?;
    if output.status.success() {
        return Err(format!("Expected failure without a URL. {}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_single_zero_concurrency_is_rejected() -> Result<(), String> {
    let output = run_barrage(["-u", "http://127.0.0.1:9/", "-c", "0"])?;
    if output.status.success() {
        return Err(format!("Expected zero concurrency to fail. {}", describe(&output)));
    }
    Ok(())
}

#[test]
fn e2e_single_display_keeps_json_report_parseable() -> Result<(), String> {
    let (url, _server) = spawn_http_server("200 OK")?;

    let output = run_barrage(["-u", url.as_str(), "-n", "3", "-c", "2", "-o", "json", "--display"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    let report = parse_json_report(&output)?;
    if report.get("total_requests").and_then(serde_json::Value::as_u64) != Some(3) {
        return Err(describe(&output));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.matches("status=200").count() != 3 {
        return Err(format!("Expected 3 display lines on stderr. {}", describe(&output)));
    }
    Ok(())
}
