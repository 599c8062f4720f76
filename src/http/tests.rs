use super::*;
use crate::error::ValidationError;
use crate::metrics::{OutcomeGroup, UNKNOWN_STATUS};
use std::future::Future;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

struct StubServer {
    url: String,
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

const OK_RESPONSE: &str = "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello";
const NOT_FOUND_RESPONSE: &str =
    "HTTP/1.1 404 Not Found\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello";
/// Announces 100 body bytes but closes the connection after five.
const TRUNCATED_RESPONSE: &str =
    "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nhello";

/// Writes `response` verbatim to every connection, then closes it.
fn spawn_stub_server(response: &'static str) -> Result<StubServer, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    let handle = thread::spawn(move || {
        while !stop_flag.load(Ordering::SeqCst) {
            match listener.accept() {
                Ok((stream, _)) => {
                    thread::spawn(move || respond(stream, response));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok(StubServer {
        url: format!("http://{}/", addr),
        stop,
        thread: Some(handle),
    })
}

fn respond(mut stream: TcpStream, response: &str) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let mut buffer = [0u8; 1024];
    if stream.read(&mut buffer).is_err() {
        return;
    }
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    drop(stream.flush());
    drop(stream.shutdown(Shutdown::Both));
}

/// Returns an address nothing listens on.
fn closed_port_url() -> Result<String, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind closed port failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("closed port addr failed: {}", err))?;
    drop(listener);
    Ok(format!("http://{}/", addr))
}

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn executor(settings: &ClientSettings) -> Result<HttpExecutor, String> {
    let client = build_client(settings).map_err(|err| err.to_string())?;
    Ok(HttpExecutor::new(client))
}

#[test]
fn parse_target_accepts_http_and_https() -> Result<(), String> {
    for raw in ["http://localhost:8080/health", " https://example.com "] {
        parse_target(raw).map_err(|err| format!("{} rejected: {}", raw, err))?;
    }
    Ok(())
}

#[test]
fn parse_target_rejects_other_schemes() -> Result<(), String> {
    match parse_target("ftp://example.com/file") {
        Err(ValidationError::UnsupportedScheme { scheme }) if scheme == "ftp" => Ok(()),
        other => Err(format!("Expected UnsupportedScheme, got {:?}", other)),
    }
}

#[test]
fn parse_target_rejects_malformed_urls() -> Result<(), String> {
    match parse_target("not a url") {
        Err(ValidationError::InvalidUrl { .. }) => Ok(()),
        other => Err(format!("Expected InvalidUrl, got {:?}", other)),
    }
}

#[test]
fn build_client_accepts_disabled_redirects_and_keepalive() -> Result<(), String> {
    let settings = ClientSettings {
        redirect_limit: 0,
        disable_keepalive: true,
        ..ClientSettings::default()
    };
    build_client(&settings).map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn executor_records_success_status_and_timing() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server(OK_RESPONSE)?;
        let target = parse_target(&server.url).map_err(|err| err.to_string())?;
        let result = executor(&ClientSettings::default())?.execute(&target).await;

        if result.status_code != 200 || result.outcome() != OutcomeGroup::Successful {
            return Err(format!("Unexpected result {:?}", result));
        }
        if result.time_to_first_byte > result.duration {
            return Err(format!(
                "TTFB {:?} exceeds duration {:?}",
                result.time_to_first_byte, result.duration
            ));
        }
        Ok(())
    })
}

#[test]
fn executor_reports_error_statuses_verbatim() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server(NOT_FOUND_RESPONSE)?;
        let target = parse_target(&server.url).map_err(|err| err.to_string())?;
        let result = executor(&ClientSettings::default())?.execute(&target).await;

        if result.status_code != 404 || result.outcome() != OutcomeGroup::ClientError {
            return Err(format!("Unexpected result {:?}", result));
        }
        Ok(())
    })
}

#[test]
fn executor_folds_connection_failure_into_unknown() -> Result<(), String> {
    run_async_test(async {
        let target = parse_target(&closed_port_url()?).map_err(|err| err.to_string())?;
        let settings = ClientSettings {
            connect_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(2),
            ..ClientSettings::default()
        };
        let result = executor(&settings)?.execute(&target).await;

        if result.status_code != UNKNOWN_STATUS || result.outcome() != OutcomeGroup::Unknown {
            return Err(format!("Expected failure result, got {:?}", result));
        }
        if result.time_to_first_byte != result.duration {
            return Err("Failed requests report elapsed time as TTFB".to_owned());
        }
        Ok(())
    })
}

#[test]
fn executor_keeps_status_when_body_is_truncated() -> Result<(), String> {
    run_async_test(async {
        let server = spawn_stub_server(TRUNCATED_RESPONSE)?;
        let target = parse_target(&server.url).map_err(|err| err.to_string())?;
        let result = executor(&ClientSettings::default())?.execute(&target).await;

        if result.status_code != 200 || result.outcome() != OutcomeGroup::Successful {
            return Err(format!("Body read failure changed the result: {:?}", result));
        }
        if result.duration < result.time_to_first_byte {
            return Err(format!(
                "Duration {:?} shorter than TTFB {:?}",
                result.duration, result.time_to_first_byte
            ));
        }
        Ok(())
    })
}
