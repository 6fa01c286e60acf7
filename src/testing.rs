//! Test helpers: a tiny HTTP stand-in for the robot server.

use std::io::Read;
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread::JoinHandle;

use tiny_http::{Header, Response, Server};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

pub struct MockRobot {
    url: String,
    handle: JoinHandle<()>,
    rx: mpsc::Receiver<RecordedRequest>,
}

impl MockRobot {
    /// Serve the scripted `(status, body)` replies in order, then stop.
    pub fn start(replies: Vec<(u16, &'static str)>) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind mock robot");
        let addr = server.server_addr().to_ip().expect("ip listener");
        let (tx, rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            for (status, body) in replies {
                let Ok(mut request) = server.recv() else { return };

                let mut received = String::new();
                let _ = request.as_reader().read_to_string(&mut received);
                let content_type = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Content-Type"))
                    .map(|h| h.value.as_str().to_string());

                let _ = tx.send(RecordedRequest {
                    method: request.method().as_str().to_string(),
                    path: request.url().to_string(),
                    content_type,
                    body: received,
                });

                let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                    .expect("static header");
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            rx,
        }
    }

    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// Wait for every scripted reply to be served and return what was received.
    pub fn finish(self) -> Vec<RecordedRequest> {
        let _ = self.handle.join();
        self.rx.try_iter().collect()
    }
}

/// A base URL nothing is listening on.
pub fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{}", addr)
}
