use std::io::Read as _;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogStubConfig {
    pub token: StubResponse,
    pub catalog: StubResponse,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

pub struct CatalogStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl CatalogStub {
    pub fn spawn(config: CatalogStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start catalog stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let authorization = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Authorization"))
                    .map(|h| h.value.as_str().to_owned());
                let method = request.method().to_string();
                let path = request.url().to_owned();

                recorded.lock().expect("lock requests").push(RecordedRequest {
                    method: method.clone(),
                    path: path.clone(),
                    authorization,
                    body,
                });

                let response = match (method.as_str(), path.as_str()) {
                    ("POST", "/api/AccessToken") => config.token.clone(),
                    ("GET", "/api/catalog/") => config.catalog.clone(),
                    _ => StubResponse::new(404, "not found"),
                };

                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"application/json"[..],
                )
                .expect("content-type header");
                let _ = request.respond(
                    tiny_http::Response::from_string(response.body)
                        .with_status_code(response.status)
                        .with_header(header),
                );
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock requests").clone()
    }
}

impl Drop for CatalogStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Two top categories: A with three products, B with sub-category B1 holding two.
#[allow(dead_code)]
pub const SAMPLE_CATALOG: &str = r#"{
  "Categories": [
    {
      "Name": "A",
      "ProductList": [
        {"Name": "A one", "SKU": "A-1", "Price": 1.5, "Available": true},
        {"Name": "A two", "SKU": "A-2"},
        {"Name": "A three", "ProductID": 3, "ProductNodes": [{"NodeID": 1, "Name": "Cover"}]}
      ]
    },
    {
      "Name": "B",
      "Categories": [
        {
          "Name": "B1",
          "ProductList": [
            {"Name": "B1 one", "BookAttributes": {"Hardcover": true, "Pages": null, "Tags": ["a","b"]}},
            {"Name": "B1 two"}
          ]
        }
      ]
    }
  ],
  "Version": "2024-01"
}"#;
