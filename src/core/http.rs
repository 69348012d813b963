//! Remote access to the proofreading site.
//!
//! The orchestrator talks to the site through the [`Remote`] trait: one call
//! to fetch a page as text, one to save a resource to disk. A 404 on a
//! download is an expected outcome, not an error.

use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::identifier::ProjectId;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of a download that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Download {
    Saved { bytes: u64 },
    NotFound,
}

impl Download {
    pub fn is_saved(&self) -> bool {
        matches!(self, Download::Saved { .. })
    }
}

pub trait Remote {
    /// Fetch a page body as text.
    fn fetch_page(&self, url: &str) -> Result<String>;

    /// Save the resource at `url` to `dest`. Nothing is written on 404.
    fn download(&self, url: &str, dest: &Path) -> Result<Download>;
}

impl<T: Remote + ?Sized> Remote for &T {
    fn fetch_page(&self, url: &str) -> Result<String> {
        (**self).fetch_page(url)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<Download> {
        (**self).download(url, dest)
    }
}

fn http_error(url: &str, e: reqwest::Error) -> Error {
    Error::remote_request_failed(url, e.status().map(|s| s.as_u16()), e.to_string())
}

fn status_error(url: &str, status: StatusCode) -> Error {
    Error::remote_request_failed(url, Some(status.as_u16()), status.to_string())
}

/// Blocking HTTP implementation of [`Remote`].
pub struct HttpRemote {
    client: Client,
}

impl HttpRemote {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(format!("ppcheckout/{}", VERSION));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            Error::internal_io(e.to_string(), Some("create HTTP client".to_string()))
        })?;

        Ok(Self::from_client(client))
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn get(&self, url: &str) -> Result<Response> {
        self.client.get(url).send().map_err(|e| http_error(url, e))
    }
}

impl Remote for HttpRemote {
    fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.get(url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(url, status));
        }

        response.text().map_err(|e| http_error(url, e))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<Download> {
        let mut response = self.get(url)?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(Download::NotFound);
        }
        if !status.is_success() {
            return Err(status_error(url, status));
        }

        let file = File::create(dest).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("create {}", dest.display())))
        })?;
        let mut writer = BufWriter::new(file);
        let bytes = response
            .copy_to(&mut writer)
            .map_err(|e| http_error(url, e))?;
        writer.flush().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("write {}", dest.display())))
        })?;

        Ok(Download::Saved { bytes })
    }
}

/// Fixed URL templates for one project on the site.
#[derive(Debug, Clone)]
pub struct ProjectUrls {
    base: String,
    id: ProjectId,
}

impl ProjectUrls {
    pub fn new(base_url: &str, id: &ProjectId) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
            id: id.clone(),
        }
    }

    pub fn page(&self) -> String {
        format!("{}/c/project.php?id={}", self.base, self.id)
    }

    pub fn images(&self) -> String {
        format!(
            "{}/c/tools/download_images.php?projectid={}&dummy={}images.zip",
            self.base, self.id, self.id
        )
    }

    pub fn text(&self) -> String {
        format!("{}/projects/{}/{}.zip", self.base, self.id, self.id)
    }

    pub fn word_list(&self, file_name: &str) -> String {
        format!("{}/projects/{}/{}", self.base, self.id, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::TcpListener;
    use std::thread;

    /// Answer one request on a loopback port with `status` and `body`,
    /// returning the URL to hit.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
        });
        format!("http://{}/file", addr)
    }

    fn remote() -> HttpRemote {
        HttpRemote::from_client(Client::builder().no_proxy().build().unwrap())
    }

    #[test]
    fn download_not_found_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("good_words.txt");
        let url = serve_once("404 Not Found", "missing");

        let outcome = remote().download(&url, &dest).unwrap();

        assert_eq!(outcome, Download::NotFound);
        assert!(!dest.exists());
    }

    #[test]
    fn download_server_error_carries_status() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("images.zip");
        let url = serve_once("500 Internal Server Error", "boom");

        let err = remote().download(&url, &dest).unwrap_err();

        assert_eq!(err.code.as_str(), "remote.request_failed");
        assert_eq!(err.details["status"], 500);
        assert_eq!(err.details["url"], url.as_str());
        assert!(!dest.exists());
    }

    #[test]
    fn download_success_saves_body() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("text.zip");
        let url = serve_once("200 OK", "PK-bytes");

        let outcome = remote().download(&url, &dest).unwrap();

        assert_eq!(outcome, Download::Saved { bytes: 8 });
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "PK-bytes");
    }

    #[test]
    fn fetch_page_rejects_non_success() {
        let url = serve_once("503 Service Unavailable", "later");

        let err = remote().fetch_page(&url).unwrap_err();

        assert_eq!(err.code.as_str(), "remote.request_failed");
        assert_eq!(err.details["status"], 503);
    }

    #[test]
    fn fetch_page_returns_body() {
        let url = serve_once("200 OK", "<html></html>");
        assert_eq!(remote().fetch_page(&url).unwrap(), "<html></html>");
    }

    fn urls() -> ProjectUrls {
        let id = ProjectId::resolve("projectID509579cf64be8").unwrap();
        ProjectUrls::new("http://www.pgdp.net/", &id)
    }

    #[test]
    fn page_url_uses_query_id() {
        assert_eq!(
            urls().page(),
            "http://www.pgdp.net/c/project.php?id=projectID509579cf64be8"
        );
    }

    #[test]
    fn images_url_carries_dummy_zip_name() {
        assert_eq!(
            urls().images(),
            "http://www.pgdp.net/c/tools/download_images.php?projectid=projectID509579cf64be8&dummy=projectID509579cf64be8images.zip"
        );
    }

    #[test]
    fn text_url_points_at_project_zip() {
        assert_eq!(
            urls().text(),
            "http://www.pgdp.net/projects/projectID509579cf64be8/projectID509579cf64be8.zip"
        );
    }

    #[test]
    fn word_list_url() {
        assert_eq!(
            urls().word_list("good_words.txt"),
            "http://www.pgdp.net/projects/projectID509579cf64be8/good_words.txt"
        );
    }

    #[test]
    fn download_saved_reports_bytes() {
        assert!(Download::Saved { bytes: 3 }.is_saved());
        assert!(!Download::NotFound.is_saved());
    }
}
