//! Document acquisition from a local path or a remote URL.

use std::io::ErrorKind;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::domain::errors::GradeError;
use crate::domain::model::{DocumentOrigin, DocumentPayload};
use crate::infra::http::HttpFetcher;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(https?://)?",
        r"((([a-z0-9]([a-z0-9-]*[a-z0-9])*)\.)+[a-z]{2,}",
        r"|(([0-9]{1,3}\.){3}[0-9]{1,3}))",
        r"(:[0-9]+)?(/[-a-z0-9%_.~+]*)*",
        r"(\?[;&a-z0-9%_.~+=-]*)?",
        r"(#[-a-z0-9_]*)?$",
    ))
    .expect("url pattern compiles")
});

/// Check `raw` against the accepted URL syntax and return it with an explicit scheme.
///
/// Accepted: optional `http`/`https` scheme, a domain name or IPv4 host, then
/// optional port, path, query, and fragment. Nothing here touches the network.
pub fn validate_url(raw: &str) -> Result<String, GradeError> {
    let invalid = || GradeError::Validation {
        url: raw.to_owned(),
    };

    if !URL_PATTERN.is_match(raw) {
        return Err(invalid());
    }

    let lower = raw.to_ascii_lowercase();
    let normalized = if lower.starts_with("http://") || lower.starts_with("https://") {
        raw.to_owned()
    } else {
        format!("http://{raw}")
    };

    reqwest::Url::parse(&normalized).map_err(|_| invalid())?;
    Ok(normalized)
}

/// Fetch the payload for `origin`. Completes, successfully or not, before any parsing starts.
pub async fn acquire_document(
    origin: &DocumentOrigin,
    fetcher: &dyn HttpFetcher,
) -> Result<DocumentPayload, GradeError> {
    let text = match origin {
        DocumentOrigin::Local(path) => read_local(path).await?,
        DocumentOrigin::Remote(url) => fetch_remote(url, fetcher).await?,
    };
    Ok(DocumentPayload {
        origin: origin.clone(),
        text,
    })
}

async fn read_local(path: &Path) -> Result<String, GradeError> {
    info!(path = %path.display(), "reading local document");
    let bytes = tokio::fs::read(path).await.map_err(|err| match err.kind() {
        ErrorKind::NotFound => GradeError::NotFound {
            path: path.to_path_buf(),
        },
        _ => GradeError::Read {
            path: path.to_path_buf(),
            source: err,
        },
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn fetch_remote(url: &str, fetcher: &dyn HttpFetcher) -> Result<String, GradeError> {
    info!(%url, "fetching remote document");
    let response = fetcher.get(url).await?;
    if !response.is_success() {
        warn!(%url, status = response.status, "remote document request failed");
        return Err(GradeError::Fetch {
            url: url.to_owned(),
            status: response.status,
            reason: response.reason,
        });
    }
    Ok(response.body)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::infra::http::FetchedBody;

    struct StubFetcher {
        status: u16,
        body: &'static str,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HttpFetcher for StubFetcher {
        async fn get(&self, _url: &str) -> Result<FetchedBody, GradeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(FetchedBody {
                status: self.status,
                reason: None,
                body: self.body.to_owned(),
            })
        }
    }

    #[test]
    fn accepts_domains_and_ipv4_hosts() {
        for url in [
            "http://example.com",
            "https://www.example.co.uk/path/to/index.html",
            "example.com",
            "http://127.0.0.1:8080/index.html",
            "HTTP://EXAMPLE.COM/A?b=c&d=e#top",
            "my-site.herokuapp.com/",
        ] {
            assert!(validate_url(url).is_ok(), "{url} should be accepted");
        }
    }

    #[test]
    fn rejects_malformed_urls() {
        for url in [
            "ht!tp://bad",
            "ftp://example.com",
            "http://localhost",
            "http://exa mple.com",
            "",
            "http://-bad.com",
        ] {
            let err = validate_url(url).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{url} should be rejected");
        }
    }

    #[test]
    fn adds_missing_scheme() {
        assert_eq!(
            validate_url("example.com/index.html").unwrap(),
            "http://example.com/index.html"
        );
        assert_eq!(
            validate_url("https://example.com").unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn missing_local_file_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let origin = DocumentOrigin::Local(temp.path().join("index.html"));
        let fetcher = StubFetcher::new(200, "");
        let err = acquire_document(&origin, &fetcher).await.unwrap_err();
        assert!(matches!(err, GradeError::NotFound { .. }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reads_local_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("index.html");
        std::fs::write(&path, "<p>hello</p>").unwrap();
        let origin = DocumentOrigin::Local(path);
        let payload = acquire_document(&origin, &StubFetcher::new(200, ""))
            .await
            .unwrap();
        assert_eq!(payload.text, "<p>hello</p>");
        assert_eq!(payload.origin, origin);
    }

    #[tokio::test]
    async fn error_status_becomes_fetch_error() {
        let origin = DocumentOrigin::Remote("http://example.com/missing".into());
        let err = acquire_document(&origin, &StubFetcher::new(404, "gone"))
            .await
            .unwrap_err();
        match err {
            GradeError::Fetch { status, .. } => assert_eq!(status, 404),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn success_status_returns_body() {
        let origin = DocumentOrigin::Remote("http://example.com/".into());
        let payload = acquire_document(&origin, &StubFetcher::new(200, "<a href=\"/\">x</a>"))
            .await
            .unwrap();
        assert!(payload.text.contains("<a"));
    }
}
