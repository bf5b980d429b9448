use crate::i18n::Language;
use serde::Deserialize;
use std::{collections::HashSet, fmt, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChapterRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
}

#[derive(Deserialize)]
struct CatalogDocument {
    chapters: Vec<ChapterRecord>,
}

/// Chapters in source order. Ids are unique; records are never edited after load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    chapters: Vec<ChapterRecord>,
}

impl Catalog {
    pub fn new(chapters: Vec<ChapterRecord>) -> Result<Self, LoadFailure> {
        let mut seen = HashSet::with_capacity(chapters.len());
        for chapter in &chapters {
            if !seen.insert(chapter.id) {
                return Err(LoadFailure::Malformed(format!("duplicate chapter id {}", chapter.id)));
            }
        }
        Ok(Self { chapters })
    }

    pub fn chapters(&self) -> &[ChapterRecord] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadFailure {
    Network(String),
    Status(u16),
    Io(String),
    Malformed(String),
}

impl LoadFailure {
    /// Text shown in place of the card list.
    pub fn message(&self, language: Language) -> &'static str {
        language.strings().load_failed
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadFailure::Network(e) => write!(f, "network error: {}", e),
            LoadFailure::Status(code) => write!(f, "server answered with status {}", code),
            LoadFailure::Io(e) => write!(f, "could not read catalog: {}", e),
            LoadFailure::Malformed(e) => write!(f, "malformed catalog: {}", e),
        }
    }
}

impl std::error::Error for LoadFailure {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Location {
    Url(String),
    Path(PathBuf),
}

/// Where catalogs live: an http(s) base or a directory on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogSource {
    root: String,
}

impl CatalogSource {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, language: Option<Language>) -> Location {
        let root = self.root.trim_end_matches('/');
        let target = match language {
            Some(lang) => format!("{}/{}/chapters.json", root, lang.tag()),
            None if root.ends_with(".json") => root.to_string(),
            None => format!("{}/chapters.json", root),
        };

        if target.starts_with("http://") || target.starts_with("https://") {
            Location::Url(target)
        } else {
            Location::Path(PathBuf::from(target))
        }
    }
}

/// Fetches and parses one catalog. Nothing is cached between calls.
pub async fn load(
    client: &reqwest::Client,
    source: &CatalogSource,
    language: Option<Language>,
) -> Result<Catalog, LoadFailure> {
    let bytes = match source.resolve(language) {
        Location::Url(url) => {
            log::debug!("fetching catalog from {}", url);
            fetch_remote(client, &url).await?
        }
        Location::Path(path) => {
            log::debug!("reading catalog from {}", path.display());
            tokio::fs::read(&path)
                .await
                .map_err(|e| LoadFailure::Io(format!("{}: {}", path.display(), e)))?
        }
    };
    parse_catalog(&bytes)
}

async fn fetch_remote(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, LoadFailure> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| LoadFailure::Network(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(LoadFailure::Status(status.as_u16()));
    }

    let bytes = resp.bytes().await.map_err(|e| LoadFailure::Network(e.to_string()))?;
    Ok(bytes.to_vec())
}

pub fn parse_catalog(bytes: &[u8]) -> Result<Catalog, LoadFailure> {
    let doc: CatalogDocument =
        serde_json::from_slice(bytes).map_err(|e| LoadFailure::Malformed(e.to_string()))?;
    Catalog::new(doc.chapters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SAMPLE: &str = r#"{
        "chapters": [
            { "id": 1, "number": "Chapter 1", "title": "First Day", "subtitle": "Introduction", "description": "The hero sets out." },
            { "id": 2, "title": "Journey", "description": "Preparations are made." }
        ]
    }"#;

    #[test]
    fn parse_keeps_source_order_and_optional_fields() {
        let catalog = parse_catalog(SAMPLE.as_bytes()).unwrap();
        let ids: Vec<u64> = catalog.chapters().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(catalog.chapters()[0].subtitle.as_deref(), Some("Introduction"));
        assert_eq!(catalog.chapters()[1].number, None);
    }

    #[test]
    fn bundled_catalogs_parse_with_matching_ids() {
        let en = parse_catalog(include_bytes!("../data/en/chapters.json")).unwrap();
        let ur = parse_catalog(include_bytes!("../data/ur/chapters.json")).unwrap();
        let ids = |c: &Catalog| c.chapters().iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(&en), ids(&ur));
        assert!(!en.is_empty());
    }

    #[test]
    fn parse_rejects_missing_chapters_key() {
        let err = parse_catalog(br#"{ "items": [] }"#).unwrap_err();
        assert!(matches!(err, LoadFailure::Malformed(_)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(matches!(parse_catalog(b"<html>"), Err(LoadFailure::Malformed(_))));
    }

    #[test]
    fn duplicate_ids_are_malformed() {
        let body = r#"{ "chapters": [
            { "id": 4, "title": "a", "description": "" },
            { "id": 4, "title": "b", "description": "" }
        ] }"#;
        let err = parse_catalog(body.as_bytes()).unwrap_err();
        assert_eq!(err, LoadFailure::Malformed("duplicate chapter id 4".into()));
    }

    #[test]
    fn resolve_picks_language_subdirectory() {
        let source = CatalogSource::new("https://example.org/data/");
        assert_eq!(
            source.resolve(Some(Language::Ur)),
            Location::Url("https://example.org/data/ur/chapters.json".into())
        );
        assert_eq!(
            source.resolve(None),
            Location::Url("https://example.org/data/chapters.json".into())
        );
    }

    #[test]
    fn resolve_uses_json_file_verbatim_without_language() {
        let source = CatalogSource::new("site/chapters-list.json");
        assert_eq!(source.resolve(None), Location::Path(PathBuf::from("site/chapters-list.json")));
    }

    #[test]
    fn failure_message_follows_language() {
        let err = LoadFailure::Status(404);
        assert_eq!(err.message(Language::En), Language::En.strings().load_failed);
        assert_eq!(err.message(Language::Ur), Language::Ur.strings().load_failed);
        assert_eq!(err.to_string(), "server answered with status 404");
    }

    #[tokio::test]
    async fn load_reads_localized_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("en")).unwrap();
        fs::write(dir.path().join("en/chapters.json"), SAMPLE).unwrap();

        let source = CatalogSource::new(dir.path().to_string_lossy());
        let catalog = load(&reqwest::Client::new(), &source, Some(Language::En)).await.unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn load_reports_missing_file_as_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = CatalogSource::new(dir.path().to_string_lossy());
        let err = load(&reqwest::Client::new(), &source, None).await.unwrap_err();
        assert!(matches!(err, LoadFailure::Io(_)));
    }

    /// Answers a single request with `response` and returns the server's base URL.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn load_fetches_remote_catalog() {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            SAMPLE.len(),
            SAMPLE
        );
        let source = CatalogSource::new(serve_once(response).await);
        let catalog = load(&reqwest::Client::new(), &source, None).await.unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn load_reports_error_status() {
        let response =
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string();
        let source = CatalogSource::new(serve_once(response).await);
        let err = load(&reqwest::Client::new(), &source, Some(Language::En)).await.unwrap_err();
        assert_eq!(err, LoadFailure::Status(503));
    }

    #[tokio::test]
    async fn load_reports_refused_connection_as_network_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = CatalogSource::new(format!("http://{}", addr));
        let err = load(&reqwest::Client::new(), &source, None).await.unwrap_err();
        assert!(matches!(err, LoadFailure::Network(_)), "got {:?}", err);
    }
}
