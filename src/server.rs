use std::{fs, io};
use std::path::{Path, PathBuf};

use ntex::web;
use ntex_files::Files;
use spdlog::{info, warn};

use crate::render::INDEX_FILE_NAME;

/// Mounts the publish directory at `/`. When the directory is missing
/// nothing is mounted and every path answers 404.
pub fn configure_site(cfg: &mut web::ServiceConfig, publish_dir: &Path) {
    if !publish_dir.is_dir() {
        warn!("Publish directory {} does not exist, serving nothing", publish_dir.display());
        return;
    }
    cfg.service(Files::new("/", publish_dir).index_file(INDEX_FILE_NAME));
}

/// Creates the publish directory when it is missing, so a server started
/// before the first build picks up whatever the build writes later.
pub fn prepare_publish_dir(publish_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(publish_dir)
}

/// Serves the built site until the process is stopped.
pub async fn serve(publish_dir: PathBuf, address: String, port: u16) -> io::Result<()> {
    prepare_publish_dir(&publish_dir)?;
    info!("Serving {} on http://{}:{}/", publish_dir.display(), address, port);

    web::HttpServer::new(move || {
        let publish_dir = publish_dir.clone();
        web::App::new()
            .configure(move |cfg| configure_site(cfg, &publish_dir))
    })
        .bind((address, port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use ntex::http::StatusCode;
    use ntex::util::Bytes;
    use ntex::web::test::{call_service, init_service, read_body, TestRequest};

    use crate::test_data::write_file;

    use super::*;

    #[ntex::test]
    async fn test_serves_published_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("index.html"), "<p>index</p>");
        write_file(&dir.path().join("b/c.html"), "<p>c</p>");
        let publish_dir = dir.path().to_path_buf();

        let app = init_service(web::App::new().configure(move |cfg| configure_site(cfg, &publish_dir))).await;

        let resp = call_service(&app, TestRequest::with_uri("/b/c.html").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await, Bytes::from_static(b"<p>c</p>"));

        let resp = call_service(&app, TestRequest::with_uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await, Bytes::from_static(b"<p>index</p>"));

        let resp = call_service(&app, TestRequest::with_uri("/missing.html").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[ntex::test]
    async fn test_absent_publish_dir_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let publish_dir = dir.path().join("dist");

        let app = init_service(web::App::new().configure(move |cfg| configure_site(cfg, &publish_dir))).await;

        for uri in ["/", "/index.html", "/a/b.html"] {
            let resp = call_service(&app, TestRequest::with_uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        }
    }

    #[ntex::test]
    async fn test_serves_files_built_after_start() {
        let dir = tempfile::tempdir().unwrap();
        let publish_dir = dir.path().join("dist");
        prepare_publish_dir(&publish_dir).unwrap();
        assert!(publish_dir.is_dir());

        let mounted = publish_dir.clone();
        let app = init_service(web::App::new().configure(move |cfg| configure_site(cfg, &mounted))).await;

        let resp = call_service(&app, TestRequest::with_uri("/index.html").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        write_file(&publish_dir.join("index.html"), "<p>built later</p>");
        let resp = call_service(&app, TestRequest::with_uri("/index.html").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(read_body(resp).await, Bytes::from_static(b"<p>built later</p>"));
    }
}
