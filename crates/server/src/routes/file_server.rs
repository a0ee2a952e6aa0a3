//! FTP folder route handler.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::Result;
use crate::services::file_guard::observe_file_request;
use crate::state::AppState;

/// Serve a file from the FTP folder if the guard lets it through.
///
/// Challenge detection runs on every name that got past the slash check,
/// including names the guard refuses.
pub async fn serve(
    State(state): State<AppState>,
    Path(file): Path<String>,
    request: Request,
) -> Result<Response> {
    let (name, verdict) = state.files().check(&file);
    if let Some(name) = &name {
        observe_file_request(state.challenges(), name);
    }
    let path = verdict?;

    tracing::debug!(path = %path.display(), "Serving FTP file");
    let response = ServeFile::new(&path)
        .oneshot(request)
        .await
        .unwrap_or_else(|never| match never {});

    Ok(response.map(Body::new).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use juice_shop_core::ChallengeKey;

    use crate::state::{AppState, tests::test_state};

    fn fixture() -> (TempDir, AppState, Router) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("legal.md"), "# Legal Information\n").unwrap();
        std::fs::write(dir.path().join("acquisitions.md"), "# Planned Acquisitions\n").unwrap();
        std::fs::write(dir.path().join("package.json.bak"), "{}\n").unwrap();
        std::fs::write(dir.path().join("eastere.gg"), "easter egg\n").unwrap();

        let state = test_state(dir.path());
        let app = super::super::routes().with_state(state.clone());
        (dir, state, app)
    }

    async fn send(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = send(app, uri).await;
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn test_serves_allowed_file() {
        let (_dir, state, app) = fixture();

        let response = send(app, "/ftp/legal.md").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/markdown"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"# Legal Information\n");
        assert!(state.challenges().snapshot().iter().all(|s| !s.solved));
    }

    #[tokio::test]
    async fn test_confidential_document_is_served_and_solves_challenge() {
        let (_dir, state, app) = fixture();

        let (status, _) = get(app, "/ftp/acquisitions.md").await;

        assert_eq!(status, StatusCode::OK);
        assert!(state.challenges().is_solved(ChallengeKey::DirectoryListingChallenge));
    }

    #[tokio::test]
    async fn test_encoded_slash_is_refused_without_challenges() {
        let (_dir, state, app) = fixture();

        let (status, body) = get(app, "/ftp/..%2Facquisitions.md").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "File names cannot contain forward slashes!");
        assert!(!state.challenges().is_solved(ChallengeKey::DirectoryListingChallenge));
    }

    #[tokio::test]
    async fn test_easter_egg_is_refused_but_solves_challenge() {
        let (_dir, state, app) = fixture();

        let (status, body) = get(app, "/ftp/EASTERE.GG").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Invalid file type.");
        assert!(state.challenges().is_solved(ChallengeKey::EasterEggLevelOneChallenge));
        assert!(state.challenges().is_solved(ChallengeKey::NullByteChallenge));
    }

    #[tokio::test]
    async fn test_null_byte_name_is_judged_after_stripping() {
        let (_dir, state, app) = fixture();

        // Strips to "package.json.bak.md", which passes the guard but does not exist.
        let (status, _) = get(app, "/ftp/package.json.bak%00.md").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!state.challenges().is_solved(ChallengeKey::ForgottenDevBackupChallenge));
    }

    #[tokio::test]
    async fn test_backup_file_is_refused_but_solves_challenges() {
        let (_dir, state, app) = fixture();

        let (status, body) = get(app, "/ftp/package.json.bak").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, "Invalid file type.");
        assert!(state.challenges().is_solved(ChallengeKey::ForgottenDevBackupChallenge));
        assert!(state.challenges().is_solved(ChallengeKey::NullByteChallenge));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let (_dir, _state, app) = fixture();

        let (status, _) = get(app, "/ftp/nothing-here.pdf").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
