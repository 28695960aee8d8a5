use axum::{routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, projects, views};

pub fn build_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(views::index))
        .merge(auth::router())
        .merge(projects::router())
        .nest_service("/static", static_files)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::handlers::{ALL_FIELDS_REQUIRED, EMAIL_TAKEN, INVALID_CREDENTIALS};
    use crate::auth::repo_types::{Session, User};
    use crate::projects::repo_types::Project;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    async fn send(state: &AppState, req: Request<Body>) -> Response {
        build_app(state.clone()).oneshot(req).await.unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut b = Request::builder().method("GET").uri(uri);
        if let Some(c) = cookie {
            b = b.header(header::COOKIE, c);
        }
        b.body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut b = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            b = b.header(header::COOKIE, c);
        }
        b.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_text(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(res: &Response) -> &str {
        res.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    /// `SESSIONID=<id>` from the response's Set-Cookie, ready to send back.
    fn session_pair(res: &Response) -> String {
        let set = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("set-cookie present");
        set.split(';').next().unwrap().to_string()
    }

    async fn register(state: &AppState, name: &str, email: &str, password: &str) -> Response {
        let body = format!("name={name}&email={email}&password={password}");
        send(state, post_form("/register", &body, None)).await
    }

    #[tokio::test]
    async fn index_and_forms_render() {
        let state = AppState::fake();
        for uri in ["/", "/register", "/login"] {
            let res = send(&state, get(uri, None)).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
            let ct = res.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
            assert!(ct.starts_with("text/html"));
        }
    }

    #[tokio::test]
    async fn register_new_email_sets_session() {
        let state = AppState::fake();
        let res = register(&state, "Ada+Lovelace", "Ada%40Example.com", "secret").await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/dashboard");
        let pair = session_pair(&res);
        let id = pair.strip_prefix("SESSIONID=").unwrap();
        assert_eq!(
            Session::find_email(&state.store, id).await.as_deref(),
            Some("ada@example.com")
        );
        let user = User::find_by_email(&state.store, "ada@example.com").await.unwrap();
        assert_eq!(user.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn register_duplicate_email_is_rejected_inline() {
        let state = AppState::fake();
        register(&state, "Ada", "ada%40example.com", "secret").await;
        let sessions_before = state.store.read().await.sessions.len();

        let res = register(&state, "Other", "ADA%40example.com", "pw").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
        let html = body_text(res).await;
        assert!(html.contains(&format!("<div class=\"error\">{EMAIL_TAKEN}</div>")));

        let tables = state.store.read().await;
        assert_eq!(tables.users.len(), 1);
        assert_eq!(tables.users["ada@example.com"].name, "Ada");
        assert_eq!(tables.sessions.len(), sessions_before);
    }

    #[tokio::test]
    async fn register_with_blank_fields_is_rejected() {
        let state = AppState::fake();
        let res = register(&state, "+++", "ada%40example.com", "pw").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_text(res).await.contains(ALL_FIELDS_REQUIRED));
        assert!(state.store.read().await.users.is_empty());
    }

    #[tokio::test]
    async fn login_checks_credentials() {
        let state = AppState::fake();
        register(&state, "Ada", "ada%40example.com", "secret").await;

        let bad = send(
            &state,
            post_form("/login", "email=ada%40example.com&password=nope", None),
        )
        .await;
        assert_eq!(bad.status(), StatusCode::OK);
        assert!(bad.headers().get(header::SET_COOKIE).is_none());
        assert!(body_text(bad).await.contains(INVALID_CREDENTIALS));

        let unknown = send(
            &state,
            post_form("/login", "email=who%40example.com&password=secret", None),
        )
        .await;
        assert!(body_text(unknown).await.contains(INVALID_CREDENTIALS));

        let good = send(
            &state,
            post_form("/login", "email=+ADA%40example.com+&password=secret", None),
        )
        .await;
        assert_eq!(good.status(), StatusCode::FOUND);
        assert_eq!(location(&good), "/dashboard");
        assert!(session_pair(&good).starts_with("SESSIONID="));
    }

    #[tokio::test]
    async fn protected_pages_redirect_without_session() {
        let state = AppState::fake();
        for (req, what) in [
            (get("/dashboard", None), "dashboard"),
            (get("/projects/new", None), "form"),
            (get("/dashboard", Some("SESSIONID=bogus")), "bogus cookie"),
            (post_form("/projects", "title=x", None), "create"),
        ] {
            let res = send(&state, req).await;
            assert_eq!(res.status(), StatusCode::FOUND, "{what}");
            assert_eq!(location(&res), "/login", "{what}");
        }
        assert!(state.store.read().await.projects.is_empty());
    }

    #[tokio::test]
    async fn create_project_prepends_and_shows_on_dashboard() {
        let state = AppState::fake();
        let cookie = session_pair(&register(&state, "Ada", "ada%40example.com", "pw").await);

        let empty = body_text(send(&state, get("/dashboard", Some(&cookie))).await).await;
        assert!(empty.contains("No projects yet"));
        assert!(empty.contains("Ada"));

        for title in ["First", "Second+%3Cb%3E"] {
            let body = format!("title={title}&techStack=Rust&description=demo");
            let res = send(&state, post_form("/projects", &body, Some(&cookie))).await;
            assert_eq!(res.status(), StatusCode::FOUND);
            assert_eq!(location(&res), "/dashboard");
        }

        let list = Project::list_by_owner(&state.store, "ada@example.com").await;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].title, "Second <b>");
        assert_eq!(list[1].title, "First");
        assert_eq!(list[0].owner, "Ada");

        let html = body_text(send(&state, get("/dashboard", Some(&cookie))).await).await;
        let second = html.find("Second &lt;b&gt;").unwrap();
        let first = html.find("<h3>First</h3>").unwrap();
        assert!(second < first);
        assert!(!html.contains("{{projects}}"));
    }

    #[tokio::test]
    async fn create_project_with_blank_fields_is_kept() {
        let state = AppState::fake();
        let cookie = session_pair(&register(&state, "Ada", "ada%40example.com", "pw").await);
        let res = send(
            &state,
            post_form("/projects", "title=++&techStack=Rust", Some(&cookie)),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/dashboard");

        let list = Project::list_by_owner(&state.store, "ada@example.com").await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].title, "");
        assert_eq!(list[0].tech_stack, "Rust");
        assert_eq!(list[0].description, "");
    }

    #[tokio::test]
    async fn new_project_form_renders_for_logged_in_user() {
        let state = AppState::fake();
        let cookie = session_pair(&register(&state, "Ada", "ada%40example.com", "pw").await);
        let res = send(&state, get("/projects/new", Some(&cookie))).await;
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_text(res).await;
        assert!(html.contains("action=\"/projects\""));
        assert!(html.contains("name=\"techStack\""));
    }

    #[tokio::test]
    async fn projects_checks_session_before_method() {
        let state = AppState::fake();
        let anon = send(&state, get("/projects", None)).await;
        assert_eq!(anon.status(), StatusCode::FOUND);
        assert_eq!(location(&anon), "/login");

        let cookie = session_pair(&register(&state, "Ada", "ada%40example.com", "pw").await);
        let res = send(&state, get("/projects", Some(&cookie))).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[header::ALLOW], "POST");
        assert!(Project::list_by_owner(&state.store, "ada@example.com")
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn register_accepts_any_nonempty_email() {
        let state = AppState::fake();
        let res = register(&state, "Bob", "bob%40localhost", "pw").await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/dashboard");
        assert!(User::find_by_email(&state.store, "bob@localhost").await.is_some());
    }

    #[tokio::test]
    async fn first_session_cookie_wins_even_when_empty() {
        let state = AppState::fake();
        let pair = session_pair(&register(&state, "Ada", "ada%40example.com", "pw").await);
        let id = pair.strip_prefix("SESSIONID=").unwrap();

        let cookie = format!("SESSIONID=; SESSIONID={id}");
        let res = send(&state, get("/dashboard", Some(&cookie))).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/login");

        let cookie = format!("SESSIONID={id}; SESSIONID=");
        let res = send(&state, get("/dashboard", Some(&cookie))).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn logout_invalidates_session() {
        let state = AppState::fake();
        let cookie = session_pair(&register(&state, "Ada", "ada%40example.com", "pw").await);

        let res = send(&state, get("/logout", Some(&cookie))).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/");
        let cleared = res.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.starts_with("SESSIONID=;"));
        assert!(cleared.contains("Max-Age=0"));

        let after = send(&state, get("/dashboard", Some(&cookie))).await;
        assert_eq!(after.status(), StatusCode::FOUND);
        assert_eq!(location(&after), "/login");
    }

    #[tokio::test]
    async fn logout_without_session_still_redirects() {
        let state = AppState::fake();
        let res = send(&state, get("/logout", None)).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), "/");
    }

    #[tokio::test]
    async fn wrong_method_and_unknown_path() {
        let state = AppState::fake();
        let res = send(&state, post_form("/", "", None)).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        let res = send(&state, get("/nowhere", None)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn static_files_are_served() {
        let state = AppState::fake();
        let res = send(&state, get("/static/style.css", None)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let res = send(&state, get("/static/missing.css", None)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_template_dir_is_a_server_error() {
        let mut config = (*AppState::fake().config).clone();
        config.template_dir = "/definitely/not/here".into();
        let state = AppState::from_parts(
            std::sync::Arc::new(crate::store::MemoryStore::new()),
            std::sync::Arc::new(config),
        );
        let res = send(&state, get("/", None)).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
