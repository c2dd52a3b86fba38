use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::Version;
use reqlog::{
    Config, Context, Dispatch, Handler, HandlerRef, Level, LogSink, Method, Request, RequestLogger,
    Response, Router, StatusCode, WriterSink,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Log { level: Level, message: String, attrs: Vec<(String, String)> },
    Downstream { method: String, url: String, body: Vec<u8> },
}

/// Sink and downstream handler share one timeline so ordering can be checked.
#[derive(Clone, Default)]
struct Timeline(Arc<Mutex<Vec<Event>>>);

impl Timeline {
    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    fn downstream(&self) -> HandlerRef {
        let timeline = self.clone();
        (move |req: Request| {
            timeline.0.lock().unwrap().push(Event::Downstream {
                method: req.method().to_string(),
                url: req.url(),
                body: req.body().to_vec(),
            });
            async { Response::text("downstream") }
        })
        .into_handler_ref()
    }
}

impl LogSink for Timeline {
    fn log(&self, _ctx: &http::Extensions, level: Level, message: &str, attrs: &[(&str, &str)]) {
        self.0.lock().unwrap().push(Event::Log {
            level,
            message: message.to_owned(),
            attrs: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        });
    }
}

fn request(method: Method, uri: &str, version: Version, body: &'static [u8]) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .version(version)
        .body(Bytes::from_static(body))
        .unwrap()
        .into()
}

fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[tokio::test]
async fn debug_config_logs_then_delegates() {
    let timeline = Timeline::default();
    let ctx = Context::with_sink(Arc::new(timeline.clone()));
    let config = Config { prefix: "[TEST]".into(), log_level: "debug".into() };

    let app = reqlog::new(&ctx, timeline.downstream(), config, "demo-plugin").unwrap();
    let res = app.call(request(Method::GET, "http://localhost/", Version::HTTP_11, b"")).await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"downstream");
    assert_eq!(
        timeline.events(),
        vec![
            Event::Log {
                level: Level::Debug,
                message: "[TEST]".into(),
                attrs: attrs(&[("proto", "HTTP/1.1"), ("method", "GET"), ("url", "http://localhost/")]),
            },
            Event::Downstream { method: "GET".into(), url: "http://localhost/".into(), body: vec![] },
        ],
    );
}

#[tokio::test]
async fn omitted_level_logs_at_info_with_default_prefix() {
    let timeline = Timeline::default();
    let ctx = Context::with_sink(Arc::new(timeline.clone()));
    let config: Config = serde_json::from_str("{}").unwrap();

    let app = reqlog::new(&ctx, timeline.downstream(), config, "").unwrap();
    app.call(request(Method::GET, "/", Version::HTTP_11, b"")).await;

    match &timeline.events()[0] {
        Event::Log { level, message, .. } => {
            assert_eq!(*level, Level::Info);
            assert_eq!(message, "[YOUR_PLUGIN]");
        }
        other => panic!("expected a log record first, got {other:?}"),
    }
}

#[tokio::test]
async fn warn_config_logs_at_debug() {
    let timeline = Timeline::default();
    let ctx = Context::with_sink(Arc::new(timeline.clone()));
    let config = Config { prefix: "[W]".into(), log_level: "warn".into() };

    let app = reqlog::new(&ctx, timeline.downstream(), config, "w").unwrap();
    app.call(request(Method::GET, "/", Version::HTTP_11, b"")).await;

    assert!(matches!(timeline.events()[0], Event::Log { level: Level::Debug, .. }));
}

#[tokio::test]
async fn attributes_are_verbatim_and_request_is_untouched() {
    let timeline = Timeline::default();
    let ctx = Context::with_sink(Arc::new(timeline.clone()));
    let url = "https://api.example.com:8443/v1/items/%E2%9C%93?q=a%20b&sort=-id";

    let app = reqlog::new(&ctx, timeline.downstream(), reqlog::create_config(), "x").unwrap();
    app.call(request(Method::PATCH, url, Version::HTTP_2, b"{\"a\":1}")).await;

    let events = timeline.events();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        Event::Log {
            level: Level::Info,
            message: "[YOUR_PLUGIN]".into(),
            attrs: attrs(&[("proto", "HTTP/2.0"), ("method", "PATCH"), ("url", url)]),
        },
    );
    assert_eq!(
        events[1],
        Event::Downstream { method: "PATCH".into(), url: url.into(), body: b"{\"a\":1}".to_vec() },
    );
}

#[tokio::test]
async fn one_record_and_one_call_per_request() {
    let timeline = Timeline::default();
    let ctx = Context::with_sink(Arc::new(timeline.clone()));
    let app = reqlog::new(&ctx, timeline.downstream(), reqlog::create_config(), "x").unwrap();

    for _ in 0..3 {
        app.call(request(Method::GET, "/", Version::HTTP_11, b"")).await;
    }

    let events = timeline.events();
    assert_eq!(events.len(), 6);
    for pair in events.chunks(2) {
        assert!(matches!(pair[0], Event::Log { .. }));
        assert!(matches!(pair[1], Event::Downstream { .. }));
    }
}

#[tokio::test]
async fn downstream_response_passes_through() {
    async fn teapot(_req: Request) -> Response {
        Response::builder()
            .status(StatusCode::IM_A_TEAPOT)
            .header("x-brewed", "yes")
            .text("short and stout")
    }

    let timeline = Timeline::default();
    let ctx = Context::with_sink(Arc::new(timeline.clone()));
    let app = reqlog::new(&ctx, teapot.into_handler_ref(), reqlog::create_config(), "x").unwrap();

    let res = app.call(request(Method::GET, "/", Version::HTTP_11, b"")).await;
    assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);
    assert_eq!(res.body(), b"short and stout");
    assert!(res.headers().iter().any(|(k, v)| k == "x-brewed" && v == "yes"));
}

#[tokio::test]
async fn wraps_a_whole_router() {
    async fn get_user(req: Request) -> String {
        format!("user {}", req.param("id").unwrap_or("?"))
    }

    let timeline = Timeline::default();
    let ctx = Context::with_sink(Arc::new(timeline.clone()));
    let routes = Router::new().on(Method::GET, "/users/{id}", get_user).into_handler_ref();
    let app = reqlog::mount::<RequestLogger>(&ctx, routes, None, "access-log").unwrap();

    let found = app.call(request(Method::GET, "/users/7", Version::HTTP_11, b"")).await;
    let missing = app.call(request(Method::GET, "/nope", Version::HTTP_11, b"")).await;

    assert_eq!(found.body(), b"user 7");
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    // 404s are logged too: the record is written before routing happens.
    assert_eq!(timeline.events().len(), 2);
}

#[tokio::test]
async fn concurrent_requests_each_log_once() {
    let timeline = Timeline::default();
    let ctx = Context::with_sink(Arc::new(timeline.clone()));
    let app = reqlog::new(&ctx, timeline.downstream(), reqlog::create_config(), "x").unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..32 {
        let app = Arc::clone(&app);
        tasks.spawn(async move {
            app.call(request(Method::GET, &format!("/item/{i}"), Version::HTTP_11, b"")).await
        });
    }
    while let Some(res) = tasks.join_next().await {
        assert_eq!(res.unwrap().status_code(), StatusCode::OK);
    }

    let events = timeline.events();
    let logs = events.iter().filter(|e| matches!(e, Event::Log { .. })).count();
    let calls = events.iter().filter(|e| matches!(e, Event::Downstream { .. })).count();
    assert_eq!((logs, calls), (32, 32));
}

#[tokio::test]
async fn writer_sink_renders_text_lines() {
    let sink = Arc::new(WriterSink::new(Vec::new()));
    let ctx = Context::with_sink(sink.clone());
    let config = Config { prefix: "[TEST]".into(), log_level: "error".into() };

    async fn ok(_req: Request) -> &'static str { "ok" }
    let app = reqlog::new(&ctx, ok.into_handler_ref(), config, "x").unwrap();
    app.call(request(Method::GET, "http://localhost/", Version::HTTP_11, b"")).await;
    drop(app);
    drop(ctx);

    let sink = Arc::try_unwrap(sink).ok().expect("sink still shared");
    assert_eq!(
        String::from_utf8(sink.into_inner()).unwrap(),
        "level=ERROR msg=[TEST] proto=HTTP/1.1 method=GET url=http://localhost/\n",
    );
}

#[derive(Clone, Debug, PartialEq)]
struct RequestId(String);

/// Records the request id each record was emitted for.
#[derive(Default)]
struct RequestIds(Mutex<Vec<Option<RequestId>>>);

impl LogSink for RequestIds {
    fn log(&self, ctx: &http::Extensions, _level: Level, _message: &str, _attrs: &[(&str, &str)]) {
        self.0.lock().unwrap().push(ctx.get::<RequestId>().cloned());
    }
}

#[tokio::test]
async fn sink_receives_request_extensions() {
    async fn echo_id(req: Request) -> String {
        req.extensions().get::<RequestId>().map(|id| id.0.clone()).unwrap_or_default()
    }

    let sink = Arc::new(RequestIds::default());
    let ctx = Context::with_sink(sink.clone());
    let app = reqlog::new(&ctx, echo_id.into_handler_ref(), reqlog::create_config(), "x").unwrap();

    let mut tagged = http::Request::builder().uri("/").body(Bytes::new()).unwrap();
    tagged.extensions_mut().insert(RequestId("req-42".into()));
    let res = app.call(tagged.into()).await;
    app.call(request(Method::GET, "/", Version::HTTP_11, b"")).await;

    // Extensions reach both the sink and the downstream handler.
    assert_eq!(res.body(), b"req-42");
    assert_eq!(*sink.0.lock().unwrap(), vec![Some(RequestId("req-42".into())), None]);
}
