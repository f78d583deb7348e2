//! End-to-end tests of the per-pass procedure.

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use fob_html::{
    Chunk, Compilation, ConfigError, EmitOutcome, Error, HtmlPlugin, HtmlPluginOptions, Minifier,
    MinifyOptions, RebuildDecision, Timestamp,
};
use common::*;

#[tokio::test]
async fn script_is_injected_before_body() {
    let mut plugin = plugin(options(&["app"]), runtime_with_template(BASIC_TEMPLATE));
    let mut compilation = pass(vec![js_chunk("0", "app", "abc123")], 1);

    let outcome = plugin.emit(&mut compilation).await.unwrap();
    assert!(outcome.is_emitted());

    let html = html(&compilation);
    assert!(html.contains(
        r#"<script type="text/javascript" src="/static/app.abc123.js"></script></body>"#
    ));
    assert!(!html.contains("<link"));
    assert_eq!(
        html,
        r#"<html><head></head><body><script type="text/javascript" src="/static/app.abc123.js"></script></body></html>"#
    );
}

#[tokio::test]
async fn hash_is_appended_when_enabled() {
    let mut plugin = plugin(
        options(&["app"]).with_hash(true),
        runtime_with_template(BASIC_TEMPLATE),
    );
    let mut compilation = pass(vec![js_chunk("0", "app", "abc123")], 1);

    plugin.emit(&mut compilation).await.unwrap();
    assert!(html(&compilation).contains(r#"src="/static/app.abc123.js?abc123""#));
}

#[tokio::test]
async fn vendor_precedes_app_regardless_of_input_order() {
    for reversed in [false, true] {
        let mut plugin = plugin(options(&["app", "vendor"]), runtime_with_template(BASIC_TEMPLATE));
        let mut chunks = vec![
            js_chunk("0", "vendor", "v1"),
            js_chunk("1", "app", "a1").with_parent("0"),
        ];
        if reversed {
            chunks.reverse();
        }
        let mut compilation = pass(chunks, 1);

        plugin.emit(&mut compilation).await.unwrap();
        let html = html(&compilation);
        let vendor = html.find("vendor.v1.js").unwrap();
        let app = html.find("app.a1.js").unwrap();
        assert!(vendor < app, "vendor must load first: {html}");
    }
}

#[tokio::test]
async fn stylesheets_go_to_head_and_other_files_are_ignored() {
    let mut plugin = plugin(options(&["app"]), runtime_with_template(BASIC_TEMPLATE));
    let chunk = Chunk::new("0", "app", "h").with_files(["app.css", "app.js", "app.js.map", "logo.svg"]);
    let mut compilation = pass(vec![chunk], 1);

    plugin.emit(&mut compilation).await.unwrap();
    assert_eq!(
        html(&compilation),
        concat!(
            r#"<html><head><link href="/static/app.css" rel="stylesheet" /></head>"#,
            r#"<body><script type="text/javascript" src="/static/app.js"></script></body></html>"#
        )
    );
}

#[tokio::test]
async fn irrelevant_chunks_are_not_referenced() {
    let mut plugin = plugin(options(&["app"]), runtime_with_template(BASIC_TEMPLATE));
    let mut compilation = pass(
        vec![js_chunk("0", "worker", "w1"), js_chunk("1", "app", "a1")],
        1,
    );

    plugin.emit(&mut compilation).await.unwrap();
    let html = html(&compilation);
    assert!(html.contains("app.a1.js"));
    assert!(!html.contains("worker"));
}

#[tokio::test]
async fn identical_second_pass_is_skipped() {
    let mut plugin = plugin(options(&["app"]).with_hash(true), runtime_with_template(BASIC_TEMPLATE));

    let mut first = pass(vec![js_chunk("0", "app", "a1")], 1);
    assert!(plugin.emit(&mut first).await.unwrap().is_emitted());

    let mut second = pass(vec![js_chunk("0", "app", "a1")], 1);
    let outcome = plugin.emit(&mut second).await.unwrap();
    assert_eq!(outcome, EmitOutcome::Skipped(RebuildDecision::SkipUnchanged));
    assert!(second.assets.is_empty());
}

#[tokio::test]
async fn identical_pass_with_relative_context_is_skipped() {
    let mut plugin = plugin(options(&["app"]), runtime_with_template(BASIC_TEMPLATE));
    let relative_pass = || {
        Compilation::new(".", "dist")
            .with_file_timestamp("src/index.html", Timestamp::from_millis(1))
            .with_chunks([js_chunk("0", "app", "a1")])
    };

    let mut first = relative_pass();
    assert!(plugin.emit(&mut first).await.unwrap().is_emitted());
    assert_eq!(first.file_dependencies, vec![PathBuf::from("src/index.html")]);

    let mut second = relative_pass();
    let outcome = plugin.emit(&mut second).await.unwrap();
    assert_eq!(outcome, EmitOutcome::Skipped(RebuildDecision::SkipUnchanged));
}

#[tokio::test]
async fn dot_dot_segments_in_timestamp_keys_still_match() {
    let mut plugin = plugin(options(&["app"]), runtime_with_template(BASIC_TEMPLATE));
    let pass_with_key = |key: &str| {
        Compilation::new(CONTEXT, "/project/dist")
            .with_file_timestamp(key, Timestamp::from_millis(1))
            .with_chunks([js_chunk("0", "app", "a1")])
    };

    let mut first = pass_with_key("/project/lib/../src/index.html");
    plugin.emit(&mut first).await.unwrap();

    let mut second = pass_with_key("/project/./src/index.html");
    let outcome = plugin.emit(&mut second).await.unwrap();
    assert_eq!(outcome, EmitOutcome::Skipped(RebuildDecision::SkipUnchanged));
}

#[tokio::test]
async fn irrelevant_change_without_hash_is_skipped() {
    let mut plugin = plugin(options(&["app"]), runtime_with_template(BASIC_TEMPLATE));

    let mut first = pass(vec![js_chunk("0", "app", "a1"), js_chunk("1", "worker", "w1")], 1);
    plugin.emit(&mut first).await.unwrap();

    let mut second = pass(vec![js_chunk("0", "app", "a1"), js_chunk("1", "worker", "w2")], 1);
    let outcome = plugin.emit(&mut second).await.unwrap();
    assert_eq!(outcome, EmitOutcome::Skipped(RebuildDecision::SkipUnchanged));
}

#[tokio::test]
async fn relevant_change_without_hash_waits_for_template_change() {
    let mut plugin = plugin(options(&["app"]), runtime_with_template(BASIC_TEMPLATE));

    let mut first = pass(vec![js_chunk("0", "app", "a1")], 1);
    plugin.emit(&mut first).await.unwrap();

    let mut second = pass(vec![js_chunk("0", "app", "a2")], 1);
    let outcome = plugin.emit(&mut second).await.unwrap();
    assert_eq!(outcome, EmitOutcome::Skipped(RebuildDecision::SkipHashless));

    let mut third = pass(vec![js_chunk("0", "app", "a2")], 2);
    assert!(plugin.emit(&mut third).await.unwrap().is_emitted());
    assert!(html(&third).contains("app.a2.js"));
}

#[tokio::test]
async fn relevant_change_with_hash_rebuilds() {
    let mut plugin = plugin(options(&["app"]).with_hash(true), runtime_with_template(BASIC_TEMPLATE));

    let mut first = pass(vec![js_chunk("0", "app", "a1")], 1);
    plugin.emit(&mut first).await.unwrap();

    let mut second = pass(vec![js_chunk("0", "app", "a2")], 1);
    assert!(plugin.emit(&mut second).await.unwrap().is_emitted());
    assert!(html(&second).contains("app.a2.js?a2"));
}

#[tokio::test]
async fn template_edit_is_picked_up() {
    let runtime = runtime_with_template(BASIC_TEMPLATE);
    let mut plugin = plugin(options(&["app"]), runtime.clone());

    let mut first = pass(vec![js_chunk("0", "app", "a1")], 1);
    plugin.emit(&mut first).await.unwrap();

    runtime.add_file(TEMPLATE_PATH, "<html><head><title>v2</title></head><body></body></html>");
    let mut second = pass(vec![js_chunk("0", "app", "a1")], 2);
    plugin.emit(&mut second).await.unwrap();
    assert!(html(&second).contains("<title>v2</title>"));
}

#[tokio::test]
async fn template_is_recorded_as_file_dependency() {
    let mut plugin = plugin(options(&["app"]), runtime_with_template(BASIC_TEMPLATE));
    let mut compilation = pass(vec![js_chunk("0", "app", "a1")], 1);

    plugin.emit(&mut compilation).await.unwrap();
    assert_eq!(compilation.file_dependencies, vec![PathBuf::from(TEMPLATE_PATH)]);
}

#[tokio::test]
async fn missing_anchors_leave_template_untouched() {
    let template = "<div>no anchors here</div>";
    let mut plugin = plugin(options(&["app"]), runtime_with_template(template));
    let mut compilation = pass(vec![js_chunk("0", "app", "a1")], 1);

    plugin.emit(&mut compilation).await.unwrap();
    assert_eq!(html(&compilation), template);
}

#[tokio::test]
async fn empty_public_path_gives_bare_filenames() {
    let mut plugin = plugin(options(&["app"]), runtime_with_template(BASIC_TEMPLATE));
    let mut compilation = pass(vec![js_chunk("0", "app", "a1")], 1);
    compilation.public_path = None;

    plugin.emit(&mut compilation).await.unwrap();
    assert!(html(&compilation).contains(r#"src="app.a1.js""#));
}

#[tokio::test]
async fn cycle_fails_the_pass_without_registering() {
    let mut plugin = plugin(options(&["a", "b"]), runtime_with_template(BASIC_TEMPLATE));
    let mut compilation = pass(
        vec![
            js_chunk("0", "a", "h").with_parent("1"),
            js_chunk("1", "b", "h").with_parent("0"),
        ],
        1,
    );

    let err = plugin.emit(&mut compilation).await.unwrap_err();
    match err {
        Error::CyclicDependency(cycle) => assert_eq!(cycle.cycle.len(), 2),
        other => panic!("expected cycle error, got {other:?}"),
    }
    assert!(compilation.assets.is_empty());
    assert_eq!(plugin.ledger().chunk_version("a"), Some("h"));
}

#[tokio::test]
async fn cycle_through_irrelevant_chunk_is_ignored() {
    let mut plugin = plugin(options(&["a"]), runtime_with_template(BASIC_TEMPLATE));
    let mut compilation = pass(
        vec![
            js_chunk("0", "a", "h").with_parent("1"),
            js_chunk("1", "b", "h").with_parent("0"),
        ],
        1,
    );

    assert!(plugin.emit(&mut compilation).await.unwrap().is_emitted());
}

#[tokio::test]
async fn unreadable_template_fails_the_pass() {
    let runtime = Arc::new(fob_html::MemoryRuntime::new(CONTEXT));
    let mut plugin = plugin(options(&["app"]), runtime);
    let mut compilation = pass(vec![js_chunk("0", "app", "a1")], 1);

    let err = plugin.emit(&mut compilation).await.unwrap_err();
    assert!(matches!(err, Error::TemplateRead { ref path, .. } if path == &PathBuf::from(TEMPLATE_PATH)));
    assert!(compilation.assets.is_empty());
}

#[tokio::test]
async fn minify_is_applied_when_configured() {
    let template = "<html>\n  <head>\n  </head>\n  <body>\n  </body>\n</html>\n";
    let mut plugin = plugin(
        options(&["app"]).with_minify(MinifyOptions::default()),
        runtime_with_template(template),
    );
    let mut compilation = pass(vec![js_chunk("0", "app", "a1")], 1);

    plugin.emit(&mut compilation).await.unwrap();
    let html = html(&compilation);
    assert!(!html.contains("\n  "));
    assert!(html.contains("/static/app.a1.js"));
}

#[derive(Debug)]
struct FailingMinifier;

impl Minifier for FailingMinifier {
    fn minify(&self, _html: &str, _options: &MinifyOptions) -> fob_html::Result<String> {
        Err(Error::Minify("boom".to_string()))
    }
}

#[tokio::test]
async fn minifier_failure_fails_the_pass() {
    let mut plugin = plugin(
        options(&["app"]).with_minify(MinifyOptions::default()),
        runtime_with_template(BASIC_TEMPLATE),
    )
    .with_minifier(Arc::new(FailingMinifier));
    let mut compilation = pass(vec![js_chunk("0", "app", "a1")], 1);

    assert!(matches!(
        plugin.emit(&mut compilation).await,
        Err(Error::Minify(_))
    ));
    assert!(compilation.assets.is_empty());
}

#[tokio::test]
async fn custom_filename_is_used() {
    let mut plugin = plugin(
        options(&["app"]).with_filename("pages/home.html"),
        runtime_with_template(BASIC_TEMPLATE),
    );
    let mut compilation = pass(vec![js_chunk("0", "app", "a1")], 1);

    let outcome = plugin.emit(&mut compilation).await.unwrap();
    let expected_size = compilation.assets.get("pages/home.html").unwrap().size;
    assert_eq!(
        outcome,
        EmitOutcome::Emitted {
            filename: "pages/home.html".to_string(),
            size: expected_size,
            written_to: None,
        }
    );
}

#[tokio::test]
async fn instances_keep_separate_ledgers() {
    let runtime = runtime_with_template(BASIC_TEMPLATE);
    let mut first = plugin(options(&["app"]).with_filename("a.html"), runtime.clone());
    let mut second = plugin(options(&["app"]).with_filename("b.html"), runtime);

    let mut pass_one = pass(vec![js_chunk("0", "app", "a1")], 1);
    first.emit(&mut pass_one).await.unwrap();

    let mut pass_two = pass(vec![js_chunk("0", "app", "a1")], 1);
    assert!(second.emit(&mut pass_two).await.unwrap().is_emitted());
    assert!(pass_two.assets.contains("b.html"));
}

#[test]
fn construction_rejects_missing_template() {
    let options = HtmlPluginOptions {
        chunks: vec!["app".to_string()],
        ..HtmlPluginOptions::default()
    };
    assert!(matches!(
        HtmlPlugin::new(options),
        Err(Error::Config(ConfigError::MissingTemplate))
    ));
}

#[test]
fn construction_rejects_empty_chunks() {
    let options = HtmlPluginOptions::new(TEMPLATE, Vec::<String>::new());
    assert!(matches!(
        HtmlPlugin::new(options),
        Err(Error::Config(ConfigError::MissingChunks))
    ));
}
