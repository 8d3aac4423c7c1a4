//! Integration tests for building proxy maps from rule lists.

use std::sync::{Arc, Mutex};

use proxy_from_env::proxy::diagnostics::{Diagnostic, DiagnosticSink};
use proxy_from_env::{
    create_proxy_transformer, rules_to_literal, BuilderOptions, Literal, ProxyEnvError,
    ProxyInput, ProxyRule, ProxyTransformer,
};
use serde_json::{json, Value};

#[derive(Default)]
struct Recorder {
    messages: Mutex<Vec<String>>,
}

impl Recorder {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl DiagnosticSink for Recorder {
    fn report(&self, diagnostic: &Diagnostic) {
        self.messages.lock().unwrap().push(diagnostic.to_string());
    }
}

fn recording(options: BuilderOptions) -> (ProxyTransformer, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let transformer = ProxyTransformer::new(options).with_sink(recorder.clone());
    (transformer, recorder)
}

fn base(value: Value) -> BuilderOptions {
    match value {
        Value::Object(map) => BuilderOptions::new(map),
        _ => panic!("base options must be an object"),
    }
}

#[test]
fn http_rule_with_rewrite() {
    let (tr, log) = recording(BuilderOptions::default());
    let proxies = tr.transform("[['/api','http://localhost:3000','/backend']]");

    let p = &proxies["/api"];
    assert_eq!(p.target(), Some("http://localhost:3000"));
    assert_eq!(p.get("changeOrigin"), Some(&json!(true)));
    assert_eq!(p.get("ws"), Some(&json!(true)));
    assert!(p.get("secure").is_none());
    assert_eq!(p.rewrite.as_ref().unwrap().apply("/api/users"), "/backend/users");
    assert!(log.messages().is_empty());
}

#[test]
fn https_rule_sets_secure_false() {
    let (tr, _) = recording(BuilderOptions::default());
    let proxies = tr.transform("[['/secure','https://example.com']]");
    let p = &proxies["/secure"];
    assert_eq!(p.target(), Some("https://example.com"));
    assert_eq!(p.get("secure"), Some(&json!(false)));
}

#[test]
fn secure_default_can_be_overridden() {
    let (tr, _) = recording(base(json!({"secure": true})));
    let proxies =
        tr.transform("[['/a','https://a'],['/b','https://b',undefined,{ secure: 'strict' }]]");
    assert_eq!(proxies["/a"].get("secure"), Some(&json!(true)));
    assert_eq!(proxies["/b"].get("secure"), Some(&json!("strict")));
}

#[test]
fn base_options_and_per_rule_overrides() {
    let (tr, _) = recording(base(json!({"changeOrigin": false})));
    let proxies = tr.transform("[['/api','http://localhost:3000',undefined,{ ws: false }]]");
    let p = &proxies["/api"];
    assert_eq!(p.get("changeOrigin"), Some(&json!(false)));
    assert_eq!(p.get("ws"), Some(&json!(false)));
    assert!(p.rewrite.is_none());
}

#[test]
fn per_rule_options_beat_base_options() {
    let (tr, _) = recording(base(json!({"timeout": 1000, "ws": false})));
    let proxies = tr.transform("[['/a','http://a',undefined,{ timeout: 5000 }]]");
    assert_eq!(
        Value::Object(proxies["/a"].options.clone()),
        json!({"changeOrigin": true, "ws": false, "timeout": 5000, "target": "http://a"})
    );
}

#[test]
fn base_options_cannot_set_target_or_rewrite() {
    let (tr, _) = recording(base(json!({"target": "http://elsewhere", "rewrite": "/x"})));
    let proxies = tr.transform("[['/a','http://a']]");
    assert_eq!(proxies["/a"].target(), Some("http://a"));
    assert!(proxies["/a"].get("rewrite").is_none());
    assert!(proxies["/a"].rewrite.is_none());
}

#[test]
fn invalid_string_logs_once_and_returns_empty() {
    let (tr, log) = recording(BuilderOptions::default());
    let proxies = tr.transform("this is invalid javascript and will throw");
    assert!(proxies.is_empty());

    let messages = log.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Failed to parse proxy string"));
    assert!(messages[0].contains("Input: this is invalid javascript and will throw"));
}

#[test]
fn non_list_literal_logs_and_returns_empty() {
    let (tr, log) = recording(BuilderOptions::default());
    assert!(tr.transform("123").is_empty());
    assert!(tr.transform("{ a: 1 }").is_empty());

    let messages = log.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("does not evaluate to a list (got number)"));
    assert!(messages[1].contains("got object"));
}

#[test]
fn blank_input_is_silent() {
    let (tr, log) = recording(BuilderOptions::default());
    assert!(tr.transform("").is_empty());
    assert!(tr.transform("   ").is_empty());
    assert!(tr.transform("\n\t").is_empty());
    assert!(log.messages().is_empty());
}

#[test]
fn missing_rewrite_is_none() {
    let (tr, _) = recording(BuilderOptions::default());
    let proxies = tr.transform("[['/norw','http://localhost:3000'] ]");
    assert!(proxies["/norw"].rewrite.is_none());
    assert_eq!(proxies["/norw"].rewrite_path("/norw/x"), "/norw/x");
}

#[test]
fn regex_alternation_prefix() {
    let (tr, _) = recording(BuilderOptions::default());
    let proxies = tr.transform("[['/(api-v2|api)','http://localhost:3000','']]");
    let rw = proxies["/(api-v2|api)"].rewrite.as_ref().unwrap();
    assert_eq!(rw.apply("/api/users"), "/users");
    assert_eq!(rw.apply("/api-v2/users"), "/users");
    assert_eq!(rw.apply("/other/users"), "/other/users");
}

#[test]
fn malformed_rules_are_skipped_silently() {
    let (tr, log) = recording(BuilderOptions::default());
    let proxies = tr.transform("[['/solo'], ['/ok','http://a'], 'str', [1, 'http://b'], null]");
    assert_eq!(proxies.len(), 1);
    assert!(proxies.contains_key("/ok"));
    assert!(log.messages().is_empty());
}

#[test]
fn invalid_prefix_pattern_skips_rule_and_logs() {
    let (tr, log) = recording(BuilderOptions::default());
    let proxies = tr.transform("[['/(api','http://a',''],['/ok','http://b','']]");
    assert_eq!(proxies.keys().collect::<Vec<_>>(), ["/ok"]);
    let messages = log.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Failed to compile proxy prefix"));
    assert!(messages[0].contains("Input: /(api"));
}

#[test]
fn invalid_pattern_without_rewrite_is_kept() {
    let (tr, log) = recording(BuilderOptions::default());
    let proxies = tr.transform("[['/(api','http://a']]");
    assert!(proxies.contains_key("/(api"));
    assert!(log.messages().is_empty());
}

#[test]
fn later_duplicate_prefix_wins_in_first_position() {
    let (tr, _) = recording(BuilderOptions::default());
    let proxies = tr.transform("[['/a','http://one'],['/b','http://b'],['/a','http://two']]");
    assert_eq!(proxies.len(), 2);
    assert_eq!(proxies.keys().collect::<Vec<_>>(), ["/a", "/b"]);
    assert_eq!(proxies["/a"].target(), Some("http://two"));
}

#[test]
fn structured_rules_match_text() {
    let rules = vec![
        ProxyRule::from(("/api", "http://localhost:3000", "/backend")),
        ProxyRule::from(("/secure", "https://example.com")),
        ProxyRule::from(("/opts", "http://localhost:4000", None, json!({"ws": false}))),
    ];
    let (tr, _) = recording(base(json!({"changeOrigin": false})));

    let from_rules = tr.transform(rules.clone());
    let from_text = tr.transform(rules_to_literal(&rules));
    assert_eq!(from_rules, from_text);
    assert_eq!(from_rules.len(), 3);
}

#[test]
fn unicode_option_keys_survive_text_form() {
    let rules = vec![ProxyRule::from((
        "/a",
        "http://a",
        None,
        json!({"éclair": true}),
    ))];
    let text = rules_to_literal(&rules);
    assert_eq!(text, "[['/a','http://a',undefined,{ éclair: true }]]");

    let (tr, log) = recording(BuilderOptions::default());
    let from_text = tr.transform(text.as_str());
    assert_eq!(from_text, tr.transform(rules));
    assert_eq!(from_text["/a"].get("éclair"), Some(&json!(true)));
    assert!(log.messages().is_empty());
}

#[test]
fn loose_and_json_lists_are_accepted() {
    let (tr, log) = recording(BuilderOptions::default());

    let loose = vec![
        Literal::from(vec!["/api", "http://localhost:3000", ""]),
        Literal::from(vec!["/upload", "http://localhost:4000"]),
    ];
    let proxies = tr.transform(loose);
    assert!(proxies["/api"].rewrite.is_some());
    assert!(proxies["/upload"].rewrite.is_none());

    let from_json = tr.transform(json!([
        ["/api", "http://localhost:3000", ""],
        ["/upload", "http://localhost:4000"]
    ]));
    assert_eq!(from_json, proxies);

    assert!(tr.transform(ProxyInput::from(json!({"not": "a list"}))).is_empty());
    assert_eq!(log.messages().len(), 1);
}

#[test]
fn empty_list() {
    let (tr, log) = recording(BuilderOptions::default());
    assert!(tr.transform(Vec::<ProxyRule>::new()).is_empty());
    assert!(tr.transform("[]").is_empty());
    assert!(log.messages().is_empty());
}

#[test]
fn transform_is_idempotent() {
    let (tr, _) = recording(BuilderOptions::default());
    let input = "[['/api','http://localhost:3000','/backend'],['/s','https://s',undefined,{ headers: { a: '1' } }]]";
    assert_eq!(tr.transform(input), tr.transform(input));
}

#[test]
fn functional_form_and_threads() {
    let transform = create_proxy_transformer(base(json!({"ws": false})));
    let expected = transform(ProxyInput::from("[['/api','http://localhost:3000','/b']]"));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let transform = transform.clone();
                scope.spawn(move || {
                    transform(ProxyInput::from("[['/api','http://localhost:3000','/b']]"))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
    assert_eq!(expected["/api"].get("ws"), Some(&json!(false)));
}

#[test]
fn reads_environment_variable() {
    let (tr, log) = recording(BuilderOptions::default());
    std::env::set_var("PROXY_FROM_ENV_TEST_RULES", "[['/env','http://env']]");
    let proxies = tr.transform_env("PROXY_FROM_ENV_TEST_RULES");
    assert_eq!(proxies["/env"].target(), Some("http://env"));

    assert!(tr.transform_env("PROXY_FROM_ENV_TEST_UNSET_VARIABLE").is_empty());
    assert!(log.messages().is_empty());
}

#[test]
fn default_transformer_is_shared() {
    let a = proxy_from_env::default_transformer();
    let b = proxy_from_env::default_transformer();
    assert!(std::ptr::eq(a, b));
    assert!(a.options().base_proxy_options.is_empty());
    assert_eq!(proxy_from_env::transform("[['/x','http://x']]").len(), 1);
}

#[test]
fn parse_errors_surface_through_parse_rule_list() {
    let err = proxy_from_env::proxy::parse_rule_list("[['/a', 'http://a'").unwrap_err();
    assert!(matches!(err, ProxyEnvError::Literal(_)));
    assert!(proxy_from_env::proxy::parse_rule_list("  ").unwrap().is_empty());
}
