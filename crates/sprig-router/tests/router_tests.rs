//! Integration tests for sprig-router
//!
//! Tests are organized by feature area and cover:
//! - Pathname parsing (slash collapsing, query/fragment splitting)
//! - Query codec (nesting, auto-index lists, coercion, unsafe keys)
//! - Template compilation and matching (delimiters, variadic, constraints)
//! - Pathname building (substitution, query merging, append order)
//! - Round-trip properties between build and parse

use pretty_assertions::assert_eq;
use rstest::rstest;
use sprig_router::*;

// ============================================================================
// Pathname parsing
// ============================================================================

#[test]
fn test_parse_collapses_and_preserves_trailing_slash() {
    let parsed = parse_pathname("//route/////foo//?a=1");
    assert_eq!(parsed.path, "/route/foo/");
    assert_eq!(parsed.params, params! { "a" => "1" });
}

#[test]
fn test_parse_empty_input_is_root() {
    let parsed = parse_pathname("");
    assert_eq!(parsed.path, "/");
    assert!(parsed.params.is_empty());
}

#[test]
fn test_parse_query_and_fragment_boundaries() {
    let parsed = parse_pathname("/a/b?x=1&y=2#frag");
    assert_eq!(parsed.path, "/a/b");
    assert_eq!(parsed.params, params! { "x" => "1", "y" => "2" });
}

// ============================================================================
// Query codec
// ============================================================================

#[test]
fn test_decode_flat() {
    assert_eq!(
        parse_query_string("a=b&c=d"),
        params! { "a" => "b", "c" => "d" }
    );
}

#[test]
fn test_decode_auto_index() {
    assert_eq!(
        parse_query_string("a[]=x&a[]=y"),
        params! { "a" => vec![Value::from("x"), Value::from("y")] }
    );
}

#[test]
fn test_decode_booleans() {
    assert_eq!(
        parse_query_string("a=true&b=false"),
        params! { "a" => true, "b" => false }
    );
}

#[test]
fn test_decode_mixed_nesting() {
    let params = parse_query_string("user[name]=jo&user[tags][]=a&user[tags][]=b");
    let user = params.get("user").and_then(|v| v.as_map()).unwrap();
    assert_eq!(user.get("name"), Some(&Value::Str("jo".to_string())));
    assert_eq!(
        user.get("tags"),
        Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
    );
}

#[test]
fn test_decode_unsafe_key_never_lands() {
    let params = parse_query_string("__proto__[toString]=1&a=2");
    assert_eq!(params.get("__proto__"), None);
    assert_eq!(params.get("a"), Some(&Value::Str("2".to_string())));
}

#[rstest]
#[case("a=b", "a", Value::Str("b".to_string()))]
#[case("a=true", "a", Value::Bool(true))]
#[case("a=12", "a", Value::Str("12".to_string()))]
#[case("a%20b=c", "a b", Value::Str("c".to_string()))]
fn test_decode_scalars(#[case] wire: &str, #[case] key: &str, #[case] expected: Value) {
    let params = parse_query_string(wire);
    assert_eq!(params.get(key), Some(&expected));
}

#[test]
fn test_encode_decode_round_trip() {
    let tree = parse_query_string("a[0]=x&a[1]=y&b[c]=1&flag=true");
    let wire = build_query_string(&tree);
    assert_eq!(parse_query_string(&wire), tree);
}

// ============================================================================
// Template compilation and matching
// ============================================================================

fn matched(template: &str, url: &str) -> Option<Params> {
    let compiled = compile(template).unwrap();
    let mut parsed = parse_pathname(url);
    compiled
        .matches(&parsed.path, &mut parsed.params)
        .then_some(parsed.params)
}

#[test]
fn test_match_static() {
    assert!(matched("/about", "/about").is_some());
    assert!(matched("/about", "/about/us").is_none());
}

#[test]
fn test_match_parameter() {
    assert_eq!(
        matched("/users/:id", "/users/123").unwrap(),
        params! { "id" => "123" }
    );
}

#[test]
fn test_match_variadic() {
    assert_eq!(
        matched("/docs/:page...", "/docs/guide/intro").unwrap(),
        params! { "page" => "guide/intro" }
    );
}

#[test]
fn test_match_greedy_left_at_dots() {
    assert_eq!(
        matched("/:file.:ext/edit", "/report.final.pdf/edit").unwrap(),
        params! { "file" => "report.final", "ext" => "pdf" }
    );
}

#[rstest]
#[case("/:a.:b", "/x.y")]
#[case("/:a-:b", "/x-y")]
#[case("/:a.:b-:c", "/x.y-z")]
#[case("/:a-:b.:c", "/x-y.z")]
fn test_match_adjacent_parameter_delimiters(#[case] template: &str, #[case] url: &str) {
    assert!(matched(template, url).is_some());
}

#[test]
fn test_match_query_constraint() {
    let params = matched("/search?mode=fast", "/search?mode=fast&q=x").unwrap();
    assert_eq!(params.get("q"), Some(&Value::Str("x".to_string())));
    assert!(matched("/search?mode=fast", "/search?mode=slow").is_none());
    assert!(matched("/search?mode=fast", "/search").is_none());
}

#[test]
fn test_match_combines_query_and_path_params() {
    let params = matched("/users/:id", "/users/7?tab=posts").unwrap();
    assert_eq!(params, params! { "tab" => "posts", "id" => "7" });
}

#[test]
fn test_empty_template_only_matches_root() {
    assert!(matched("", "/").is_some());
    assert!(matched("", "/x").is_none());
}

#[test]
fn test_compile_rejects_undelimited_params() {
    assert!(matches!(compile("/:a:b"), Err(RouteError::Syntax { .. })));
}

#[test]
fn test_compile_referential_consistency() {
    let compiled = compile("/users/:id").unwrap();
    for _ in 0..3 {
        let mut parsed = parse_pathname("/users/7");
        assert!(compiled.matches(&parsed.path, &mut parsed.params));
        assert_eq!(parsed.params, params! { "id" => "7" });
    }
}

// ============================================================================
// Pathname building
// ============================================================================

#[test]
fn test_build_interpolates() {
    let params = params! { "id" => "1" };
    assert_eq!(
        build_pathname("/route/:id", Some(&params)).unwrap(),
        "/route/1"
    );
}

#[test]
fn test_build_moves_unclaimed_params_to_query() {
    let params = params! { "other" => "1" };
    assert_eq!(
        build_pathname("/route/:id", Some(&params)).unwrap(),
        "/route/:id?other=1"
    );
}

#[test]
fn test_build_append_order() {
    // static query, then leftover params, then fragment
    let params = params! { "id" => "9", "b" => "2" };
    assert_eq!(
        build_pathname("/r/:id?a=1#frag", Some(&params)).unwrap(),
        "/r/9?a=1&b=2#frag"
    );
}

// ============================================================================
// Round trip: build then parse
// ============================================================================

#[test]
fn test_round_trip_recovers_parameters() {
    let supplied = params! { "id" => "42", "tab" => "posts", "flag" => true };
    let built = build_pathname("/users/:id", Some(&supplied)).unwrap();
    assert_eq!(built, "/users/42?tab=posts&flag=true");

    let compiled = compile("/users/:id").unwrap();
    let mut parsed = parse_pathname(&built);
    assert!(compiled.matches(&parsed.path, &mut parsed.params));
    assert_eq!(
        parsed.params,
        params! { "tab" => "posts", "flag" => true, "id" => "42" }
    );
}

#[test]
fn test_round_trip_encoded_values() {
    let supplied = params! { "q" => "a b/c" };
    let built = build_pathname("/search/:q", Some(&supplied)).unwrap();
    assert_eq!(built, "/search/a%20b%2Fc");

    let compiled = compile("/search/:q").unwrap();
    let mut parsed = parse_pathname(&built);
    assert!(compiled.matches(&parsed.path, &mut parsed.params));
    assert_eq!(parsed.params, params! { "q" => "a b/c" });
}
