use serde_json::json;
use toon_codec::{encode, Delimiter, EncoderOptions, KeyFolding};

fn default_opts() -> EncoderOptions {
    EncoderOptions::default()
}

#[test]
fn encode_flat_object() {
    let data = json!({"id": 123, "name": "Ada", "active": true});
    assert_eq!(
        encode(&data, &default_opts()),
        "id: 123\nname: Ada\nactive: true"
    );
}

#[test]
fn encode_inline_primitive_array() {
    let data = json!({"tags": ["admin", "ops", "dev"]});
    assert_eq!(encode(&data, &default_opts()), "tags[3]: admin, ops, dev");
}

#[test]
fn encode_root_tabular_array() {
    let data = json!([
        {"sku": "A1", "qty": 2, "price": 9.99},
        {"sku": "B2", "qty": 1, "price": 14.5}
    ]);
    assert_eq!(
        encode(&data, &default_opts()),
        "[2]{price, qty, sku}:\n  9.99, 2, A1\n  14.5, 1, B2"
    );
}

#[test]
fn encode_folded_chain() {
    let data = json!({"a": {"b": {"c": {"value": 42}}}});
    let opts = default_opts().with_key_folding(KeyFolding::Safe);
    assert_eq!(encode(&data, &opts), "a.b.c.value: 42");
}

#[test]
fn encode_bounded_fold_depth() {
    let data = json!({"a": {"b": {"c": {"value": 42}}}});
    let opts = default_opts()
        .with_key_folding(KeyFolding::Safe)
        .with_flatten_depth(2);
    assert_eq!(encode(&data, &opts), "a.b:\n  c.value: 42");
}

#[test]
fn encode_empty_containers() {
    assert_eq!(encode(&json!({}), &default_opts()), "");
    assert_eq!(encode(&json!([]), &default_opts()), "[0]:");
    assert_eq!(encode(&json!({"items": []}), &default_opts()), "items[0]:");
}

#[test]
fn encode_mixed_array_expands() {
    let data = json!({"items": [1, [2, 3], {"a": true}]});
    assert_eq!(
        encode(&data, &default_opts()),
        "items[3]:\n  1\n  [2]: 2, 3\n  a: true"
    );
}

#[test]
fn encode_no_trailing_newline() {
    let data = json!({"a": 1, "b": {"c": 2}});
    let out = encode(&data, &default_opts());
    assert!(!out.ends_with('\n'));
}

#[test]
fn encode_indent_width_respected() {
    let data = json!({"a": {"b": 1}});
    let opts = default_opts().with_indent(4);
    assert_eq!(encode(&data, &opts), "a:\n    b: 1");
}

#[test]
fn encode_budget_pushes_array_to_expanded_form() {
    let long: Vec<_> = (0..8)
        .map(|i| format!("a_rather_long_member_{}", i))
        .collect();
    let data = json!({ "xs": long });
    let out = encode(&data, &default_opts());
    assert!(out.starts_with("xs[8]:\n"));
    assert_eq!(out.lines().count(), 9);
}

#[test]
fn encode_insertion_order_of_keys() {
    let data = json!({"zeta": 1, "alpha": 2, "mu": 3});
    assert_eq!(encode(&data, &default_opts()), "zeta: 1\nalpha: 2\nmu: 3");
}

#[test]
fn encode_tab_delimiter_header_symbol() {
    let data = json!({"nums": [1, 2, 3]});
    let opts = default_opts().with_delimiter(Delimiter::Tab);
    assert_eq!(encode(&data, &opts), "nums[3\t]: 1\t2\t3");
}

#[test]
fn encode_pipe_delimiter_quoting() {
    let data = json!({"vals": ["a|b", "c,d"]});
    let opts = default_opts().with_delimiter(Delimiter::Pipe);
    assert_eq!(encode(&data, &opts), "vals[2|]: \"a|b\"|c,d");
}

#[test]
fn encode_non_finite_numbers_normalize_to_null() {
    // Values built from raw f64 NaN/inf are unrepresentable in
    // serde_json::Number; the normalizer contract is observable through
    // null passthrough instead.
    let data = json!({"x": null});
    assert_eq!(encode(&data, &default_opts()), "x: null");
}

#[test]
fn encode_strings_that_look_like_other_tokens() {
    let data = json!({"xs": ["true", "null", "12", "0.5", "-7", "007"]});
    assert_eq!(
        encode(&data, &default_opts()),
        "xs[6]: \"true\", \"null\", \"12\", \"0.5\", \"-7\", \"007\""
    );
}

#[test]
fn encode_whitespace_padded_strings() {
    let data = json!({"a": " lead", "b": "trail "});
    assert_eq!(
        encode(&data, &default_opts()),
        "a: \" lead\"\nb: \"trail \""
    );
}
