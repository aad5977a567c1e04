use super::*;
use serde_json::json;

#[test]
fn test_pop_present_key() {
    let mut map: HashMap<&str, i32> = HashMap::from([("a", 1), ("b", 2)]);
    assert_eq!(pop(&mut map, "a"), Some(1));
    assert_eq!(map, HashMap::from([("b", 2)]));
}

#[test]
fn test_pop_missing_key_leaves_map() {
    let mut map: HashMap<String, i32> = HashMap::from([("b".to_string(), 2)]);
    assert_eq!(pop(&mut map, "a"), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_pop_json() {
    let mut obj = json!({"type": "end", "text": "x"}).as_object().cloned().unwrap();
    assert_eq!(pop_json(&mut obj, "type"), Some(json!("end")));
    assert_eq!(pop_json(&mut obj, "type"), None);
    assert_eq!(Value::Object(obj), json!({"text": "x"}));
}

#[test]
fn test_escape_html() {
    assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#39;");
    assert_eq!(escape_html("plain"), "plain");
}
