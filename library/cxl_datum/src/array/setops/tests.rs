use super::*;
use pretty_assertions::assert_eq;

fn strings(items: &[&str]) -> Array {
    let mut array = Array::new();
    for item in items {
        array.push(Value::string(item).unwrap()).unwrap();
    }
    array
}

fn texts(array: &Array) -> Vec<String> {
    array
        .iter()
        .map(|v| v.to_text(true).unwrap().into_owned())
        .collect()
}

#[test]
fn intersection_keeps_first_occurrence_order() {
    let a = strings(&["pear", "apple", "fig", "apple"]);
    let b = strings(&["fig", "apple", "kiwi"]);
    let out = a.matching(&b, MatchMode::Intersection, false).unwrap();
    assert_eq!(texts(&out), vec!["apple", "fig"]);
}

#[test]
fn difference_drops_members_of_other() {
    let a = strings(&["pear", "apple", "fig", "pear"]);
    let b = strings(&["APPLE"]);
    let out = a.matching(&b, MatchMode::Difference, true).unwrap();
    assert_eq!(texts(&out), vec!["pear", "fig"]);
    let out = a.matching(&b, MatchMode::Difference, false).unwrap();
    assert_eq!(texts(&out), vec!["pear", "apple", "fig"]);
}

#[test]
fn retain_matching_works_in_place() {
    let mut a = strings(&["x", "y", "z", "y"]);
    let b = strings(&["y", "z"]);
    a.retain_matching(&b, MatchMode::Intersection, false).unwrap();
    assert_eq!(texts(&a), vec!["y", "z"]);
}

#[test]
fn unique_is_union_without_duplicates() {
    let mut a = Array::new();
    for v in [Value::int(1), Value::real(1.0), Value::int(2), Value::uint(2)] {
        a.push(v).unwrap();
    }
    let mut b = Array::new();
    b.push(Value::int(3)).unwrap();
    b.push(Value::int(1)).unwrap();

    let out = a.unique(Some(&b), false).unwrap();
    assert_eq!(texts(&out), vec!["1", "2", "3"]);

    a.make_unique(None, false).unwrap();
    assert_eq!(texts(&a), vec!["1", "2"]);
}

#[test]
fn contains_and_position() {
    let a = strings(&["Alpha", "beta"]);
    let needle = Value::string("BETA").unwrap();
    assert_eq!(a.position(&needle, true), Some(1));
    assert_eq!(a.position(&needle, false), None);
    assert!(!a.contains(&Value::blob(b"beta"), true));
}
