use super::*;
use pretty_assertions::assert_eq;

#[test]
fn factory_messages_match_kind() {
    let err = index_out_of_range(-4, 3);
    assert_eq!(err.kind, DatumErrorKind::IndexOutOfRange { index: -4, len: 3 });
    assert_eq!(err.to_string(), "array index -4 out of range (array size 3)");

    let err = type_mismatch("array", "int");
    assert_eq!(err.message, "type mismatch: expected array, got int");

    assert_eq!(
        nothing_to_unput().to_string(),
        "no bytes left to \"unput\""
    );
}

#[test]
fn detail_messages_keep_kind() {
    let err = slice_out_of_range(2, 5, 4);
    assert_eq!(err.kind, DatumErrorKind::IndexOutOfRange { index: 2, len: 4 });
    assert_eq!(err.message, "array slice values [2,5] out of range (array size 4)");

    let err = invalid_operation("cannot release an inline string");
    assert_eq!(err.kind, DatumErrorKind::InvalidOperation);
    assert_eq!(err.to_string(), "cannot release an inline string");
}

#[test]
fn only_allocation_failure_is_fatal() {
    assert!(out_of_memory("array").is_fatal());
    assert!(!recursion_detected().is_fatal());
    assert!(!binary_as_text().is_fatal());
    assert!(!dangling_reference().is_fatal());
}

#[test]
fn text_errors_become_invalid_argument() {
    let text_err = cxl_text::parse_delimiter("ab").unwrap_err();
    let err = DatumError::from(text_err.clone());
    assert_eq!(err.kind, DatumErrorKind::InvalidArgument);
    assert_eq!(err.message, text_err.message);
}
