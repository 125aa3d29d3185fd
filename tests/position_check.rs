use edax_batch::{Error, position::validate, util::group_thousands};

const POS: &str = "--XXXXX--OOOXX-O-OOOXXOX-OXOXOXXOXXXOXXX--XOXOXX-XXXOOO--OOOOO-- X";

#[test]
fn board_passes_strict_check() {
    assert!(validate(POS, true).is_ok());
}

#[test]
fn line_breaks_are_rejected() {
    let err = validate("abc\ndef", false).unwrap_err();
    assert!(matches!(err, Error::InvalidPosition { .. }));
}

#[test]
fn lenient_mode_accepts_other_formats() {
    assert!(validate("pos-1", false).is_ok());
    assert!(validate("pos-1", true).is_err());
    assert!(validate("   ", false).is_err());
}

#[test]
fn groups_digits() {
    assert_eq!(group_thousands(0), "0");
    assert_eq!(group_thousands(999), "999");
    assert_eq!(group_thousands(1000), "1,000");
    assert_eq!(group_thousands(269803312), "269,803,312");
}
