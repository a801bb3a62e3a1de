use fatoora::core::amount_to_words;
use insta::assert_snapshot;
use rust_decimal_macros::dec;

#[test]
fn reference_amounts() {
    assert_snapshot!(
        amount_to_words(dec!(37920.00)),
        @"Thirty-Seven Thousand Nine Hundred Twenty AED ONLY"
    );
    assert_snapshot!(amount_to_words(dec!(1890.00)), @"One Thousand Eight Hundred Ninety AED ONLY");
    assert_snapshot!(amount_to_words(dec!(0)), @"Zero AED ONLY");
    assert_snapshot!(amount_to_words(dec!(15)), @"Fifteen AED ONLY");
    assert_snapshot!(amount_to_words(dec!(100)), @"One Hundred AED ONLY");
    assert_snapshot!(amount_to_words(dec!(101)), @"One Hundred One AED ONLY");
    assert_snapshot!(amount_to_words(dec!(1005)), @"One Thousand Five AED ONLY");
    assert_snapshot!(
        amount_to_words(dec!(123456.78)),
        @"One Hundred Twenty-Three Thousand Four Hundred Fifty-Six Point Seven Eight AED ONLY"
    );
    assert_snapshot!(amount_to_words(dec!(1000000)), @"One Million AED ONLY");
}

#[test]
fn spec_contract() {
    let words = amount_to_words(dec!(37920.00));
    assert!(words.ends_with("AED ONLY"));
    assert!(!words.split_whitespace().any(|w| w == "And"));
    // Title case throughout.
    for word in words.split_whitespace() {
        assert!(word.chars().next().unwrap().is_ascii_uppercase());
    }
}

#[test]
fn rounding_happens_before_expansion() {
    // 2dp half-up rounding first, then words — no floating artifacts.
    assert_eq!(
        amount_to_words(dec!(19.999)),
        amount_to_words(dec!(20.00))
    );
    assert_eq!(
        amount_to_words(dec!(0.005)),
        "Zero Point Zero One AED ONLY"
    );
}

#[test]
fn words_depend_only_on_the_rounded_total() {
    // Same rounded value, different input scales.
    assert_eq!(amount_to_words(dec!(1890)), amount_to_words(dec!(1890.0000)));
}
