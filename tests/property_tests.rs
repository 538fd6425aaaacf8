//! Property-based tests for configvar using proptest.
//!
//! These tests verify invariants that must hold for all inputs, not just
//! hand-picked examples: immutability of combinators, integer literal
//! parsing, date display round-trips and union ordering.

use proptest::prelude::*;

use configvar::{
    date, enumeration, integer, number, string, Data, DateObject, Group, Issues, Schema,
    Timezone, VarResultExt,
};
use stillwater::Semigroup;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_timezone() -> impl Strategy<Value = Timezone> {
    prop_oneof![
        Just(Timezone::Local),
        Just(Timezone::Utc),
        (-840i32..=840).prop_map(|minutes| Timezone::Offset { minutes }),
    ]
}

/// Dates whose display form is a full-precision ISO string.
fn arb_date_object() -> impl Strategy<Value = DateObject> {
    (
        1000i32..=9999,
        1u32..=12,
        1u32..=28,
        0u32..24,
        0u32..60,
        0u32..60,
        0u32..1000,
        arb_timezone(),
    )
        .prop_map(
            |(year, month, day, hour, minute, second, millisecond, timezone)| DateObject {
                year,
                month,
                day,
                hour,
                minute,
                second,
                millisecond,
                timezone,
            },
        )
}

fn arb_issues() -> impl Strategy<Value = Issues> {
    prop::collection::vec("[a-z ]{1,20}", 1..5)
        .prop_map(|v| Issues::from_vec(v).expect("non-empty by construction"))
}

// ============================================================================
// Combinator properties
// ============================================================================

proptest! {
    /// Deriving new variables never changes the original.
    #[test]
    fn prop_combinators_do_not_mutate(default in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let base = number();
        let _optional = base.optional();
        let _defaulted = base.default_to(default);
        let _union = base.or(&number().min(0.0));
        let _named = base.from("X").describe("x");

        prop_assert!(!base.is_optional());
        prop_assert!(base.default_value().is_none());
        prop_assert!(base.name().is_none());
        prop_assert!(base.description().is_none());
        prop_assert!(base.parse(None).is_failure());
    }

    /// A default is used only for absent input.
    #[test]
    fn prop_default_only_for_absent(default in any::<i64>(), input in any::<i64>()) {
        let v = integer().default_to(default);
        let parsed = v.parse(None);
        prop_assert_eq!(parsed.value(), Some(&default));
        let parsed = v.parse(Some(&input.to_string()));
        prop_assert_eq!(parsed.value(), Some(&input));
        prop_assert!(v.parse(Some("")).is_failure());
    }

    /// Optional variables still validate present input.
    #[test]
    fn prop_optional_validates_present(s in "[a-z]{1,10}") {
        let v = integer().optional();
        let parsed = v.parse(None);
        prop_assert_eq!(parsed.value(), Some(&None));
        prop_assert!(v.parse(Some(&s)).is_failure());
    }
}

// ============================================================================
// Integer literal properties
// ============================================================================

proptest! {
    #[test]
    fn prop_integer_decimal_round_trip(n in any::<i64>()) {
        let parsed = integer().parse(Some(&n.to_string()));
        prop_assert_eq!(parsed.value(), Some(&n));
    }

    #[test]
    fn prop_integer_hex_and_binary(n in 0i64..=i64::MAX) {
        let parsed = integer().parse(Some(&format!("0x{:x}", n)));
        prop_assert_eq!(parsed.value(), Some(&n));
        let parsed = integer().parse(Some(&format!("0x{:X}", n)));
        prop_assert_eq!(parsed.value(), Some(&n));
        let parsed = integer().parse(Some(&format!("0b{:b}", n)));
        prop_assert_eq!(parsed.value(), Some(&n));
    }

    #[test]
    fn prop_integer_rejects_fractions(whole in any::<i32>(), frac in 1u32..1000) {
        let text = format!("{}.{}", whole, frac);
        prop_assert!(integer().parse(Some(&text)).is_failure());
    }

    /// Bounds are inclusive and rounded inward.
    #[test]
    fn prop_integer_bounds(n in -1000i64..1000, lo in -500.0f64..0.0, hi in 0.0f64..500.0) {
        let v = integer().min(lo).max(hi);
        let accepted = v.parse(Some(&n.to_string())).is_success();
        let expected = n as f64 >= lo.ceil() && n as f64 <= hi.floor();
        prop_assert_eq!(accepted, expected);
    }
}

// ============================================================================
// Date properties
// ============================================================================

proptest! {
    #[test]
    fn prop_date_display_round_trip(original in arb_date_object()) {
        let text = original.to_string();
        let parsed = date().parse(Some(&text));
        prop_assert_eq!(parsed.value(), Some(&original));
    }
}

// ============================================================================
// Union properties
// ============================================================================

proptest! {
    /// When both sides accept the input, the left side's value wins.
    #[test]
    fn prop_union_prefers_left(word in "[a-z]{1,8}") {
        let upper = string().map(|s: String| s.to_uppercase());
        let lower = string().map(|s: String| s.to_lowercase());
        let either = upper.or(&lower);
        let parsed = either.parse(Some(&word));
        prop_assert_eq!(parsed.value(), Some(&word.to_uppercase()));
    }

    /// When both sides fail, issues are concatenated left then right.
    #[test]
    fn prop_union_issue_order(word in "[a-z]{1,8}") {
        let colors = enumeration(["red", "green"]);
        let either = colors.map(|s: String| s.len() as i64).or(&integer());
        prop_assume!(word != "red" && word != "green");

        let issues = either.parse(Some(&word)).issues().map(Issues::to_vec);
        prop_assert_eq!(
            issues,
            Some(vec![
                "must be one of \"red\"/\"green\"".to_string(),
                "must be an integer".to_string(),
            ])
        );
    }

    /// Unions flatten: grouping does not change behavior.
    #[test]
    fn prop_union_associative(n in any::<i64>(), word in "[a-z]{1,8}") {
        let a = integer().min(0.0);
        let b = integer().max(-10.0);
        let c = integer();
        let left = a.or(&b).or(&c);
        let right = a.or(&b.or(&c));

        for input in [n.to_string(), word] {
            let l = left.parse(Some(&input));
            let r = right.parse(Some(&input));
            prop_assert_eq!(l.value(), r.value());
            prop_assert_eq!(l.issues().map(Issues::to_vec), r.issues().map(Issues::to_vec));
        }
        prop_assert_eq!(left.kind().len(), 3);
        prop_assert_eq!(right.kind().len(), 3);
    }

    #[test]
    fn prop_issues_combine_preserves_order(a in arb_issues(), b in arb_issues()) {
        let mut expected = a.to_vec();
        expected.extend(b.to_vec());
        prop_assert_eq!(a.combine(b).to_vec(), expected);
    }
}

// ============================================================================
// Resolution properties
// ============================================================================

proptest! {
    /// Every missing required field is reported, in key order.
    #[test]
    fn prop_every_missing_field_reported(keys in prop::collection::btree_set("[a-z]{1,6}", 1..8), present in prop::collection::vec(any::<bool>(), 8)) {
        let mut group = Group::new();
        let mut data = Data::new();
        let mut missing = Vec::new();

        for (i, key) in keys.iter().enumerate() {
            group = group.field(key.clone(), integer());
            if present[i] {
                data.insert(key.clone(), i.to_string());
            } else {
                missing.push(key.clone());
            }
        }
        let schema: Schema = group.into();

        match configvar::parse_values(&schema, &data) {
            Ok(value) => {
                prop_assert!(missing.is_empty());
                prop_assert_eq!(value.as_object().map(|m| m.len()), Some(keys.len()));
            }
            Err(err) => {
                let paths: Vec<String> = err.issues().expect("issues").iter().map(|i| i.path()).collect();
                prop_assert_eq!(paths, missing);
            }
        }
    }
}
