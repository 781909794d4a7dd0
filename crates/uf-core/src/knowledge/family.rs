//! Discovery families.
//!
//! Learning one preparation of a food teaches its sibling preparations: a
//! player who identifies a chopped cooked bolete also knows the raw one.
//! `expand_family` maps any member of a family to the whole family.

use crate::ids::ItemCode;

const COOK_STATES: [&str; 3] = ["partbaked", "perfect", "charred"];

const MUSHROOM_VERBS: [&str; 3] = ["cookedmushroom", "choppedmushroom", "cookedchoppedmushroom"];
const VEGGIE_VERBS: [&str; 3] = ["cookedveggie", "choppedveggie", "cookedchoppedveggie"];
const FRUIT_FORMS: [&str; 4] = ["dryfruit", "candiedfruit", "dehydratedfruit", "pressedmash"];

/// Expand a code to its full discovery family.
///
/// Returns the empty set for codes outside the known produce families; the
/// caller then marks only the code itself. Expanding any member of a family
/// yields the same family, so marking is order-independent.
pub fn expand_family(code: &ItemCode) -> Vec<ItemCode> {
    let mut parts = code.path().split('-');
    let kind = match parts.next() {
        Some(kind) => kind,
        None => return Vec::new(),
    };
    let produce = match parts.next() {
        Some(produce) if !produce.is_empty() => produce,
        _ => return Vec::new(),
    };

    if kind == "mushroom" || MUSHROOM_VERBS.contains(&kind) {
        mushroom_family(code.domain(), produce)
    } else if kind == "vegetable" || VEGGIE_VERBS.contains(&kind) {
        vegetable_family(code.domain(), produce)
    } else if kind == "fruit" || FRUIT_FORMS.contains(&kind) {
        fruit_family(code.domain(), produce)
    } else {
        Vec::new()
    }
}

/// Raw north/south variants plus every cook state of every preparation,
/// all under the variant's own domain. 11 codes.
fn mushroom_family(domain: &str, produce: &str) -> Vec<ItemCode> {
    let mut family = Vec::with_capacity(11);
    family.push(ItemCode::new(domain, &format!("mushroom-{produce}-normal")));
    family.push(ItemCode::new(
        domain,
        &format!("mushroom-{produce}-normal-north"),
    ));
    for verb in MUSHROOM_VERBS {
        for state in COOK_STATES {
            family.push(ItemCode::new(domain, &format!("{verb}-{produce}-{state}")));
        }
    }
    family
}

/// Raw form plus every cook state of every preparation. 10 codes.
fn vegetable_family(domain: &str, produce: &str) -> Vec<ItemCode> {
    let mut family = Vec::with_capacity(10);
    family.push(ItemCode::new(domain, &format!("vegetable-{produce}")));
    for verb in VEGGIE_VERBS {
        for state in COOK_STATES {
            family.push(ItemCode::new(domain, &format!("{verb}-{produce}-{state}")));
        }
    }
    family
}

/// Base fruit under the game domain, derived forms under the variant's
/// domain. 5 codes.
fn fruit_family(domain: &str, produce: &str) -> Vec<ItemCode> {
    let mut family = Vec::with_capacity(5);
    family.push(ItemCode::new("game", &format!("fruit-{produce}")));
    for form in FRUIT_FORMS {
        family.push(ItemCode::new(domain, &format!("{form}-{produce}")));
    }
    family
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn family_set(code: &str) -> BTreeSet<ItemCode> {
        expand_family(&ItemCode::parse(code)).into_iter().collect()
    }

    #[test]
    fn test_mushroom_family_size_and_members() {
        let family = family_set("game:mushroom-bolete-normal");
        assert_eq!(family.len(), 11);
        assert!(family.contains(&ItemCode::parse("game:mushroom-bolete-normal")));
        assert!(family.contains(&ItemCode::parse("game:mushroom-bolete-normal-north")));
        assert!(family.contains(&ItemCode::parse("game:cookedmushroom-bolete-perfect")));
        assert!(family.contains(&ItemCode::parse("game:choppedmushroom-bolete-partbaked")));
        assert!(family.contains(&ItemCode::parse("game:cookedchoppedmushroom-bolete-charred")));
    }

    #[test]
    fn test_mushroom_family_from_any_member() {
        let base = family_set("game:mushroom-bolete-normal");
        assert_eq!(family_set("game:mushroom-bolete-normal-north"), base);
        assert_eq!(family_set("game:cookedmushroom-bolete-perfect"), base);
        assert_eq!(family_set("game:choppedmushroom-bolete-charred"), base);
        assert_eq!(family_set("game:cookedchoppedmushroom-bolete-partbaked"), base);
    }

    #[test]
    fn test_mushroom_family_keeps_variant_domain() {
        let family = family_set("wildcraft:mushroom-morel-normal");
        assert_eq!(family.len(), 11);
        for code in &family {
            assert_eq!(code.domain(), "wildcraft");
        }
    }

    #[test]
    fn test_vegetable_family_size_and_members() {
        let family = family_set("game:vegetable-cassava");
        assert_eq!(family.len(), 10);
        assert!(family.contains(&ItemCode::parse("game:vegetable-cassava")));
        assert!(family.contains(&ItemCode::parse("game:cookedveggie-cassava-perfect")));
        assert!(family.contains(&ItemCode::parse("game:choppedveggie-cassava-partbaked")));
        assert!(family.contains(&ItemCode::parse("game:cookedchoppedveggie-cassava-charred")));
    }

    #[test]
    fn test_vegetable_family_from_cooked_variant() {
        assert_eq!(
            family_set("game:cookedchoppedveggie-cassava-perfect"),
            family_set("game:vegetable-cassava")
        );
    }

    #[test]
    fn test_fruit_family_base_under_game_domain() {
        let family = family_set("wildcraft:dryfruit-lychee");
        assert_eq!(family.len(), 5);
        assert!(family.contains(&ItemCode::parse("game:fruit-lychee")));
        assert!(family.contains(&ItemCode::parse("wildcraft:dryfruit-lychee")));
        assert!(family.contains(&ItemCode::parse("wildcraft:candiedfruit-lychee")));
        assert!(family.contains(&ItemCode::parse("wildcraft:dehydratedfruit-lychee")));
        assert!(family.contains(&ItemCode::parse("wildcraft:pressedmash-lychee")));
    }

    #[test]
    fn test_fruit_family_from_base() {
        let family = family_set("game:fruit-lychee");
        assert_eq!(family.len(), 5);
        assert!(family.contains(&ItemCode::parse("game:dryfruit-lychee")));
    }

    #[test]
    fn test_expansion_idempotent() {
        let base = family_set("game:mushroom-bolete-normal");
        for member in &base {
            assert_eq!(&family_set(member.as_str()), &base, "member {member}");
        }
    }

    #[test]
    fn test_unrelated_prefix_has_empty_family() {
        assert!(family_set("game:bread-spelt-perfect").is_empty());
        assert!(family_set("game:stone-granite").is_empty());
    }

    #[test]
    fn test_bare_kind_has_empty_family() {
        assert!(family_set("game:mushroom").is_empty());
        assert!(family_set("game:fruit").is_empty());
    }
}
