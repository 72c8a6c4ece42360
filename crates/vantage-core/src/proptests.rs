//! Property-based tests for core types.

#[allow(clippy::unwrap_used)]
mod tests {
    use crate::{Role, Status};
    use proptest::prelude::*;

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn test_role_display_parse_roundtrip(role in any_role()) {
            let parsed: Role = role.to_string().parse().unwrap();
            prop_assert_eq!(parsed, role);
        }

        #[test]
        fn test_unknown_role_strings_rejected(s in "[a-z]{1,12}") {
            prop_assume!(!matches!(
                s.as_str(),
                "founder" | "producer" | "investor" | "consumer" | "admin"
            ));
            prop_assert!(s.parse::<Role>().is_err());
        }

        #[test]
        fn test_unknown_status_strings_rejected(s in "[a-z]{1,12}") {
            prop_assume!(!matches!(
                s.as_str(),
                "active" | "pending" | "inactive" | "deactivated"
            ));
            prop_assert!(s.parse::<Status>().is_err());
        }
    }
}
