use twilight_model::id::{
    Id,
    marker::{RoleMarker, UserMarker},
};

/// Extract the numeric part of a mention or raw snowflake argument.
///
/// `prefixes` lists the accepted mention openers; a bare number is always
/// accepted. Zero is rejected so the result is a valid `Id`.
fn parse_snowflake(raw: &str, prefixes: &[&str]) -> Option<u64> {
    let trimmed = raw.trim();

    let numeric = if trimmed.ends_with('>') {
        prefixes
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))?
            .strip_suffix('>')?
    } else {
        trimmed
    };

    let id = numeric.parse::<u64>().ok()?;
    (id != 0).then_some(id)
}

/// Parse a target user from a raw argument (`<@id>`, `<@!id>`, or raw ID).
pub fn parse_user_id(raw: &str) -> Option<Id<UserMarker>> {
    parse_snowflake(raw, &["<@!", "<@"]).map(Id::new)
}

/// Parse a role from a raw argument (`<@&id>` or raw ID).
pub fn parse_role_id(raw: &str) -> Option<Id<RoleMarker>> {
    parse_snowflake(raw, &["<@&"]).map(Id::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_mentions_and_raw_ids_parse() {
        assert_eq!(parse_user_id("123").map(Id::get), Some(123));
        assert_eq!(parse_user_id("<@123>").map(Id::get), Some(123));
        assert_eq!(parse_user_id("<@!123>").map(Id::get), Some(123));
        assert_eq!(parse_user_id(" 123 ").map(Id::get), Some(123));
    }

    #[test]
    fn user_parser_rejects_non_users() {
        assert_eq!(parse_user_id("<@&123>"), None);
        assert_eq!(parse_user_id("<@abc>"), None);
        assert_eq!(parse_user_id("everyone"), None);
        assert_eq!(parse_user_id("0"), None);
        assert_eq!(parse_user_id("<@0>"), None);
    }

    #[test]
    fn role_mentions_and_raw_ids_parse() {
        assert_eq!(parse_role_id("456").map(Id::get), Some(456));
        assert_eq!(parse_role_id("<@&456>").map(Id::get), Some(456));
        assert_eq!(parse_role_id("<@456>"), None);
        assert_eq!(parse_role_id("0"), None);
    }
}
