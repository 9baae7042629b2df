//! Channel-status template rendering.
//!
//! Operators store a template per tracked channel; every refresh tick
//! substitutes the count tokens and renames the channel only when the
//! rendered string differs from the current name.

/// Text-channel count token.
pub const TOKEN_TEXT_CHANNELS: &str = "!ch!";
/// Member count token, bots included.
pub const TOKEN_MEMBERS: &str = "!mb!";
/// Bot count token.
pub const TOKEN_BOTS: &str = "!bt!";
/// Human count token, bots excluded.
pub const TOKEN_HUMANS: &str = "!us!";

/// Live counts substituted into a status template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuildCounts {
    pub text_channels: u64,
    pub members: u64,
    pub bots: u64,
    pub humans: u64,
}

/// Substitute the four count tokens into a template.
pub fn render_status(template: &str, counts: &GuildCounts) -> String {
    template
        .replace(TOKEN_TEXT_CHANNELS, &counts.text_channels.to_string())
        .replace(TOKEN_MEMBERS, &counts.members.to_string())
        .replace(TOKEN_BOTS, &counts.bots.to_string())
        .replace(TOKEN_HUMANS, &counts.humans.to_string())
}

/// Whether rendering this template needs any member data.
pub fn wants_member_counts(template: &str) -> bool {
    template.contains(TOKEN_MEMBERS) || wants_member_breakdown(template)
}

/// Whether rendering this template needs a full membership scan for the
/// bot/human breakdown.
pub fn wants_member_breakdown(template: &str) -> bool {
    template.contains(TOKEN_BOTS) || template.contains(TOKEN_HUMANS)
}

/// Whether the channel must be renamed to converge on the computed name.
pub fn rename_needed(current_name: Option<&str>, computed: &str) -> bool {
    current_name != Some(computed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_render_live_counts() {
        let counts = GuildCounts {
            text_channels: 4,
            members: 12,
            bots: 2,
            humans: 10,
        };

        assert_eq!(
            render_status("Members:!mb! Bots:!bt!", &counts),
            "Members:12 Bots:2"
        );
        assert_eq!(
            render_status("!ch! channels, !us! humans", &counts),
            "4 channels, 10 humans"
        );
        assert_eq!(render_status("plain name", &counts), "plain name");
    }

    #[test]
    fn member_scan_is_only_needed_for_breakdown_tokens() {
        assert!(wants_member_breakdown("Bots: !bt!"));
        assert!(wants_member_breakdown("Humans: !us!"));
        assert!(!wants_member_breakdown("Members: !mb!"));

        assert!(wants_member_counts("Members: !mb!"));
        assert!(!wants_member_counts("Channels: !ch!"));
    }

    #[test]
    fn repeated_renders_converge() {
        let counts = GuildCounts {
            text_channels: 3,
            members: 7,
            bots: 1,
            humans: 6,
        };

        let rendered = render_status("lobby-!mb!", &counts);
        assert!(rename_needed(Some("lobby-0"), &rendered));

        // After the rename lands, a second tick with unchanged membership
        // computes the same name and leaves the channel alone.
        let second = render_status("lobby-!mb!", &counts);
        assert_eq!(rendered, second);
        assert!(!rename_needed(Some(rendered.as_str()), &second));

        // A channel with no name yet always needs the first rename.
        assert!(rename_needed(None, &second));
    }
}
