//! Version comparison between the CLI and the template it composes from

use semver::Version;

/// Strip a leading `v` and parse
fn parse_version(version: &str) -> Option<Version> {
    Version::parse(version.trim().trim_start_matches('v')).ok()
}

/// Warning text when the CLI is older than the template expects
///
/// Unparseable versions never produce a warning.
pub fn check_compatibility(
    cli_version: &str,
    template_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    let cli = parse_version(cli_version)?;
    let template = parse_version(template_version)?;

    (cli < template).then(|| {
        format!(
            "Templates target CLI {} or newer, but this is {}. Upgrade with: {}",
            template, cli, upgrade_command
        )
    })
}
