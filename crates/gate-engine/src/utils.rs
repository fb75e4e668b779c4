use core_policy::MatchSettings;

/// Split an action string into `(service, method)`
///
/// Returns `None` when the separator is missing.
pub fn parse_action<'a>(action: &'a str, settings: &MatchSettings) -> Option<(&'a str, &'a str)> {
    action.split_once(settings.action_separator())
}

/// Split a resource string into `(db, collection)`
///
/// Returns `None` when the separator is missing.
pub fn parse_resource<'a>(
    resource: &'a str,
    settings: &MatchSettings,
) -> Option<(&'a str, &'a str)> {
    resource.split_once(settings.resource_separator())
}
