//! Command names understood by the embedded VM.

/// Suffix appended to the command name of a successful response.
pub const SUCCESS_SUFFIX: &str = "_SUCCESS";

/// Suffix appended to the command name of a failed response.
pub const FAILURE_SUFFIX: &str = "_FAILURE";

/// Command name constants.
pub struct Commands;

impl Commands {
    // Filesystem
    pub const GET_FS_SNAPSHOT: &'static str = "SDK_GET_FS_SNAPSHOT";
    pub const APPLY_FS_DIFF: &'static str = "SDK_APPLY_FS_DIFF";

    // Dependencies
    pub const GET_DEPS_SNAPSHOT: &'static str = "SDK_GET_DEPS_SNAPSHOT";

    // Editor
    pub const OPEN_FILE: &'static str = "SDK_OPEN_FILE";
    pub const SET_CURRENT_FILE: &'static str = "SDK_SET_CURRENT_FILE";
    pub const SET_UI_THEME: &'static str = "SDK_SET_UI_THEME";
    pub const SET_UI_VIEW: &'static str = "SDK_SET_UI_VIEW";
    pub const TOGGLE_SIDEBAR: &'static str = "SDK_TOGGLE_SIDEBAR";

    // Preview
    pub const GET_PREVIEW_URL: &'static str = "SDK_GET_PREVIEW_URL";
    pub const SET_PREVIEW_URL: &'static str = "SDK_SET_PREVIEW_URL";

    /// Every command the simulated VM registers by default.
    pub const ALL: &'static [&'static str] = &[
        Self::GET_FS_SNAPSHOT,
        Self::APPLY_FS_DIFF,
        Self::GET_DEPS_SNAPSHOT,
        Self::OPEN_FILE,
        Self::SET_CURRENT_FILE,
        Self::SET_UI_THEME,
        Self::SET_UI_VIEW,
        Self::TOGGLE_SIDEBAR,
        Self::GET_PREVIEW_URL,
        Self::SET_PREVIEW_URL,
    ];
}

/// Response name for a successful command.
pub fn success_name(command: &str) -> String {
    format!("{}{}", command, SUCCESS_SUFFIX)
}

/// Response name for a failed command.
pub fn failure_name(command: &str) -> String {
    format!("{}{}", command, FAILURE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_names() {
        assert_eq!(success_name(Commands::OPEN_FILE), "SDK_OPEN_FILE_SUCCESS");
        assert_eq!(failure_name(Commands::OPEN_FILE), "SDK_OPEN_FILE_FAILURE");
    }

    #[test]
    fn test_all_commands_unique() {
        let mut names = Commands::ALL.to_vec();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Commands::ALL.len());
    }
}
