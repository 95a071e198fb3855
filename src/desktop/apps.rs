//! Short program names → OS-launchable targets

#[cfg(windows)]
const ALIASES: &[(&str, &str)] = &[
    ("notepad", "notepad.exe"),
    ("bloc de notas", "notepad.exe"),
    ("calculator", "calc.exe"),
    ("calculadora", "calc.exe"),
    ("chrome", "chrome.exe"),
    ("edge", "msedge.exe"),
    ("cmd", "cmd.exe"),
    ("terminal", "wt.exe"),
    ("explorer", "explorer.exe"),
    ("explorador", "explorer.exe"),
    ("spotify", "spotify.exe"),
    ("code", "code"),
    ("vscode", "code"),
    ("word", "winword.exe"),
    ("excel", "excel.exe"),
    ("powerpoint", "powerpnt.exe"),
    ("paint", "mspaint.exe"),
];

#[cfg(not(windows))]
const ALIASES: &[(&str, &str)] = &[
    ("notepad", "gedit"),
    ("bloc de notas", "gedit"),
    ("calculator", "gnome-calculator"),
    ("calculadora", "gnome-calculator"),
    ("chrome", "google-chrome"),
    ("edge", "microsoft-edge"),
    ("cmd", "x-terminal-emulator"),
    ("terminal", "x-terminal-emulator"),
    ("explorer", "xdg-open ."),
    ("explorador", "xdg-open ."),
    ("spotify", "spotify"),
    ("code", "code"),
    ("vscode", "code"),
    ("word", "libreoffice --writer"),
    ("excel", "libreoffice --calc"),
    ("powerpoint", "libreoffice --impress"),
    ("paint", "pinta"),
];

/// Launch target for a program name
///
/// Unknown names are returned unchanged so arbitrary paths and URIs pass
/// straight through to the launcher.
pub fn resolve_app(name: &str) -> String {
    let trimmed = name.trim();
    let key = trimmed.to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, target)| target.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_alias_resolves() {
        let target = resolve_app("Notepad");
        assert_ne!(target, "Notepad");
        assert!(!target.is_empty());
    }

    #[test]
    fn test_unknown_name_passes_through() {
        assert_eq!(resolve_app("/opt/tool/bin/run"), "/opt/tool/bin/run");
        assert_eq!(resolve_app(" https://example.com "), "https://example.com");
    }
}
