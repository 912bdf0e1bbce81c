//! Dark/light classification of the raw values each platform reports.

/// A theme, color scheme or interface style name is dark when it contains
/// "dark", ignoring case.
pub fn is_dark_name(name: &str) -> bool {
    name.to_lowercase().contains("dark")
}

/// Windows stores `AppsUseLightTheme`, so `0` means dark.
pub fn is_dark_registry_value(apps_use_light_theme: u32) -> bool {
    apps_use_light_theme == 0
}

/// GNOME is dark when either the GTK theme or the color scheme is.
pub fn is_dark_gnome(gtk_theme: &str, color_scheme: &str) -> bool {
    is_dark_name(gtk_theme) || is_dark_name(color_scheme)
}

/// Scan the contents of an LXDE `desktop.conf` for a dark `sNet/ThemeName`.
pub fn is_dark_lxde_config(contents: &str) -> bool {
    contents
        .lines()
        .any(|line| line.starts_with("sNet/ThemeName") && is_dark_name(line))
}
