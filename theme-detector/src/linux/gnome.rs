use super::{first_line, follow_monitor, INTERFACE_SCHEMA};
use crate::{
    classify::{is_dark_gnome, is_dark_name},
    watcher::WatchContext,
    CommandRunner, DetectorError,
};
use log::debug;
use std::sync::Arc;

const GTK_THEME: &str = "gtk-theme";
const COLOR_SCHEME: &str = "color-scheme";

/// GNOME/GTK detector. Dark when either the GTK theme or the color scheme
/// says so; older GNOME releases have no `color-scheme` key.
pub(crate) struct Gnome {
    runner: Arc<dyn CommandRunner>,
}

impl Gnome {
    pub(crate) fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn read(&self, key: &str) -> Result<String, DetectorError> {
        let output = self
            .runner
            .output(&["gsettings", "get", INTERFACE_SCHEMA, key])?;
        Ok(first_line(&output).to_owned())
    }

    pub(crate) fn query(&self) -> Result<bool, DetectorError> {
        match (self.read(GTK_THEME), self.read(COLOR_SCHEME)) {
            (Err(err), Err(_)) => Err(err),
            (gtk_theme, color_scheme) => {
                if let Err(err) = gtk_theme.as_ref().and(color_scheme.as_ref()) {
                    debug!("Reading only one GNOME setting: {err}");
                }
                Ok(is_dark_gnome(
                    gtk_theme.as_deref().unwrap_or_default(),
                    color_scheme.as_deref().unwrap_or_default(),
                ))
            }
        }
    }

    pub(crate) fn watch(&self, ctx: &mut WatchContext) -> Result<(), DetectorError> {
        let dark = |key| self.read(key).is_ok_and(|value| is_dark_name(&value));
        let mut gtk_theme_dark = dark(GTK_THEME);
        let mut color_scheme_dark = dark(COLOR_SCHEME);

        follow_monitor(
            self.runner.as_ref(),
            &["gsettings", "monitor", INTERFACE_SCHEMA],
            ctx,
            |key, value, ctx| {
                match key {
                    GTK_THEME => gtk_theme_dark = is_dark_name(value),
                    COLOR_SCHEME => color_scheme_dark = is_dark_name(value),
                    _ => return,
                }
                debug!("GNOME {key} changed to {value}");
                ctx.update(gtk_theme_dark || color_scheme_dark);
            },
        )
    }
}

#[cfg(test)]
mod gnome_tests;
