//! Font registration for the `ab_glyph` text path.
//!
//! `ab_glyph` does not discover OS fonts, so one TTF has to be registered under
//! the "sans-serif" family before anything with text is drawn. The bytes are
//! leaked to satisfy the `'static` bound, once per registered path.

use crate::error::{ProjectionError, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Well-known locations of a sans-serif TTF on Linux, macOS and Windows.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

// Path of the font currently registered, `None` until a registration succeeds.
static REGISTERED: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Make sure a font is registered for chart text.
///
/// With no registration yet, `preferred` is tried before the system candidates.
/// Later calls reuse the registered font unless `preferred` names a different
/// one; if that one cannot be loaded the current font stays in place. Failures
/// are not remembered, so a later call tries again.
pub fn ensure_fonts_registered(preferred: Option<&Path>) -> Result<()> {
    let mut current = REGISTERED
        .lock()
        .map_err(|_| ProjectionError::Render("font registry lock poisoned".into()))?;
    match (current.as_deref(), preferred) {
        (Some(_), None) => Ok(()),
        (Some(have), Some(want)) if have == want => Ok(()),
        (Some(have), Some(want)) => {
            match register_path(want) {
                Ok(()) => *current = Some(want.to_path_buf()),
                Err(msg) => log::warn!("{msg}; keeping {}", have.display()),
            }
            Ok(())
        }
        (None, _) => {
            let path = register_first_available(preferred).map_err(ProjectionError::Render)?;
            *current = Some(path);
            Ok(())
        }
    }
}

/// Path of the font chart text is drawn with, if one is registered.
pub fn registered_font_path() -> Option<PathBuf> {
    REGISTERED.lock().ok().and_then(|g| g.clone())
}

fn register_path(path: &Path) -> std::result::Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| format!("cannot read font {}: {e}", path.display()))?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| format!("{} is not a usable font", path.display()))?;
    log::debug!("registered chart font {}", path.display());
    Ok(())
}

fn register_first_available(preferred: Option<&Path>) -> std::result::Result<PathBuf, String> {
    let candidates = preferred
        .map(Path::to_path_buf)
        .into_iter()
        .chain(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));

    for path in candidates {
        if !path.is_file() {
            continue;
        }
        match register_path(&path) {
            Ok(()) => return Ok(path),
            Err(msg) => log::warn!("{msg}, trying the next one"),
        }
    }

    Err(match preferred {
        Some(p) => format!("no usable font: {} and system fonts failed to load", p.display()),
        None => "no usable font found; pass a TTF with --font".to_string(),
    })
}
