use crate::error::RenderError;
use ab_glyph::FontVec;
use fontdb::{Database, Family, Query};
use std::path::Path;
use std::sync::Arc;

/// A parsed font shared by every stimulus that renders with it
#[derive(Clone)]
pub struct LoadedFont {
    pub font: Arc<FontVec>,
    pub name: String,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont").field("name", &self.name).finish()
    }
}

/// Looks up an installed font by family name.
///
/// Falls back to the system monospace face, then sans-serif, when the family
/// is not installed.
pub fn find_font(family: &str) -> Result<LoadedFont, RenderError> {
    let mut db = Database::new();
    db.load_system_fonts();
    log::debug!("font database holds {} faces", db.len());

    let families = [Family::Name(family), Family::Monospace, Family::SansSerif];
    let query = Query {
        families: &families,
        ..Query::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| RenderError::FontNotFound(family.to_string()))?;

    let name = db
        .face(id)
        .map(|face| face.post_script_name.clone())
        .unwrap_or_else(|| family.to_string());
    if !name.to_lowercase().contains(&family.to_lowercase()) {
        log::warn!("font '{}' not installed, falling back to '{}'", family, name);
    }

    let font = db
        .with_face_data(id, |data, index| {
            FontVec::try_from_vec_and_index(data.to_vec(), index)
        })
        .ok_or_else(|| RenderError::FontNotFound(family.to_string()))?
        .map_err(|_| RenderError::InvalidFont(name.clone()))?;

    Ok(LoadedFont {
        font: Arc::new(font),
        name,
    })
}

pub fn load_font_file(path: impl AsRef<Path>) -> Result<LoadedFont, RenderError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| RenderError::FontIo {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let font = FontVec::try_from_vec(data).map_err(|_| RenderError::InvalidFont(name.clone()))?;
    Ok(LoadedFont {
        font: Arc::new(font),
        name,
    })
}

/// Any installed font, for tests and benches. `None` on machines without fonts.
pub fn any_system_font() -> Option<LoadedFont> {
    find_font("DejaVu Sans Mono").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let err = load_font_file("/definitely/not/here.ttf").unwrap_err();
        assert!(matches!(err, RenderError::FontIo { .. }));
    }

    #[test]
    fn garbage_is_invalid_font() {
        let dir = std::env::temp_dir().join("cogex-render-font-test.ttf");
        std::fs::write(&dir, [0u8; 64]).unwrap();
        let err = load_font_file(&dir).unwrap_err();
        assert!(matches!(err, RenderError::InvalidFont(_)));
        let _ = std::fs::remove_file(&dir);
    }
}
