use std::fmt;

pub const MAX_UPLOAD_BYTES: u64 = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    Empty,
    NotAnImage { mime: String },
    TooLarge { size: u64, limit: u64 },
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Empty => write!(f, "Le fichier est vide."),
            UploadError::NotAnImage { .. } => {
                write!(f, "Seules les images (jpg, png) sont acceptées.")
            }
            UploadError::TooLarge { limit, .. } => {
                write!(f, "L'image dépasse la taille maximale de {} Mo.", limit / (1024 * 1024))
            }
        }
    }
}

impl std::error::Error for UploadError {}

pub fn check_upload(size: u64, mime: &str) -> Result<(), UploadError> {
    if size == 0 {
        return Err(UploadError::Empty);
    }
    if !mime.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            mime: mime.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Nesting depth of `dragenter`/`dragleave` pairs over a drop zone.
///
/// Child elements fire their own enter/leave events, so the zone is only
/// considered left once every enter has been matched.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DragDepth {
    depth: u32,
}

impl DragDepth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when this enter activates the zone.
    pub fn enter(&mut self) -> bool {
        self.depth = self.depth.saturating_add(1);
        self.depth == 1
    }

    /// Returns true when this leave deactivates the zone.
    pub fn leave(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }
        self.depth -= 1;
        self.depth == 0
    }

    pub fn reset(&mut self) {
        self.depth = 0;
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }
}
