//! Image decoding for card and gallery textures.

use swipe_core::ImagePurpose;

const CARD_MAX_EDGE: u32 = 800;
const THUMBNAIL_MAX_EDGE: u32 = 240;

#[derive(Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for PreviewImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn max_edge(purpose: ImagePurpose) -> u32 {
    match purpose {
        ImagePurpose::Card => CARD_MAX_EDGE,
        ImagePurpose::Thumbnail => THUMBNAIL_MAX_EDGE,
    }
}

/// Decodes any supported format (GIFs yield their first frame) and shrinks
/// it to fit the purpose.
pub fn decode_preview_image(bytes: &[u8], purpose: ImagePurpose) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let edge = max_edge(purpose);
    let resized = if dynamic.width() > edge || dynamic.height() > edge {
        dynamic.thumbnail(edge, edge).to_rgba8()
    } else {
        dynamic.to_rgba8()
    };
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    if width == 0 || height == 0 {
        return Err("image has no pixels".to_string());
    }
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}
