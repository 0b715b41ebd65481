//! Per-frame sprite compositing over a cached scene.
//!
//! Each frame starts from a copy of the scene bitmap. Visible sprites are
//! ordered by effective priority (insertion order breaks ties) and blitted
//! back to front. A sprite pixel lands only where the sprite's priority is
//! at least the scene's stored priority for that pixel, which is how the
//! sprite walks behind a tree trunk and in front of the grass.

use crate::animator::SpriteInstance;
use crate::arena::{SpriteArena, SpriteHandle};
use crate::framebuffer::Framebuffer;
use crate::palette::PaletteIndex;
use crate::priority::PriorityBuffer;
use crate::scene::RenderedScene;

#[derive(Debug, Clone, Copy)]
struct DrawEntry {
    priority: u8,
    sequence: u64,
    handle: SpriteHandle,
}

/// Owns the output frame and the sort scratch space, both reused per frame.
#[derive(Debug, Clone)]
pub struct Compositor {
    frame: Framebuffer,
    order: Vec<DrawEntry>,
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            frame: Framebuffer::screen(PaletteIndex::BLACK),
            order: Vec::new(),
        }
    }

    /// Compose `sprites` over `scene`. The scene is only read.
    pub fn compose(&mut self, scene: &RenderedScene, sprites: &SpriteArena) -> &Framebuffer {
        self.frame.copy_from(&scene.bitmap);

        let height = scene.priority.height();
        self.order.clear();
        self.order.extend(
            sprites
                .iter()
                .filter(|(_, _, sprite)| sprite.is_visible())
                .map(|(handle, sequence, sprite)| DrawEntry {
                    priority: sprite.effective_priority(&scene.bands, height),
                    sequence,
                    handle,
                }),
        );
        self.order.sort_by_key(|e| (e.priority, e.sequence));

        for entry in &self.order {
            if let Some(sprite) = sprites.get(entry.handle) {
                blit_sprite(&mut self.frame, &scene.priority, sprite, entry.priority);
            }
        }

        &self.frame
    }

    /// Fill the frame with a single color, for when no scene is ready.
    pub fn fill(&mut self, color: PaletteIndex) -> &Framebuffer {
        self.frame.fill(color);
        &self.frame
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw the current cel of `sprite` into `frame`, honoring `priority`.
///
/// Returns the number of pixels written.
pub fn blit_sprite(
    frame: &mut Framebuffer,
    priority: &PriorityBuffer,
    sprite: &SpriteInstance,
    sprite_priority: u8,
) -> usize {
    let cel = sprite.current_cel();
    let (x0, y0) = sprite.position().round();
    let width = cel.width() as i32;
    let same_layout = frame.width() == priority.width() && frame.height() == priority.height();
    let mut written = 0;

    for cy in 0..cel.height() {
        let sy = y0 + cy as i32;
        for (cx, (color, opaque)) in cel.row(cy).enumerate() {
            if !opaque {
                continue;
            }
            let cx = cx as i32;
            let sx = if sprite.is_mirrored() {
                x0 + (width - 1 - cx)
            } else {
                x0 + cx
            };
            let Some(offset) = frame.offset(sx, sy) else {
                continue;
            };
            let stored = if same_layout {
                priority.value_at_offset(offset)
            } else {
                priority.priority_at(sx, sy)
            };
            if sprite_priority >= stored {
                frame.set_at_offset(offset, color);
                written += 1;
            }
        }
    }

    written
}
