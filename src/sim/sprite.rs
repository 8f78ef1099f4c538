//! Sprite identities and alpha masks
//!
//! The simulation never touches pixel colours. It only needs each sprite's
//! native size (to scale obstacles) and its alpha channel (for the exact
//! collision test). Decoding images is the host's job: it hands us masks
//! through [`SpriteSource`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Every sprite the core can ask the host to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    DinoStart,
    DinoRun1,
    DinoRun2,
    DinoDuck1,
    DinoDuck2,
    DinoJump,
    DinoDead,
    SmallCactus1,
    SmallCactus2,
    SmallCactus3,
    LargeCactus1,
    LargeCactus2,
    LargeCactus3,
    Bird1,
    Bird2,
    Cloud,
}

impl SpriteId {
    /// Native pixel size of the bundled artwork
    pub const fn native_size(self) -> (i32, i32) {
        match self {
            SpriteId::DinoStart => (88, 94),
            SpriteId::DinoRun1 | SpriteId::DinoRun2 => (87, 94),
            SpriteId::DinoDuck1 | SpriteId::DinoDuck2 => (118, 60),
            SpriteId::DinoJump => (84, 94),
            SpriteId::DinoDead => (80, 86),
            SpriteId::SmallCactus1 => (40, 71),
            SpriteId::SmallCactus2 => (68, 71),
            SpriteId::SmallCactus3 => (105, 71),
            SpriteId::LargeCactus1 => (48, 95),
            SpriteId::LargeCactus2 => (99, 95),
            SpriteId::LargeCactus3 => (150, 100),
            SpriteId::Bird1 => (97, 68),
            SpriteId::Bird2 => (93, 62),
            SpriteId::Cloud => (84, 27),
        }
    }
}

/// Per-pixel opacity of a sprite at its native resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaMask {
    /// Build from a row-major alpha buffer. Returns `None` if the buffer
    /// length does not match the dimensions or a dimension is zero.
    pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || alpha.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self { width, height, alpha })
    }

    /// Extract the alpha channel from tightly packed RGBA8 pixels
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Option<Self> {
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Self::new(width, height, alpha)
    }

    /// Build by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Option<Self> {
        let mut alpha = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                alpha.push(f(x, y));
            }
        }
        Self::new(width, height, alpha)
    }

    /// A fully opaque mask
    pub fn opaque(width: u32, height: u32) -> Option<Self> {
        Self::new(width, height, vec![u8::MAX; (width as usize) * (height as usize)])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at native coordinates, 0 outside the mask
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return 0;
        }
        self.alpha[y as usize * self.width as usize + x as usize]
    }

    /// Alpha at a local offset inside a `dest_w` x `dest_h` on-screen box the
    /// mask is stretched over (nearest-neighbour).
    pub fn sample(&self, local_x: i32, local_y: i32, dest_w: i32, dest_h: i32) -> u8 {
        if dest_w <= 0 || dest_h <= 0 || local_x < 0 || local_y < 0 || local_x >= dest_w || local_y >= dest_h {
            return 0;
        }
        let sx = (local_x as i64 * self.width as i64 / dest_w as i64) as i32;
        let sy = (local_y as i64 * self.height as i64 / dest_h as i64) as i32;
        self.alpha_at(sx, sy)
    }
}

/// Host-provided access to sprite alpha data
pub trait SpriteSource {
    /// Alpha mask for a sprite, or `None` if the asset is unavailable
    fn alpha_mask(&self, sprite: SpriteId) -> Option<&AlphaMask>;
}

/// Simple in-memory sprite table
#[derive(Debug, Clone, Default)]
pub struct SpriteMasks {
    masks: HashMap<SpriteId, AlphaMask>,
}

impl SpriteMasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sprite: SpriteId, mask: AlphaMask) {
        self.masks.insert(sprite, mask);
    }

    pub fn with(mut self, sprite: SpriteId, mask: AlphaMask) -> Self {
        self.insert(sprite, mask);
        self
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

impl SpriteSource for SpriteMasks {
    fn alpha_mask(&self, sprite: SpriteId) -> Option<&AlphaMask> {
        self.masks.get(&sprite)
    }
}
