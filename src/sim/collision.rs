//! Two-phase collision detection
//!
//! Rectangles alone give false positives around thin cactus arms and bird
//! wings. The inset player box is a cheap reject; the authoritative test
//! compares alpha masks pixel by pixel over the overlap of the player's
//! *draw* box and the obstacle's bounds.

use super::obstacle::Obstacle;
use super::player::Player;
use super::rect::Rect;
use super::sprite::{SpriteId, SpriteSource};

/// Alpha of `sprite` drawn into `dest` at screen pixel (`x`, `y`).
/// A sprite the host cannot supply counts as solid.
fn opacity_at(sprites: &impl SpriteSource, sprite: SpriteId, dest: &Rect, x: i32, y: i32) -> u8 {
    match sprites.alpha_mask(sprite) {
        Some(mask) => mask.sample(x - dest.x, y - dest.y, dest.w, dest.h),
        None => u8::MAX,
    }
}

/// Exact test of two sprites drawn into their boxes
pub fn pixels_overlap(
    sprites: &impl SpriteSource,
    a: (SpriteId, Rect),
    b: (SpriteId, Rect),
) -> bool {
    let Some(overlap) = a.1.intersection(&b.1) else {
        return false;
    };
    for y in overlap.top()..overlap.bottom() {
        for x in overlap.left()..overlap.right() {
            if opacity_at(sprites, a.0, &a.1, x, y) != 0 && opacity_at(sprites, b.0, &b.1, x, y) != 0 {
                return true;
            }
        }
    }
    false
}

/// Whether the player touches a single obstacle
pub fn player_hits_obstacle(
    player: &Player,
    obstacle: &Obstacle,
    sprites: &impl SpriteSource,
) -> bool {
    let bounds = obstacle.bounds();
    if !player.collision_rect().intersects(&bounds) {
        return false;
    }
    pixels_overlap(sprites, player.current_frame(), (obstacle.sprite, bounds))
}

/// Whether the player touches any live obstacle this frame
pub fn detect_collision(
    player: &Player,
    obstacles: &[Obstacle],
    sprites: &impl SpriteSource,
) -> bool {
    let hit_box = player.collision_rect();
    let frame = player.current_frame();
    obstacles.iter().any(|obstacle| {
        let bounds = obstacle.bounds();
        hit_box.intersects(&bounds) && pixels_overlap(sprites, frame, (obstacle.sprite, bounds))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::obstacle::{CactusClass, ObstacleKind};
    use crate::sim::sprite::{AlphaMask, SpriteMasks};
    use glam::IVec2;
    use proptest::prelude::*;

    fn cactus(x: i32, y: i32, w: i32, h: i32) -> Obstacle {
        Obstacle {
            id: 0,
            sprite: SpriteId::SmallCactus1,
            pos: IVec2::new(x, y),
            w,
            h,
            kind: ObstacleKind::Ground {
                class: CactusClass::Small,
            },
        }
    }

    fn running_player() -> Player {
        let mut p = Player::new();
        p.start();
        p
    }

    /// Every sprite fully opaque
    fn solid() -> SpriteMasks {
        let mut masks = SpriteMasks::new();
        for sprite in [SpriteId::DinoRun1, SpriteId::DinoRun2, SpriteId::DinoStart, SpriteId::SmallCactus1] {
            masks.insert(sprite, AlphaMask::opaque(4, 4).unwrap());
        }
        masks
    }

    #[test]
    fn test_broad_phase_rejects_graze() {
        let p = running_player();
        // Overlaps the draw box's left margin (x 50..56) but not the inset box
        let o = cactus(40, 230, 12, 30);
        assert!(p.draw_rect().intersects(&o.bounds()));
        assert!(!detect_collision(&p, &[o], &solid()));
    }

    #[test]
    fn test_solid_sprites_collide() {
        let p = running_player();
        let o = cactus(70, 240, 20, 30);
        assert!(detect_collision(&p, &[o], &solid()));
    }

    #[test]
    fn test_transparent_obstacle_never_collides() {
        let p = running_player();
        let o = cactus(70, 240, 20, 30);
        let masks = solid().with(SpriteId::SmallCactus1, AlphaMask::new(2, 2, vec![0; 4]).unwrap());
        assert!(!detect_collision(&p, &[o], &masks));
    }

    #[test]
    fn test_missing_masks_fall_back_to_solid() {
        let p = running_player();
        let o = cactus(70, 240, 20, 30);
        assert!(detect_collision(&p, &[o], &SpriteMasks::new()));
    }

    #[test]
    fn test_disjoint_opaque_halves_miss() {
        // Player sprite opaque only in its left half, cactus only in its
        // right half; their boxes overlap but the opaque parts don't.
        let p = running_player();
        let draw = p.draw_rect();
        let o = cactus(draw.x + 22, draw.y + 10, 22, 30);
        let masks = SpriteMasks::new()
            .with(
                SpriteId::DinoRun1,
                AlphaMask::from_fn(44, 44, |x, _| if x < 22 { 255 } else { 0 }).unwrap(),
            )
            .with(
                SpriteId::SmallCactus1,
                AlphaMask::from_fn(22, 30, |x, _| if x >= 11 { 255 } else { 0 }).unwrap(),
            );
        assert!(p.collision_rect().intersects(&o.bounds()));
        assert!(!detect_collision(&p, &[o.clone()], &masks));

        // Widen the player's opaque region into the cactus's opaque half
        let masks = masks.with(SpriteId::DinoRun1, AlphaMask::opaque(44, 44).unwrap());
        assert!(detect_collision(&p, &[o], &masks));
    }

    #[test]
    fn test_pixel_scan_covers_draw_box_outside_hit_box() {
        // Feet and cactus tip are opaque only below the inset box (y >= 254),
        // still inside the draw box (y < 264)
        let p = running_player();
        let hit_box = p.collision_rect();
        assert_eq!(hit_box.bottom(), 254);
        let o = cactus(60, 250, 20, 14);
        assert!(hit_box.intersects(&o.bounds()));

        let masks = SpriteMasks::new()
            .with(
                SpriteId::DinoRun1,
                AlphaMask::from_fn(44, 44, |_, y| if y >= 34 { 255 } else { 0 }).unwrap(),
            )
            .with(
                SpriteId::SmallCactus1,
                AlphaMask::from_fn(20, 14, |_, y| if y >= 4 { 255 } else { 0 }).unwrap(),
            );
        assert!(!hit_box.contains(IVec2::new(60, 254)));
        assert!(p.draw_rect().contains(IVec2::new(60, 254)));
        assert!(detect_collision(&p, &[o], &masks));
    }

    #[test]
    fn test_single_obstacle_helper_matches() {
        let p = running_player();
        let hit = cactus(70, 240, 20, 30);
        let miss = cactus(300, 240, 20, 30);
        assert!(player_hits_obstacle(&p, &hit, &solid()));
        assert!(!player_hits_obstacle(&p, &miss, &solid()));
    }

    #[test]
    fn test_jumping_player_clears_cactus() {
        let mut p = running_player();
        p.jump();
        for _ in 0..10 {
            p.tick();
        }
        let o = cactus(PLAYER_X + 10, GROUND_Y - 40, 20, 45);
        assert!(!detect_collision(&p, &[o], &solid()));
    }

    fn obstacle_strategy() -> impl Strategy<Value = Obstacle> {
        (0..200i32, 150..280i32, 1..60i32, 1..60i32).prop_map(|(x, y, w, h)| cactus(x, y, w, h))
    }

    /// Cactus mask with a checkerboard of holes
    fn checkered() -> SpriteMasks {
        solid().with(
            SpriteId::SmallCactus1,
            AlphaMask::from_fn(7, 9, |x, y| if (x + y) % 3 == 0 { 200 } else { 0 }).unwrap(),
        )
    }

    proptest! {
        #[test]
        fn prop_order_independent(
            obstacles in prop::collection::vec(obstacle_strategy(), 0..8),
            rotate in 0usize..8,
        ) {
            let p = running_player();
            let masks = checkered();
            let expected = detect_collision(&p, &obstacles, &masks);

            let mut reversed = obstacles.clone();
            reversed.reverse();
            prop_assert_eq!(detect_collision(&p, &reversed, &masks), expected);

            let mut rotated = obstacles.clone();
            if !rotated.is_empty() {
                let k = rotate % rotated.len();
                rotated.rotate_left(k);
            }
            prop_assert_eq!(detect_collision(&p, &rotated, &masks), expected);
        }

        #[test]
        fn prop_no_hit_without_rect_overlap(o in obstacle_strategy()) {
            let p = running_player();
            if !p.collision_rect().intersects(&o.bounds()) {
                prop_assert!(!detect_collision(&p, &[o], &SpriteMasks::new()));
            }
        }

        #[test]
        fn prop_hit_matches_pixel_scan(o in obstacle_strategy()) {
            let p = running_player();
            let masks = checkered();
            let (sprite, draw) = p.current_frame();
            let bounds = o.bounds();
            let mut any_pair = false;
            if let Some(overlap) = draw.intersection(&bounds) {
                for y in overlap.top()..overlap.bottom() {
                    for x in overlap.left()..overlap.right() {
                        let a = masks.alpha_mask(sprite).unwrap().sample(x - draw.x, y - draw.y, draw.w, draw.h);
                        let b = masks.alpha_mask(o.sprite).unwrap().sample(x - bounds.x, y - bounds.y, bounds.w, bounds.h);
                        any_pair |= a != 0 && b != 0;
                    }
                }
            }
            let expected = p.collision_rect().intersects(&bounds) && any_pair;
            prop_assert_eq!(detect_collision(&p, &[o], &masks), expected);
        }
    }
}
