//! Hitbox / hurtbox rectangles.
//!
//! Both boxes are derived fresh every frame from the fighter's position
//! and facing; nothing is cached across ticks. Overlap is half-open on
//! both axes: rectangles that merely share an edge, and any zero-area
//! rectangle, do not collide.

use bevy::prelude::*;

use crate::components::Facing;
use crate::config::BalanceConfig;

/// Axis-aligned rectangle, min-corner + size, screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open interval overlap on both axes. Strict comparisons mean
    /// edge contact and zero-area rectangles never count as a hit.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Overlap region of two rectangles. Only meaningful when
    /// `overlaps` holds; used for the impact point of a landed hit.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Rect {
            x,
            y,
            width: (self.right().min(other.right()) - x).max(0.0),
            height: (self.bottom().min(other.bottom()) - y).max(0.0),
        }
    }
}

/// Body rectangle of a fighter, anchored bottom-center at its feet.
pub fn hurtbox(position: Vec2, config: &BalanceConfig) -> Rect {
    Rect::new(
        position.x - config.fighter_width / 2.0,
        position.y - config.fighter_height,
        config.fighter_width,
        config.fighter_height,
    )
}

/// Attack rectangle for a swing.
///
/// Reaches `attack_reach` forward from the fighter's leading edge, so
/// it can never overlap the owner's own hurtbox, and sits at torso
/// height (vertically centered on the body).
pub fn hitbox(position: Vec2, facing: Facing, config: &BalanceConfig) -> Rect {
    let leading_edge = position.x + config.fighter_width / 2.0 * facing.sign();
    let x = match facing {
        Facing::Right => leading_edge,
        Facing::Left => leading_edge - config.attack_reach,
    };
    let y = position.y - (config.fighter_height + config.attack_height) / 2.0;
    Rect::new(x, y, config.attack_reach, config.attack_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric_and_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 10.0, 10.0); // shares an edge with a

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn zero_area_never_hits() {
        let point = Rect::new(5.0, 5.0, 0.0, 0.0);
        let body = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!point.overlaps(&body));
        assert!(!body.overlaps(&point));
    }

    #[test]
    fn own_hitbox_never_touches_own_hurtbox() {
        let config = BalanceConfig::default();
        let position = Vec2::new(500.0, config.ground_y);

        for facing in [Facing::Left, Facing::Right] {
            let hit = hitbox(position, facing, &config);
            let hurt = hurtbox(position, &config);
            assert!(
                !hit.overlaps(&hurt),
                "{facing:?} hitbox {hit:?} overlaps own hurtbox {hurt:?}"
            );
        }
    }

    #[test]
    fn hitbox_reaches_a_fighter_in_range() {
        let config = BalanceConfig::default();
        let attacker = Vec2::new(100.0, config.ground_y);
        let defender = Vec2::new(150.0, config.ground_y);

        let hit = hitbox(attacker, Facing::Right, &config);
        let hurt = hurtbox(defender, &config);
        assert!(hit.overlaps(&hurt));

        // Facing away: whiff
        let hit = hitbox(attacker, Facing::Left, &config);
        assert!(!hit.overlaps(&hurt));
    }

    #[test]
    fn hitbox_whiffs_out_of_range() {
        let config = BalanceConfig::default();
        let attacker = Vec2::new(100.0, config.ground_y);
        // Leading edge 140 + reach 100 = 240; defender body starts at 260
        let defender = Vec2::new(300.0, config.ground_y);

        let hit = hitbox(attacker, Facing::Right, &config);
        assert!(!hit.overlaps(&hurtbox(defender, &config)));
    }

    #[test]
    fn intersection_center_lies_inside_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(6.0, 2.0, 10.0, 4.0);
        let overlap = a.intersection(&b);

        assert_eq!(overlap, Rect::new(6.0, 2.0, 4.0, 4.0));
        let center = overlap.center();
        assert!(center.x > 6.0 && center.x < 10.0);
        assert!(center.y > 2.0 && center.y < 6.0);
    }
}
