use euclid::{
    default::{Point2D, Rect, Vector2D},
    point2, size2, vec2,
};

use crate::{
    constants::{
        ALIEN_DROP, ALIEN_LANDING_Y, ALIEN_SPEED, LEFT_EDGE, RIGHT_EDGE, SHOT_EXPIRY_Y, SHOT_SPEED,
    },
    sprite_store::Sprite,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Ship,
    Alien,
    Shot { used: bool },
}

/// Something that happened to an entity which the game as a whole reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    AlienKilled,
    PlayerDied,
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Point2D<f32>,
    /// Pixels per second.
    pub velocity: Vector2D<f32>,
    pub sprite: Sprite,
    removed: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, sprite: Sprite, position: Point2D<f32>) -> Self {
        let velocity = match kind {
            EntityKind::Ship => vec2(0., 0.),
            EntityKind::Alien => vec2(-ALIEN_SPEED, 0.),
            EntityKind::Shot { .. } => vec2(0., SHOT_SPEED),
        };
        Self {
            kind,
            position,
            velocity,
            sprite,
            removed: false,
        }
    }

    pub fn ship(sprite: Sprite, position: Point2D<f32>) -> Self {
        Self::new(EntityKind::Ship, sprite, position)
    }

    pub fn alien(sprite: Sprite, position: Point2D<f32>) -> Self {
        Self::new(EntityKind::Alien, sprite, position)
    }

    pub fn shot(sprite: Sprite, position: Point2D<f32>) -> Self {
        Self::new(EntityKind::Shot { used: false }, sprite, position)
    }

    pub fn is_alien(&self) -> bool {
        self.kind == EntityKind::Alien
    }

    /// Marked entities are dropped from the game at the end of the collision
    /// pass.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn remove(&mut self) {
        self.removed = true;
    }

    /// True when heading off the left or right edge of the playfield.
    fn at_edge(&self) -> bool {
        (self.velocity.x < 0. && self.position.x < LEFT_EDGE)
            || (self.velocity.x > 0. && self.position.x > RIGHT_EDGE)
    }

    /// Advances the entity by `dt` seconds. Returns true if the entity asks for
    /// a game logic pass this frame.
    pub fn advance(&mut self, dt: f32) -> bool {
        match self.kind {
            EntityKind::Ship => {
                if !self.at_edge() {
                    self.position += self.velocity * dt;
                }
                false
            }
            EntityKind::Alien => {
                let logic_required = self.at_edge();
                self.position += self.velocity * dt;
                logic_required
            }
            EntityKind::Shot { .. } => {
                self.position += self.velocity * dt;
                if self.position.y < SHOT_EXPIRY_Y {
                    self.remove();
                }
                false
            }
        }
    }

    /// The game logic pass, run for every entity once some entity asked for it.
    pub fn do_logic(&mut self) -> Option<GameEvent> {
        match self.kind {
            EntityKind::Alien => {
                self.velocity.x = -self.velocity.x;
                self.position.y += ALIEN_DROP;
                if self.position.y > ALIEN_LANDING_Y {
                    return Some(GameEvent::PlayerDied);
                }
                None
            }
            EntityKind::Ship | EntityKind::Shot { .. } => None,
        }
    }

    /// Screen position, whole pixels.
    pub fn draw_position(&self) -> Point2D<f32> {
        point2(self.position.x.trunc(), self.position.y.trunc())
    }

    pub fn bounds(&self) -> Rect<i32> {
        let size = self.sprite.size();
        Rect::new(
            point2(self.position.x as i32, self.position.y as i32),
            size2(size.width as i32, size.height as i32),
        )
    }

    pub fn collides_with(&self, other: &Entity) -> bool {
        self.bounds().intersects(&other.bounds())
    }

    /// Reacts to touching `other`. Only this entity is changed, except that a
    /// shot also marks the alien it destroys.
    pub fn collided_with(&mut self, other: &mut Entity) -> Option<GameEvent> {
        match (self.kind, other.kind) {
            (EntityKind::Ship, EntityKind::Alien) if !other.removed => {
                Some(GameEvent::PlayerDied)
            }
            (EntityKind::Shot { used: false }, EntityKind::Alien) if !other.removed => {
                self.kind = EntityKind::Shot { used: true };
                self.remove();
                other.remove();
                Some(GameEvent::AlienKilled)
            }
            _ => None,
        }
    }
}

/// Runs both sides of a collision between two entities, first `a`'s reaction
/// then `b`'s.
pub fn resolve_collision(a: &mut Entity, b: &mut Entity, events: &mut Vec<GameEvent>) {
    events.extend(a.collided_with(b));
    events.extend(b.collided_with(a));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(width: u32, height: u32) -> Sprite {
        Sprite::new(0, size2(width, height))
    }

    #[test]
    fn movement_scales_with_dt() {
        let mut alien = Entity::alien(sprite(33, 24), point2(400., 100.));
        assert!(!alien.advance(0.5));
        assert_eq!(alien.position, point2(400. - ALIEN_SPEED * 0.5, 100.));

        let mut shot = Entity::shot(sprite(2, 12), point2(100., 500.));
        shot.advance(0.1);
        assert_eq!(shot.position, point2(100., 500. + SHOT_SPEED * 0.1));
    }

    #[test]
    fn ship_stops_at_the_edges() {
        let mut ship = Entity::ship(sprite(33, 21), point2(9., 550.));
        ship.velocity = vec2(-300., 0.);
        ship.advance(0.01);
        assert_eq!(ship.position.x, 9.);

        // moving away from the edge is fine
        ship.velocity = vec2(300., 0.);
        ship.advance(0.01);
        assert_eq!(ship.position.x, 12.);

        let mut ship = Entity::ship(sprite(33, 21), point2(751., 550.));
        ship.velocity = vec2(300., 0.);
        ship.advance(0.01);
        assert_eq!(ship.position.x, 751.);
    }

    #[test]
    fn alien_at_edge_requests_logic_and_keeps_moving() {
        let mut alien = Entity::alien(sprite(33, 24), point2(9., 100.));
        assert!(alien.advance(0.01));
        assert!(alien.position.x < 9.);

        let mut alien = Entity::alien(sprite(33, 24), point2(751., 100.));
        // heading left, away from the right edge
        assert!(!alien.advance(0.01));
        alien.velocity = vec2(ALIEN_SPEED, 0.);
        assert!(alien.advance(0.01));
    }

    #[test]
    fn alien_logic_turns_and_drops() {
        let mut alien = Entity::alien(sprite(33, 24), point2(5., 100.));
        assert_eq!(alien.do_logic(), None);
        assert_eq!(alien.velocity, vec2(ALIEN_SPEED, 0.));
        assert_eq!(alien.position, point2(5., 110.));
    }

    #[test]
    fn alien_reaching_the_bottom_kills_the_player() {
        let mut alien = Entity::alien(sprite(33, 24), point2(5., 565.));
        assert_eq!(alien.do_logic(), Some(GameEvent::PlayerDied));
    }

    #[test]
    fn shot_expires_above_the_screen() {
        let mut shot = Entity::shot(sprite(2, 12), point2(100., -98.));
        shot.advance(0.001);
        assert!(!shot.is_removed());
        shot.advance(0.01);
        assert!(shot.is_removed());
    }

    #[test]
    fn bounds_use_truncated_position_and_sprite_size() {
        let alien = Entity::alien(sprite(33, 24), point2(10.9, 20.2));
        assert_eq!(alien.bounds(), Rect::new(point2(10, 20), size2(33, 24)));
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let a = Entity::alien(sprite(10, 10), point2(0., 0.));
        let b = Entity::alien(sprite(10, 10), point2(10., 0.));
        let c = Entity::alien(sprite(10, 10), point2(9., 9.));
        assert!(!a.collides_with(&b));
        assert!(a.collides_with(&c));
        assert!(b.collides_with(&c));
    }

    #[test]
    fn shot_kills_alien_once() {
        let mut shot = Entity::shot(sprite(2, 12), point2(100., 100.));
        let mut alien = Entity::alien(sprite(33, 24), point2(90., 95.));
        let mut events = Vec::new();

        resolve_collision(&mut shot, &mut alien, &mut events);
        assert_eq!(events, vec![GameEvent::AlienKilled]);
        assert!(shot.is_removed());
        assert!(alien.is_removed());
        assert_eq!(shot.kind, EntityKind::Shot { used: true });

        resolve_collision(&mut alien, &mut shot, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn dead_alien_cannot_be_killed_again() {
        let mut first = Entity::shot(sprite(2, 12), point2(100., 100.));
        let mut second = Entity::shot(sprite(2, 12), point2(102., 100.));
        let mut alien = Entity::alien(sprite(33, 24), point2(90., 95.));
        let mut events = Vec::new();

        resolve_collision(&mut first, &mut alien, &mut events);
        resolve_collision(&mut second, &mut alien, &mut events);
        assert_eq!(events, vec![GameEvent::AlienKilled]);
        assert!(!second.is_removed());
    }

    #[test]
    fn ship_touching_alien_dies() {
        let mut ship = Entity::ship(sprite(33, 21), point2(100., 550.));
        let mut alien = Entity::alien(sprite(33, 24), point2(110., 540.));
        let mut events = Vec::new();

        resolve_collision(&mut alien, &mut ship, &mut events);
        assert_eq!(events, vec![GameEvent::PlayerDied]);
        assert!(!ship.is_removed());
        assert!(!alien.is_removed());
    }

    #[test]
    fn shots_ignore_the_ship_and_each_other() {
        let mut ship = Entity::ship(sprite(33, 21), point2(100., 550.));
        let mut shot = Entity::shot(sprite(2, 12), point2(110., 545.));
        let mut other = Entity::shot(sprite(2, 12), point2(110., 545.));
        let mut events = Vec::new();

        resolve_collision(&mut ship, &mut shot, &mut events);
        resolve_collision(&mut shot, &mut other, &mut events);
        assert!(events.is_empty());
        assert!(!shot.is_removed());
    }
}
