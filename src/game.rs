use std::collections::HashSet;

use anyhow::Error;
use euclid::{point2, vec2};

use crate::{
    constants::{
        ALIEN_COLUMNS, ALIEN_ORIGIN, ALIEN_ROWS, ALIEN_SPACING, ALIEN_SPEEDUP, FIRING_INTERVAL,
        MESSAGE_Y, SCREEN_SIZE, SHIP_SPEED, SHIP_START, SHOT_OFFSET,
    },
    entity::{resolve_collision, Entity, EntityKind, GameEvent},
    gl,
    input::{InputEvent, Key},
    render::Renderer,
    sprite_store::Sprite,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Message {
    PressAnyKey,
    GotYou,
    YouWin,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Copy, Clone, Debug)]
pub struct Sprites {
    pub ship: Sprite,
    pub alien: Sprite,
    pub shot: Sprite,
    pub press_any_key: Sprite,
    pub got_you: Sprite,
    pub you_win: Sprite,
}

impl Sprites {
    pub fn load(renderer: &mut dyn Renderer, context: &mut gl::Context) -> Result<Self, Error> {
        Ok(Sprites {
            ship: renderer.load_sprite(context, "sprites/ship.png")?,
            alien: renderer.load_sprite(context, "sprites/alien.png")?,
            shot: renderer.load_sprite(context, "sprites/shot.png")?,
            press_any_key: renderer.load_sprite(context, "sprites/pressanykey.png")?,
            got_you: renderer.load_sprite(context, "sprites/gotyou.png")?,
            you_win: renderer.load_sprite(context, "sprites/youwin.png")?,
        })
    }

    fn message(&self, message: Message) -> Sprite {
        match message {
            Message::PressAnyKey => self.press_any_key,
            Message::GotYou => self.got_you,
            Message::YouWin => self.you_win,
        }
    }
}

pub struct Game {
    sprites: Sprites,
    entities: Vec<Entity>,
    events: Vec<GameEvent>,

    controls: Controls,
    alien_count: u32,
    logic_required_this_loop: bool,
    waiting_for_key_press: bool,
    message: Message,

    /// Keys currently down, across restarts.
    held_keys: HashSet<Key>,
    /// Seconds until the ship may fire again.
    fire_cooldown: f32,
}

impl Game {
    pub fn new(sprites: Sprites) -> Self {
        let mut game = Game {
            sprites,
            entities: Vec::new(),
            events: Vec::new(),
            controls: Controls::default(),
            alien_count: 0,
            logic_required_this_loop: false,
            waiting_for_key_press: true,
            message: Message::PressAnyKey,
            held_keys: HashSet::new(),
            fire_cooldown: 0.,
        };
        game.start_game();
        game
    }

    /// The message on screen, if the game is waiting for a key press.
    pub fn message(&self) -> Option<Message> {
        if self.waiting_for_key_press {
            Some(self.message)
        } else {
            None
        }
    }

    fn start_game(&mut self) {
        self.entities.clear();
        self.events.clear();

        self.entities.push(Entity::ship(
            self.sprites.ship,
            point2(SHIP_START.0, SHIP_START.1),
        ));

        self.alien_count = 0;
        for row in 0..ALIEN_ROWS {
            for column in 0..ALIEN_COLUMNS {
                let position = point2(
                    ALIEN_ORIGIN.0 + column as f32 * ALIEN_SPACING.0,
                    ALIEN_ORIGIN.1 + row as f32 * ALIEN_SPACING.1,
                );
                self.entities
                    .push(Entity::alien(self.sprites.alien, position));
                self.alien_count += 1;
            }
        }

        self.controls = Controls::default();
        self.logic_required_this_loop = false;
        log::info!("New game with {} aliens", self.alien_count);
    }

    /// Runs one frame of `dt` seconds.
    pub fn update(&mut self, dt: f32, inputs: &[InputEvent]) -> Flow {
        for input in inputs {
            match *input {
                InputEvent::KeyDown(Key::Escape) => return Flow::Exit,
                InputEvent::KeyDown(key) => {
                    // key repeat sends more presses for a held key
                    let fresh = self.held_keys.insert(key);
                    if !self.waiting_for_key_press {
                        self.controls.set(key, true);
                    } else if fresh {
                        self.waiting_for_key_press = false;
                        self.start_game();
                    }
                }
                InputEvent::KeyUp(key) => {
                    self.held_keys.remove(&key);
                    self.controls.set(key, false);
                }
            }
        }

        self.fire_cooldown = (self.fire_cooldown - dt).max(0.);

        if !self.waiting_for_key_press {
            for entity in &mut self.entities {
                if entity.advance(dt) {
                    self.logic_required_this_loop = true;
                }
            }
        }

        // brute force collisions, every pair once
        for i in 0..self.entities.len() {
            let (head, tail) = self.entities.split_at_mut(i + 1);
            let me = &mut head[i];
            for him in tail {
                if me.collides_with(him) {
                    resolve_collision(me, him, &mut self.events);
                }
            }
        }

        self.entities.retain(|entity| !entity.is_removed());

        if self.logic_required_this_loop {
            for entity in &mut self.entities {
                self.events.extend(entity.do_logic());
            }
            self.logic_required_this_loop = false;
        }

        for event in std::mem::take(&mut self.events) {
            self.handle_event(event);
        }

        let velocity = if self.controls.left && !self.controls.right {
            -SHIP_SPEED
        } else if self.controls.right && !self.controls.left {
            SHIP_SPEED
        } else {
            0.
        };
        if let Some(ship) = self.ship_mut() {
            ship.velocity = vec2(velocity, 0.);
        }

        if self.controls.fire && !self.waiting_for_key_press {
            self.try_to_fire();
        }

        Flow::Continue
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        for entity in &self.entities {
            renderer.draw(&entity.sprite, entity.draw_position());
        }

        if let Some(message) = self.message() {
            let sprite = self.sprites.message(message);
            let x = SCREEN_SIZE.0.saturating_sub(sprite.size().width) / 2;
            renderer.draw(&sprite, point2(x as f32, MESSAGE_Y));
        }
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::AlienKilled => {
                self.alien_count = self.alien_count.saturating_sub(1);
                log::debug!("Alien killed, {} left", self.alien_count);
                if self.alien_count == 0 {
                    self.notify_win();
                }

                // the survivors speed up
                for alien in self.entities.iter_mut().filter(|e| e.is_alien()) {
                    alien.velocity.x *= ALIEN_SPEEDUP;
                }
            }
            GameEvent::PlayerDied => self.notify_death(),
        }
    }

    fn notify_death(&mut self) {
        if !self.waiting_for_key_press {
            log::info!("Player died with {} aliens left", self.alien_count);
        }
        self.message = Message::GotYou;
        self.waiting_for_key_press = true;
    }

    fn notify_win(&mut self) {
        log::info!("Player won");
        self.message = Message::YouWin;
        self.waiting_for_key_press = true;
    }

    fn try_to_fire(&mut self) {
        if self.fire_cooldown > 0. {
            return;
        }

        let ship_position = match self.ship_mut() {
            Some(ship) => ship.position,
            None => return,
        };
        self.fire_cooldown = FIRING_INTERVAL;
        self.entities.push(Entity::shot(
            self.sprites.shot,
            ship_position + vec2(SHOT_OFFSET.0, SHOT_OFFSET.1),
        ));
    }

    fn ship_mut(&mut self) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|entity| entity.kind == EntityKind::Ship)
    }
}

#[derive(Default)]
struct Controls {
    left: bool,
    right: bool,
    fire: bool,
}

impl Controls {
    fn set(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Space => self.fire = pressed,
            _ => {}
        }
    }
}
