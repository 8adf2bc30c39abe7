use rand::Rng;
use rand::seq::SliceRandom;
use robokode::Direction;

use crate::error::ArenaError;
use crate::robot::{MELEE_DAMAGE, Position, RANGED_DAMAGE, Robot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    pub size: usize,
    pub obstacles: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            size: 10,
            obstacles: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Obstacle,
}

/// The first thing met walking from a tile in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sight {
    Player(Position),
    Turret(Position),
    Obstacle(Position),
    Edge,
}

/// Result of applying one robot action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Moved(Position),
    Blocked,
    /// The turret was hit and has `hp` left.
    Hit { hp: u32 },
    Missed,
    OutOfAmmo,
    Reloaded,
}

pub struct Grid {
    size: usize,
    // row-major
    tiles: Vec<Tile>,
    pub player: Robot,
    pub turret: Robot,
}

impl Grid {
    pub fn new(size: usize, player: Position, turret: Position) -> Self {
        Grid {
            size,
            tiles: vec![Tile::Empty; size * size],
            player: Robot::player(player),
            turret: Robot::turret(turret),
        }
    }

    /// Places both robots and the obstacles on distinct random tiles.
    pub fn generate<R: Rng + ?Sized>(
        config: &ArenaConfig,
        rng: &mut R,
    ) -> Result<Self, ArenaError> {
        let size = config.size;
        let crowded = ArenaError::Crowded {
            size,
            obstacles: config.obstacles,
        };
        if config.obstacles + 2 > size * size {
            return Err(crowded);
        }

        let mut free: Vec<Position> = (0..size)
            .flat_map(|row| (0..size).map(move |column| (row, column)))
            .collect();
        free.shuffle(rng);

        let mut free = free.into_iter();
        let (Some(player), Some(turret)) = (free.next(), free.next()) else {
            return Err(crowded);
        };

        let mut grid = Grid::new(size, player, turret);
        for position in free.take(config.obstacles) {
            grid.place_obstacle(position);
        }

        log::debug!(
            "arena {}x{}: player at {:?}, turret at {:?}, {} obstacle(s)",
            size,
            size,
            player,
            turret,
            config.obstacles
        );
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn place_obstacle(&mut self, (row, column): Position) {
        self.tiles[row * self.size + column] = Tile::Obstacle;
    }

    pub fn tile(&self, (row, column): Position) -> Tile {
        self.tiles[row * self.size + column]
    }

    /// Neighbouring tile in `direction`, `None` past the edge.
    pub fn step(&self, (row, column): Position, direction: Direction) -> Option<Position> {
        let (d_row, d_column) = direction.delta();
        let row = row.checked_add_signed(d_row as isize)?;
        let column = column.checked_add_signed(d_column as isize)?;
        (row < self.size && column < self.size).then_some((row, column))
    }

    pub fn look(&self, from: Position, direction: Direction) -> Sight {
        let mut position = from;
        while let Some(next) = self.step(position, direction) {
            if next == self.player.position {
                return Sight::Player(next);
            }
            if next == self.turret.position {
                return Sight::Turret(next);
            }
            if self.tile(next) == Tile::Obstacle {
                return Sight::Obstacle(next);
            }
            position = next;
        }
        Sight::Edge
    }

    pub fn move_player(&mut self, direction: Direction) -> Outcome {
        match self.step(self.player.position, direction) {
            Some(target) if target != self.turret.position && self.tile(target) == Tile::Empty => {
                self.player.position = target;
                Outcome::Moved(target)
            }
            _ => Outcome::Blocked,
        }
    }

    /// Fires along the ray; the turret takes damage if it is the first thing on it.
    pub fn shoot(&mut self, direction: Direction) -> Outcome {
        if !self.player.fire() {
            return Outcome::OutOfAmmo;
        }
        match self.look(self.player.position, direction) {
            Sight::Turret(at) => {
                log::debug!("shot hits the turret at {:?}", at);
                self.turret.take_damage(RANGED_DAMAGE);
                Outcome::Hit { hp: self.turret.hp }
            }
            Sight::Obstacle(at) => {
                log::debug!("shot stopped by the obstacle at {:?}", at);
                Outcome::Missed
            }
            Sight::Player(_) | Sight::Edge => Outcome::Missed,
        }
    }

    pub fn melee(&mut self, direction: Direction) -> Outcome {
        if self.step(self.player.position, direction) == Some(self.turret.position) {
            self.turret.take_damage(MELEE_DAMAGE);
            Outcome::Hit { hp: self.turret.hp }
        } else {
            Outcome::Missed
        }
    }

    pub fn reload(&mut self) -> Outcome {
        self.player.reload();
        Outcome::Reloaded
    }

    /// First direction with the turret in line of sight.
    pub fn detect(&self) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&direction| {
            matches!(self.look(self.player.position, direction), Sight::Turret(_))
        })
    }

    /// The turret's turn: while it stands it shoots the player on sight.
    /// Returns the direction it fired in and the player's HP left.
    pub fn turret_fire(&mut self) -> Option<(Direction, u32)> {
        if !self.turret.is_alive() {
            return None;
        }
        let direction = Direction::ALL.into_iter().find(|&direction| {
            matches!(self.look(self.turret.position, direction), Sight::Player(_))
        })?;
        self.player.take_damage(RANGED_DAMAGE);
        Some((direction, self.player.hp))
    }

    pub fn render(&self) -> String {
        let mut out = format!("┌{}┐\n", "─".repeat(self.size));
        for row in 0..self.size {
            out.push('│');
            for column in 0..self.size {
                let position = (row, column);
                let glyph = if position == self.player.position {
                    'R'
                } else if position == self.turret.position {
                    if self.turret.is_alive() { 'T' } else { 'x' }
                } else if self.tile(position) == Tile::Obstacle {
                    '#'
                } else {
                    '.'
                };
                out.push(glyph);
            }
            out.push_str("│\n");
        }
        out.push_str(&format!("└{}┘", "─".repeat(self.size)));
        out
    }
}
