pub const ROBOT_HP: u32 = 100;
pub const TURRET_HP: u32 = 50;
pub const MELEE_DAMAGE: u32 = 25;
pub const RANGED_DAMAGE: u32 = 15;
pub const MAX_SHOTS: u32 = 3;

/// Grid coordinates as (row, column).
pub type Position = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Robot {
    pub hp: u32,
    pub position: Position,
    pub shots: u32,
}

impl Robot {
    pub fn player(position: Position) -> Self {
        Robot {
            hp: ROBOT_HP,
            position,
            shots: MAX_SHOTS,
        }
    }

    pub fn turret(position: Position) -> Self {
        Robot {
            hp: TURRET_HP,
            position,
            shots: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    /// Uses one shot. `false` when the magazine is empty.
    pub fn fire(&mut self) -> bool {
        if self.shots == 0 {
            return false;
        }
        self.shots -= 1;
        true
    }

    pub fn reload(&mut self) {
        self.shots = MAX_SHOTS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_stops_at_zero() {
        let mut turret = Robot::turret((0, 0));
        turret.take_damage(RANGED_DAMAGE);
        assert_eq!(turret.hp, 35);
        turret.take_damage(MELEE_DAMAGE);
        turret.take_damage(MELEE_DAMAGE);
        assert_eq!(turret.hp, 0);
        assert!(!turret.is_alive());
    }

    #[test]
    fn magazine_empties_and_refills() {
        let mut robot = Robot::player((0, 0));
        assert!(robot.fire() && robot.fire() && robot.fire());
        assert!(!robot.fire());
        robot.reload();
        assert_eq!(robot.shots, MAX_SHOTS);
    }
}
