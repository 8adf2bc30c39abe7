//! The words and symbols of the language, for tools such as highlighting
//! editors that need to colour a script without parsing it.

use crate::ir::value::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// si, tantque, pour, goto ...
    Reserved,
    /// deplacer, attaquer, detecterEnnemi ...
    Function,
    /// the part after `attaquer.`
    Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Print,
    Input,
    Goto,
    If,
    Else,
    EndIf,
    While,
    EndWhile,
    For,
    EndFor,
    Move,
    Attack,
    Shoot,
    Melee,
    Reload,
    DetectEnemy,
    IsAlive,
}

impl Keyword {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Print,
            Self::Input,
            Self::Goto,
            Self::If,
            Self::Else,
            Self::EndIf,
            Self::While,
            Self::EndWhile,
            Self::For,
            Self::EndFor,
            Self::Move,
            Self::Attack,
            Self::Shoot,
            Self::Melee,
            Self::Reload,
            Self::DetectEnemy,
            Self::IsAlive,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Input => "input",
            Self::Goto => "goto",
            Self::If => "si",
            Self::Else => "sinon",
            Self::EndIf => "finsi",
            Self::While => "tantque",
            Self::EndWhile => "fintantque",
            Self::For => "pour",
            Self::EndFor => "finpour",
            Self::Move => "deplacer",
            Self::Attack => "attaquer",
            Self::Shoot => "tirer",
            Self::Melee => "melee",
            Self::Reload => "recharger",
            Self::DetectEnemy => "detecterEnnemi",
            Self::IsAlive => "estVivant",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Print
            | Self::Input
            | Self::Goto
            | Self::If
            | Self::Else
            | Self::EndIf
            | Self::While
            | Self::EndWhile
            | Self::For
            | Self::EndFor => Category::Reserved,
            Self::Shoot | Self::Melee => Category::Suffix,
            Self::Move | Self::Attack | Self::Reload | Self::DetectEnemy | Self::IsAlive => {
                Category::Function
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Print => "print an expression",
            Self::Input => "read a line into a variable",
            Self::Goto => "jump to a label",
            Self::If => "start a conditional block",
            Self::Else => "start the alternative branch of a si",
            Self::EndIf => "close a si block",
            Self::While => "start a loop tested before each pass",
            Self::EndWhile => "close a tantque block",
            Self::For => "start a counted loop: pour (init ; condition ; step)",
            Self::EndFor => "close a pour block",
            Self::Move => "move one tile in a direction",
            Self::Attack => "attack, followed by .tirer or .melee",
            Self::Shoot => "ranged attack along a diagonal",
            Self::Melee => "close attack on the adjacent tile",
            Self::Reload => "wait a turn and refill ammunition",
            Self::DetectEnemy => "direction of the enemy in sight",
            Self::IsAlive => "1 while the enemy is alive, 0 after",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|k| k.name() == name)
    }
}

/// Operator symbols, all on one precedence level.
pub const OPERATORS: [char; 8] = ['=', '!', '+', '-', '*', '/', '<', '>'];

pub const COMMENT: char = '#';

pub fn directions() -> impl Iterator<Item = &'static str> {
    Direction::ALL.iter().map(|d| d.keyword())
}

pub fn is_keyword(word: &str) -> bool {
    Keyword::from_name(word).is_some() || Direction::from_keyword(word).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_keyword_round_trips_by_name() {
        for keyword in Keyword::all() {
            assert_eq!(Keyword::from_name(keyword.name()), Some(keyword));
        }
    }

    #[test]
    fn directions_count_as_keywords() {
        assert!(is_keyword("BASGAUCHE"));
        assert!(is_keyword("fintantque"));
        assert!(!is_keyword("robot"));
        assert_eq!(directions().count(), 4);
    }
}
