use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

use crate::*;

/// Longest player name in bytes. The record reserves one more byte for the terminating NUL.
pub const PLAYER_NAME_MAX_LENGTH: usize = 20;

/// "No time recorded".
pub const TIME_NA: i32 = -1;

const LEVELS: usize = Difficulty::PRESET_LEVELS.len();
const NAME_FIELD: usize = PLAYER_NAME_MAX_LENGTH + 1;

/// Best results of a player, stored on disk as a fixed-size little-endian record.
///
/// Layout: name (21 bytes, NUL padded), best times, best times without flags, best times without exploding a
/// mine (4 x `i32` each, one per preset difficulty), score (`i32`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub best_times: [i32; LEVELS],
    pub best_no_flag_times: [i32; LEVELS],
    pub best_no_mistake_times: [i32; LEVELS],
    pub score: i32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            name: "Guest".to_string(),
            best_times: [TIME_NA; LEVELS],
            best_no_flag_times: [TIME_NA; LEVELS],
            best_no_mistake_times: [TIME_NA; LEVELS],
            score: 0,
        }
    }
}

impl PlayerStats {
    pub const RECORD_SIZE: usize = NAME_FIELD + (3 * LEVELS + 1) * 4;

    pub fn to_bytes(&self) -> [u8; Self::RECORD_SIZE] {
        let mut bytes = [0u8; Self::RECORD_SIZE];

        let name = truncate_to_char_boundary(&self.name, PLAYER_NAME_MAX_LENGTH);
        bytes[..name.len()].copy_from_slice(name.as_bytes());

        let numbers = self
            .best_times
            .iter()
            .chain(&self.best_no_flag_times)
            .chain(&self.best_no_mistake_times)
            .chain(core::iter::once(&self.score));
        for (chunk, value) in bytes[NAME_FIELD..].chunks_exact_mut(4).zip(numbers) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }

        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> core::result::Result<Self, StatsError> {
        if bytes.len() < Self::RECORD_SIZE {
            return Err(StatsError::Truncated {
                expected: Self::RECORD_SIZE,
                actual: bytes.len(),
            });
        }

        let name_field = &bytes[..PLAYER_NAME_MAX_LENGTH];
        let name_len = name_field
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(PLAYER_NAME_MAX_LENGTH);
        let name = core::str::from_utf8(&name_field[..name_len])
            .map_err(|_| StatsError::InvalidName)?
            .to_string();

        let mut numbers = bytes[NAME_FIELD..Self::RECORD_SIZE]
            .chunks_exact(4)
            .map(|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        let mut next_array =
            || -> [i32; LEVELS] { core::array::from_fn(|_| numbers.next().unwrap_or(TIME_NA)) };

        let best_times = next_array();
        let best_no_flag_times = next_array();
        let best_no_mistake_times = next_array();
        let score = numbers.next().unwrap_or_default();

        Ok(Self {
            name,
            best_times,
            best_no_flag_times,
            best_no_mistake_times,
            score,
        })
    }

    /// Best time for `difficulty`, `None` for custom games or when nothing was recorded.
    pub fn best_time(&self, difficulty: Difficulty) -> Option<i32> {
        difficulty
            .preset_index()
            .map(|index| self.best_times[index])
            .filter(|&time| time != TIME_NA)
    }

    /// Records a won game of `seconds`, returns whether any best time improved. Custom games are not ranked.
    pub fn record_win(
        &mut self,
        difficulty: Difficulty,
        seconds: i32,
        flags_used: bool,
        exploded: CellCount,
    ) -> bool {
        let Some(index) = difficulty.preset_index() else {
            return false;
        };

        let mut improved = improve(&mut self.best_times[index], seconds);
        if !flags_used {
            improved |= improve(&mut self.best_no_flag_times[index], seconds);
        }
        if exploded == 0 {
            improved |= improve(&mut self.best_no_mistake_times[index], seconds);
        }
        if improved {
            log::debug!("New best {} time: {}s", difficulty, seconds);
        }
        improved
    }

    /// Records the outcome of a finished session. Nothing happens unless it was won.
    pub fn record_session<R: rand::Rng>(&mut self, session: &GameSession<R>) -> bool {
        if !session.is_game_won() {
            return false;
        }
        let seconds = i32::try_from(session.time().as_secs()).unwrap_or(i32::MAX);
        self.record_win(
            session.difficulty(),
            seconds,
            session.flags_used(),
            session.exploded_mines(),
        )
    }
}

fn improve(best: &mut i32, seconds: i32) -> bool {
    if *best == TIME_NA || seconds < *best {
        *best = seconds;
        true
    } else {
        false
    }
}

fn truncate_to_char_boundary(name: &str, max_len: usize) -> &str {
    if name.len() <= max_len {
        return name;
    }
    let mut end = max_len;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::time::Duration;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use web_time::Instant;

    #[test]
    fn record_is_seventy_three_bytes() {
        assert_eq!(PlayerStats::RECORD_SIZE, 73);
        assert_eq!(PlayerStats::default().to_bytes().len(), 73);
    }

    #[test]
    fn default_record_layout() {
        let bytes = PlayerStats::default().to_bytes();
        assert_eq!(&bytes[..6], b"Guest\0");
        assert_eq!(&bytes[21..25], &(-1i32).to_le_bytes());
        assert_eq!(&bytes[69..73], &[0, 0, 0, 0]);
    }

    #[test]
    fn decodes_written_record() {
        let mut stats = PlayerStats {
            name: "Ada".to_string(),
            score: 12,
            ..Default::default()
        };
        stats.best_times[1] = 95;
        stats.best_no_mistake_times[3] = 400;

        assert_eq!(PlayerStats::from_bytes(&stats.to_bytes()), Ok(stats));
    }

    #[test]
    fn long_names_are_cut_on_char_boundary() {
        let stats = PlayerStats {
            name: "ééééééééééé".to_string(),
            ..Default::default()
        };
        let decoded = PlayerStats::from_bytes(&stats.to_bytes()).unwrap();
        assert_eq!(decoded.name, "éééééééééé");
    }

    #[test]
    fn short_input_is_rejected() {
        assert_eq!(
            PlayerStats::from_bytes(&[0; 10]),
            Err(StatsError::Truncated {
                expected: 73,
                actual: 10
            })
        );
    }

    #[test]
    fn invalid_name_is_rejected() {
        let mut bytes = PlayerStats::default().to_bytes();
        bytes[0] = 0xff;
        assert_eq!(PlayerStats::from_bytes(&bytes), Err(StatsError::InvalidName));
    }

    #[test]
    fn keeps_minimum_times() {
        let mut stats = PlayerStats::default();

        assert!(stats.record_win(Difficulty::Medium, 120, true, 0));
        assert!(stats.record_win(Difficulty::Medium, 90, true, 1));
        assert!(!stats.record_win(Difficulty::Medium, 100, true, 1));

        assert_eq!(stats.best_time(Difficulty::Medium), Some(90));
        assert_eq!(stats.best_no_mistake_times[1], 120);
        assert_eq!(stats.best_no_flag_times[1], TIME_NA);
        assert_eq!(stats.best_time(Difficulty::Easy), None);
    }

    #[test]
    fn custom_games_are_not_ranked() {
        let mut stats = PlayerStats::default();
        assert!(!stats.record_win(Difficulty::Custom, 5, false, 0));
        assert_eq!(stats, PlayerStats::default());
    }

    #[test]
    fn records_won_session() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(2, 2)]).unwrap();
        let mut session = GameSession::with_layout(layout, SmallRng::seed_from_u64(0));
        let mut stats = PlayerStats::default();
        assert!(!stats.record_session(&session));

        let t0 = Instant::now();
        session.init_timer(t0);
        session.start_timer();
        session.sweep((0, 0)).unwrap();
        session.update_timer(t0 + Duration::from_secs(17));

        // custom layout, so only the win itself is checked
        assert!(session.is_game_won());
        assert!(!stats.record_session(&session));

        let mut session = GameSession::with_seed(Difficulty::Easy, 4);
        let mines: Vec<_> = (0..9).map(|col| (8, col)).collect();
        session
            .place_layout(MineLayout::from_mine_coords((9, 9), &mines).unwrap())
            .unwrap();
        session.init_timer(t0);
        session.start_timer();
        assert_eq!(session.sweep((0, 0)).unwrap(), SweepOutcome::Won);
        session.update_timer(t0 + Duration::from_secs(17));

        assert!(stats.record_session(&session));
        assert_eq!(stats.best_times[0], 17);
        assert_eq!(stats.best_no_flag_times[0], 17);
        assert_eq!(stats.best_no_mistake_times[0], 17);
    }
}
