use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    dto::format_system_time,
    state::{
        engine::Side,
        result::MatchResult,
        roster::{MatchMode, Roster},
    },
};

/// Body posted to the result storage once a match is decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResultPayload {
    /// `"single"` or `"double"`.
    pub game_type: MatchMode,
    /// Final points of side 1.
    pub score1: u32,
    /// Final points of side 2.
    pub score2: u32,
    /// RFC 3339 timestamp of the first serve.
    pub start_time: String,
    /// RFC 3339 timestamp of the winning point.
    pub end_time: String,
    /// Mode-specific participant fields, flattened into the body.
    #[serde(flatten)]
    pub participants: ResultParticipants,
}

/// Participant and winner fields of a [`ResultPayload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ResultParticipants {
    /// Singles players, the winner given by name.
    Singles {
        /// Side 1 player.
        player1: String,
        /// Side 2 player.
        player2: String,
        /// Name of the winning player.
        winner: String,
    },
    /// Doubles teams, the winner given by team number.
    Doubles {
        /// First player of team 1.
        team1_player1: String,
        /// Second player of team 1.
        team1_player2: String,
        /// First player of team 2.
        team2_player1: String,
        /// Second player of team 2.
        team2_player2: String,
        /// `1` or `2`.
        winning_team: u8,
    },
}

impl From<&MatchResult> for ResultPayload {
    fn from(result: &MatchResult) -> Self {
        let score = result.score();
        let participants = match result.roster() {
            Roster::Singles { player1, player2 } => ResultParticipants::Singles {
                player1: player1.clone(),
                player2: player2.clone(),
                winner: result.winner_label(),
            },
            Roster::Doubles { team1, team2 } => {
                let [team1_player1, team1_player2] = team1.clone();
                let [team2_player1, team2_player2] = team2.clone();
                ResultParticipants::Doubles {
                    team1_player1,
                    team1_player2,
                    team2_player1,
                    team2_player2,
                    winning_team: result.winner().number(),
                }
            }
        };

        Self {
            game_type: result.mode(),
            score1: score.points(Side::A),
            score2: score.points(Side::B),
            start_time: format_system_time(result.started_at()),
            end_time: format_system_time(result.ended_at()),
            participants,
        }
    }
}

/// Answer of the result storage: `{"status": "ok"}` or `{"status": ..., "error": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// `"ok"` on success.
    #[serde(default)]
    pub status: Option<String>,
    /// Human readable reason on failure.
    #[serde(default)]
    pub error: Option<String>,
}
